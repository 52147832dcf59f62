//! BER simulation
//!
//! This module contains utilities for BER simulation of a polar code with BPSK
//! modulation over an AWGN channel.

use super::{
    channel::AwgnChannel,
    modulation::{BpskDemodulator, BpskModulator},
};
use crate::{
    code::PolarCode,
    decoder::factory::{DecoderImplementation, PolarDecoder},
    encoder::Encoder,
    rand::{Rng, *},
};
use log::info;
use rand::{distributions::Standard, Rng as _};
use std::{
    sync::mpsc::Sender,
    time::{Duration, Instant},
};

/// BER test.
///
/// This struct is used to run a BER test. It is created with a
/// [`BerTestBuilder`].
#[derive(Debug)]
pub struct BerTest {
    encoder: Encoder,
    modulator: BpskModulator,
    decoder: Box<dyn PolarDecoder>,
    decoder_implementation: DecoderImplementation,
    rng: Rng,
    ebn0s_db: Vec<f32>,
    max_frame_errors: u64,
    max_frames: Option<u64>,
    reporter: Option<Reporter>,
}

/// BER test builder.
///
/// This struct contains all the parameters needed to create a BER test.
#[derive(Debug)]
pub struct BerTestBuilder<'a> {
    /// Polar code.
    pub code: PolarCode,
    /// Decoder implementation.
    pub decoder_implementation: DecoderImplementation,
    /// Number of automorphism ensemble members.
    pub ensemble_size: usize,
    /// Number of frame errors to collect for each Eb/N0.
    pub max_frame_errors: u64,
    /// Maximum number of frames to simulate for each Eb/N0.
    pub max_frames: Option<u64>,
    /// List of Eb/N0's (in dB) to simulate.
    pub ebn0s_db: &'a [f32],
    /// Seed used for the ensemble, the messages and the channel noise.
    pub seed: u64,
    /// An optional reporter object to which the BER test will send periodic
    /// updates about its progress.
    pub reporter: Option<Reporter>,
}

/// Progress reporter.
///
/// A reporter can optionally be supplied to the BER test on creation in order
/// to receive periodic messages reporting the test progress.
#[derive(Debug, Clone)]
pub struct Reporter {
    /// Sender element of a channel used to send the reports.
    pub tx: Sender<Report>,
    /// Reporting interval.
    pub interval: Duration,
}

/// BER test progress report.
#[derive(Debug, Clone, PartialEq)]
pub enum Report {
    /// Statistics for the current Eb/N0 being tested.
    Statistics(Statistics),
    /// The complete BER test has finished.
    Finished,
}

#[derive(Debug, Clone, PartialEq)]
struct CurrentStatistics {
    num_frames: u64,
    bit_errors: u64,
    frame_errors: u64,
    metric_sum: f64,
    start: Instant,
}

/// BER test statistics.
///
/// This structure contains the statistics for a single Eb/N0 case in a BER
/// test.
#[derive(Debug, Clone, PartialEq)]
pub struct Statistics {
    /// Eb/N0 in dB units.
    pub ebn0_db: f32,
    /// Number of frames tested.
    pub num_frames: u64,
    /// Number of bit errors.
    pub bit_errors: u64,
    /// Number of frame errors.
    pub frame_errors: u64,
    /// Bit error rate.
    pub ber: f64,
    /// Frame error rate.
    pub fer: f64,
    /// Average winning path metric.
    pub average_metric: f64,
    /// Elapsed time for this test case.
    pub elapsed: Duration,
    /// Throughput in Mbps (referred to information bits).
    pub throughput_mbps: f64,
}

impl BerTestBuilder<'_> {
    /// Creates a BER test.
    ///
    /// This function only defines the BER test. To run it it is necessary to
    /// call the [`BerTest::run`] method.
    pub fn build(self) -> Result<BerTest, Box<dyn std::error::Error>> {
        let mut rng = Rng::seed_from_u64(self.seed);
        let decoder = self.decoder_implementation.build_decoder(
            self.code.clone(),
            self.ensemble_size,
            &mut rng,
        )?;
        Ok(BerTest {
            encoder: Encoder::new(self.code),
            modulator: BpskModulator::new(),
            decoder,
            decoder_implementation: self.decoder_implementation,
            rng,
            ebn0s_db: self.ebn0s_db.to_owned(),
            max_frame_errors: self.max_frame_errors,
            max_frames: self.max_frames,
            reporter: self.reporter,
        })
    }
}

impl BerTest {
    /// Returns the code length N.
    pub fn n(&self) -> usize {
        self.encoder.code().length()
    }

    /// Returns the number of information bits k.
    pub fn k(&self) -> usize {
        self.encoder.code().dimension()
    }

    /// Returns the rate of the code.
    pub fn rate(&self) -> f64 {
        self.encoder.code().rate()
    }

    /// Returns the number of ensemble members of the decoder.
    pub fn ensemble_size(&self) -> usize {
        self.decoder.ensemble_size()
    }

    /// Returns the decoder implementation.
    pub fn decoder_implementation(&self) -> DecoderImplementation {
        self.decoder_implementation
    }

    /// Runs the BER test.
    ///
    /// This function runs the BER test until completion. It returns a list of
    /// statistics for each Eb/N0, or an error.
    pub fn run(mut self) -> Result<Vec<Statistics>, Box<dyn std::error::Error>> {
        let mut statistics = Vec::with_capacity(self.ebn0s_db.len());
        for &ebn0_db in self.ebn0s_db.clone().iter() {
            let channel = AwgnChannel::from_ebn0_db(f64::from(ebn0_db), self.rate());
            let demodulator = BpskDemodulator::new(channel.noise_sigma());
            let mut current = CurrentStatistics::new();
            let mut last_report = Instant::now();
            while current.frame_errors < self.max_frame_errors
                && self.max_frames.map_or(true, |m| current.num_frames < m)
            {
                self.simulate_frame(&channel, &demodulator, &mut current)?;
                if let Some(reporter) = &self.reporter {
                    if last_report.elapsed() >= reporter.interval {
                        reporter.tx.send(Report::Statistics(Statistics::from_current(
                            &current,
                            ebn0_db,
                            self.k(),
                        )))?;
                        last_report = Instant::now();
                    }
                }
            }
            let stats = Statistics::from_current(&current, ebn0_db, self.k());
            info!(
                "Eb/N0 = {:.2} dB: {} frames, BER = {:.3e}, FER = {:.3e}",
                ebn0_db, stats.num_frames, stats.ber, stats.fer
            );
            if let Some(reporter) = &self.reporter {
                reporter.tx.send(Report::Statistics(stats.clone()))?;
            }
            statistics.push(stats);
        }
        if let Some(reporter) = &self.reporter {
            reporter.tx.send(Report::Finished)?;
        }
        Ok(statistics)
    }

    fn simulate_frame(
        &mut self,
        channel: &AwgnChannel,
        demodulator: &BpskDemodulator,
        current: &mut CurrentStatistics,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let k = self.k();
        let message = Self::random_message(&mut self.rng, k);
        let codeword = self.encoder.encode(&message)?;
        let mut symbols = self.modulator.modulate(&codeword);
        channel.add_noise(&mut self.rng, &mut symbols);
        let llrs = demodulator.demodulate(&symbols);
        let decoded = self.decoder.decode(&llrs)?;
        let bit_errors = message
            .iter()
            .zip(decoded.message.iter())
            .filter(|(&a, &b)| a != b)
            .count() as u64;
        current.bit_errors += bit_errors;
        if decoded.codeword != codeword {
            current.frame_errors += 1;
        }
        current.metric_sum += decoded.metric;
        current.num_frames += 1;
        Ok(())
    }

    fn random_message(rng: &mut Rng, size: usize) -> Vec<u8> {
        rng.sample_iter(Standard)
            .map(<u8 as From<bool>>::from)
            .take(size)
            .collect()
    }
}

impl CurrentStatistics {
    fn new() -> CurrentStatistics {
        CurrentStatistics {
            num_frames: 0,
            bit_errors: 0,
            frame_errors: 0,
            metric_sum: 0.0,
            start: Instant::now(),
        }
    }
}

impl Statistics {
    fn from_current(stats: &CurrentStatistics, ebn0_db: f32, k: usize) -> Statistics {
        let elapsed = Instant::now() - stats.start;
        let frames = stats.num_frames.max(1) as f64;
        Statistics {
            ebn0_db,
            num_frames: stats.num_frames,
            bit_errors: stats.bit_errors,
            frame_errors: stats.frame_errors,
            ber: stats.bit_errors as f64 / (k as f64 * frames),
            fer: stats.frame_errors as f64 / frames,
            average_metric: stats.metric_sum / frames,
            elapsed,
            throughput_mbps: 1e-6 * (k as f64 * stats.num_frames as f64) / elapsed.as_secs_f64(),
        }
    }
}
