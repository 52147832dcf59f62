//! BER test CLI subcommand.
//!
//! This subcommand can be used to perform a BER test of an automorphism
//! ensemble decoder.
//!
//! # Examples
//!
//! The RM(2, 5) code can be simulated with an ensemble of 8 members with
//! ```shell
//! $ polar-ae ber 5 --reed-muller 2 --min-ebn0 0.0 --max-ebn0 4.05 \
//!       --step-ebn0 0.5 --ensemble-size 8
//! ```

use super::{CodeArgs, Run};
use crate::{
    decoder::factory::DecoderImplementation,
    simulation::ber::{BerTest, BerTestBuilder, Report, Reporter, Statistics},
};
use clap::Parser;
use console::Term;
use std::{
    error::Error,
    fs::File,
    io::Write,
    sync::mpsc::{self, Receiver},
    time::Duration,
};

/// BER test CLI arguments.
#[derive(Debug, Parser)]
#[command(about = "Performs a BER simulation")]
pub struct Args {
    #[command(flatten)]
    code: CodeArgs,
    /// Output file for simulation results
    #[arg(long)]
    output_file: Option<String>,
    /// Decoder implementation
    #[arg(long, default_value = "BoxPlus")]
    decoder: DecoderImplementation,
    /// Number of automorphism ensemble members (1 means plain SC)
    #[arg(long, default_value = "8")]
    ensemble_size: usize,
    /// Minimum Eb/N0 (dB)
    #[arg(long, allow_negative_numbers = true)]
    min_ebn0: f64,
    /// Maximum Eb/N0 (dB)
    #[arg(long, allow_negative_numbers = true)]
    max_ebn0: f64,
    /// Eb/N0 step (dB)
    #[arg(long, allow_negative_numbers = true)]
    step_ebn0: f64,
    /// Number of frame errors to collect
    #[arg(long, default_value = "100")]
    frame_errors: u64,
    /// Maximum number of frames to simulate at each Eb/N0
    #[arg(long)]
    max_frames: Option<u64>,
    /// Seed for the ensemble, the messages and the noise
    #[arg(long, default_value = "0")]
    seed: u64,
}

impl Run for Args {
    fn run(&self) -> Result<(), Box<dyn Error>> {
        let code = self.code.code()?;
        let mut output_file = if let Some(f) = &self.output_file {
            Some(File::create(f)?)
        } else {
            None
        };
        let ebn0s = self.ebn0s()?;
        let (report_tx, report_rx) = mpsc::channel();
        let reporter = Reporter {
            tx: report_tx,
            interval: Duration::from_millis(500),
        };
        let test = BerTestBuilder {
            code,
            decoder_implementation: self.decoder,
            ensemble_size: self.ensemble_size,
            max_frame_errors: self.frame_errors,
            max_frames: self.max_frames,
            ebn0s_db: &ebn0s,
            seed: self.seed,
            reporter: Some(reporter),
        }
        .build()?;
        self.write_details(std::io::stdout(), &test)?;
        if let Some(f) = &mut output_file {
            self.write_details(&*f, &test)?;
        }
        let mut progress = Progress::new(report_rx, output_file);
        let progress = std::thread::spawn(move || progress.run());
        test.run()?;
        // This block cannot actually be written with the ? operator
        #[allow(clippy::question_mark)]
        if let Err(e) = progress
            .join()
            .map_err(|_| "progress reporting thread panicked")?
        {
            return Err(e);
        }
        Ok(())
    }
}

impl Args {
    fn ebn0s(&self) -> Result<Vec<f32>, &'static str> {
        if !(self.step_ebn0 > 0.0 && self.step_ebn0.is_finite()) {
            return Err("Eb/N0 step must be positive");
        }
        if !(self.max_ebn0 >= self.min_ebn0) {
            return Err("maximum Eb/N0 is smaller than minimum Eb/N0");
        }
        let num_ebn0s = ((self.max_ebn0 - self.min_ebn0) / self.step_ebn0).floor() as usize + 1;
        Ok((0..num_ebn0s)
            .map(|k| (self.min_ebn0 + k as f64 * self.step_ebn0) as f32)
            .collect())
    }

    fn write_details<W: Write>(&self, mut f: W, test: &BerTest) -> std::io::Result<()> {
        writeln!(f, "BER TEST PARAMETERS")?;
        writeln!(f, "-------------------")?;
        writeln!(f, "Simulation:")?;
        writeln!(f, " - Minimum Eb/N0: {:.2} dB", self.min_ebn0)?;
        writeln!(f, " - Maximum Eb/N0: {:.2} dB", self.max_ebn0)?;
        writeln!(f, " - Eb/N0 step: {:.2} dB", self.step_ebn0)?;
        writeln!(f, " - Number of frame errors: {}", self.frame_errors)?;
        if let Some(max_frames) = self.max_frames {
            writeln!(f, " - Maximum number of frames: {max_frames}")?;
        }
        writeln!(f, " - Seed: {}", self.seed)?;
        writeln!(f, "Channel:")?;
        writeln!(f, " - Modulation: BPSK")?;
        writeln!(f, "Polar code:")?;
        writeln!(f, " - Construction: {}", self.code.description())?;
        writeln!(f, " - Information bits (k): {}", test.k())?;
        writeln!(f, " - Codeword size (N): {}", test.n())?;
        writeln!(f, " - Code rate: {:.3}", test.rate())?;
        writeln!(f, "AE decoder:")?;
        writeln!(f, " - Implementation: {}", test.decoder_implementation())?;
        writeln!(f, " - Ensemble size: {}", test.ensemble_size())?;
        writeln!(f)?;
        Ok(())
    }
}

#[derive(Debug)]
struct Progress {
    rx: Receiver<Report>,
    term: Term,
    output_file: Option<File>,
}

impl Progress {
    fn new(rx: Receiver<Report>, output_file: Option<File>) -> Progress {
        Progress {
            rx,
            term: Term::stdout(),
            output_file,
        }
    }

    fn run(&mut self) -> Result<(), Box<dyn Error + Send + Sync + 'static>> {
        ctrlc::set_handler({
            let term = self.term.clone();
            move || {
                let _ = term.write_line("");
                let _ = term.show_cursor();
                std::process::exit(0);
            }
        })?;

        let ret = self.work();
        self.term.write_line("")?;
        self.term.show_cursor()?;
        ret
    }

    fn work(&mut self) -> Result<(), Box<dyn Error + Send + Sync + 'static>> {
        self.term.set_title("polar-ae ber");
        self.term.hide_cursor()?;
        self.term.write_line(Self::format_header())?;
        if let Some(f) = &mut self.output_file {
            writeln!(f, "{}", Self::format_header())?;
        }
        let mut last_stats: Option<Statistics> = None;
        loop {
            // The sender is dropped when the BER test fails
            let Ok(report) = self.rx.recv() else {
                return Ok(());
            };
            let Report::Statistics(stats) = report else {
                // BER test has finished
                if let (Some(f), Some(s)) = (&mut self.output_file, &last_stats) {
                    writeln!(f, "{}", &Self::format_progress(s))?;
                }
                return Ok(());
            };
            if let Some(s) = &last_stats {
                if s.ebn0_db != stats.ebn0_db {
                    if let Some(f) = &mut self.output_file {
                        writeln!(f, "{}", &Self::format_progress(s))?;
                    }
                }
            }
            match &last_stats {
                Some(s) if s.ebn0_db == stats.ebn0_db => {
                    self.term.move_cursor_up(1)?;
                    self.term.clear_line()?;
                }
                _ => (),
            };
            self.term.write_line(&Self::format_progress(&stats))?;
            last_stats = Some(stats);
        }
    }

    fn format_header() -> &'static str {
        "  Eb/N0 |   Frames | Bit errs | Frame er |     BER |     FER | Avg metr | Throughp | Elapsed\n\
         --------|----------|----------|----------|---------|---------|----------|----------|----------"
    }

    fn format_progress(stats: &Statistics) -> String {
        format!(
            "{:7.2} | {:8} | {:8} | {:8} | {:7.2e} | {:7.2e} | {:8.3} | {:8.3} | {}",
            stats.ebn0_db,
            stats.num_frames,
            stats.bit_errors,
            stats.frame_errors,
            stats.ber,
            stats.fer,
            stats.average_metric,
            stats.throughput_mbps,
            humantime::format_duration(Duration::from_secs(stats.elapsed.as_secs()))
        )
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::cli::Args as CliArgs;

    fn parse(min: &str, max: &str, step: &str) -> Args {
        let args = CliArgs::try_parse_from([
            "polar-ae",
            "ber",
            "4",
            "--min-info-set",
            "6",
            "--min-ebn0",
            min,
            "--max-ebn0",
            max,
            "--step-ebn0",
            step,
        ])
        .unwrap();
        let CliArgs::BER(args) = args else {
            panic!("wrong subcommand");
        };
        args
    }

    #[test]
    fn ebn0_list() {
        assert_eq!(parse("0", "1", "0.5").ebn0s(), Ok(vec![0.0, 0.5, 1.0]));
        assert_eq!(parse("2", "2", "1").ebn0s(), Ok(vec![2.0]));
        assert!(parse("0", "1", "0").ebn0s().is_err());
        assert!(parse("0", "1", "-0.5").ebn0s().is_err());
        assert!(parse("1", "0", "0.5").ebn0s().is_err());
    }

    #[test]
    fn parse_ber_args() {
        let args = CliArgs::try_parse_from([
            "polar-ae",
            "ber",
            "5",
            "--reed-muller",
            "2",
            "--min-ebn0",
            "0",
            "--max-ebn0",
            "2",
            "--step-ebn0",
            "0.5",
            "--decoder",
            "MinSum",
        ])
        .unwrap();
        let CliArgs::BER(args) = args else {
            panic!("wrong subcommand");
        };
        assert_eq!(args.decoder, DecoderImplementation::MinSum);
        assert_eq!(args.ensemble_size, 8);
        assert_eq!(args.frame_errors, 100);
        assert_eq!(args.max_frames, None);
    }
}
