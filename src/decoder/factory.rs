//! Polar decoder factory.
//!
//! This module contains routines to build an automorphism ensemble decoder
//! generically over the decoder arithmetic. Such decoders are represented by
//! `Box<dyn PolarDecoder>`, using the trait [`PolarDecoder`].

use super::{
    arithmetic::{BoxPlus, MinSum, ScArithmetic},
    ensemble::AeDecoder,
    DecoderOutput, Error,
};
use crate::{code::PolarCode, rand::Rng};
use clap::ValueEnum;
use enum_iterator::Sequence;

/// Generic polar decoder.
///
/// This trait is used to form polar decoder trait objects, abstracting over
/// the implementation of the decoder arithmetic.
pub trait PolarDecoder: std::fmt::Debug + Send {
    /// Decodes a codeword.
    ///
    /// The parameter is the vector of channel LLRs. The function returns the
    /// decoded codeword, the recovered message and the winning path metric,
    /// or an error if the number of LLRs does not match the code length.
    fn decode(&mut self, llrs: &[f64]) -> Result<DecoderOutput, Error>;

    /// Returns the number of ensemble members.
    fn ensemble_size(&self) -> usize;
}

impl<A: ScArithmetic> PolarDecoder for AeDecoder<A> {
    fn decode(&mut self, llrs: &[f64]) -> Result<DecoderOutput, Error> {
        AeDecoder::decode(self, llrs)
    }

    fn ensemble_size(&self) -> usize {
        AeDecoder::ensemble_size(self)
    }
}

/// Polar decoder implementation.
///
/// This enum lists the decoder implementations corresponding to different
/// check node combine rules.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, ValueEnum, Sequence)]
#[clap(rename_all = "verbatim")]
pub enum DecoderImplementation {
    /// The [`BoxPlus`] implementation, using the exact log-domain rule.
    BoxPlus,
    /// The [`MinSum`] implementation, using the min-sum approximation.
    MinSum,
}

impl DecoderImplementation {
    /// Builds an automorphism ensemble decoder.
    ///
    /// The ensemble has `ensemble_size` members: the identity followed by
    /// random automorphisms drawn from `rng`. An ensemble size of one gives
    /// plain SC decoding.
    pub fn build_decoder(
        &self,
        code: PolarCode,
        ensemble_size: usize,
        rng: &mut Rng,
    ) -> Result<Box<dyn PolarDecoder>, Error> {
        Ok(match self {
            DecoderImplementation::BoxPlus => Box::new(AeDecoder::with_random_automorphisms(
                code,
                ensemble_size,
                BoxPlus::new(),
                rng,
            )?),
            DecoderImplementation::MinSum => Box::new(AeDecoder::with_random_automorphisms(
                code,
                ensemble_size,
                MinSum::new(),
                rng,
            )?),
        })
    }
}

impl std::str::FromStr for DecoderImplementation {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "BoxPlus" => DecoderImplementation::BoxPlus,
            "MinSum" => DecoderImplementation::MinSum,
            _ => return Err("invalid decoder implementation"),
        })
    }
}

impl std::fmt::Display for DecoderImplementation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                DecoderImplementation::BoxPlus => "BoxPlus",
                DecoderImplementation::MinSum => "MinSum",
            }
        )
    }
}
