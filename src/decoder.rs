//! Polar code decoders.
//!
//! This module provides a batched successive cancellation (SC) decoder,
//! [`sc::ScDecoder`], which decodes several LLR vectors at once and returns a
//! path metric for each of them, and the automorphism ensemble decoder
//! [`ensemble::AeDecoder`] built on top of it. The check node combine rule used
//! by SC decoding is selected through the [`arithmetic::ScArithmetic`] trait.
//!
//! LLRs follow the convention `llr = log(P(bit = 0) / P(bit = 1))`, so a
//! negative LLR corresponds to a hard decision of 1.

use thiserror::Error;

pub mod arithmetic;
pub mod ensemble;
pub mod factory;
pub mod sc;

/// Polar decoder error.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Error)]
pub enum Error {
    /// The number of LLRs does not match the code length.
    #[error("got {got} LLRs but expected {expected}")]
    LengthMismatch {
        /// Expected number of LLRs.
        expected: usize,
        /// Number of LLRs supplied.
        got: usize,
    },
    /// The decoder was built with no ensemble members.
    #[error("the automorphism ensemble is empty")]
    EmptyEnsemble,
    /// A permutation does not have the length of the code.
    #[error("permutation has length {got} but the code length is {expected}")]
    PermutationLength {
        /// Code length.
        expected: usize,
        /// Permutation length.
        got: usize,
    },
}

/// Polar decoder output.
#[derive(Debug, Clone, PartialEq)]
pub struct DecoderOutput {
    /// Decoded codeword.
    ///
    /// Hard decision bits of the decoded codeword in the natural coordinate
    /// order.
    pub codeword: Vec<u8>,
    /// Decoded message.
    ///
    /// Information bits recovered from the decoded codeword.
    pub message: Vec<u8>,
    /// Path metric of the decoded codeword.
    ///
    /// Accumulated penalty of the SC decisions. Lower means more likely.
    pub metric: f64,
    /// Ensemble member that produced the decoded codeword.
    pub member: usize,
}
