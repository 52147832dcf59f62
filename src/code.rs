//! Polar code definition.
//!
//! A polar code of length N = 2^n is described by its indicator vector `a`,
//! where `a[i] = 1` marks an information coordinate of the transform input and
//! `a[i] = 0` a frozen coordinate (always zero). The [`PolarCode`] struct owns
//! a validated indicator vector and is shared read-only by the encoder, the
//! automorphism sampler and the decoders.
//!
//! The [`construction`] module contains routines to build the indicator vector
//! of Reed-Muller codes and of polar codes given by a minimal information set.

use thiserror::Error;

pub mod construction;

/// Polar code construction error.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Error)]
pub enum Error {
    /// The length of the indicator vector is not a power of two.
    #[error("indicator vector length {0} is not a power of two")]
    NotPowerOfTwo(usize),
    /// The indicator vector contains an entry different from 0 and 1.
    #[error("indicator vector entry {value} at position {position} is not 0 or 1")]
    InvalidIndicator {
        /// Position of the offending entry.
        position: usize,
        /// Value of the offending entry.
        value: u8,
    },
    /// A coordinate index is outside the code length.
    #[error("index {index} is out of range for a code of length {length}")]
    IndexOutOfRange {
        /// Offending index.
        index: usize,
        /// Code length.
        length: usize,
    },
    /// The number of index bits is too large.
    #[error("{n} index bits exceed the maximum of {max}")]
    TooManyIndexBits {
        /// Requested number of index bits.
        n: usize,
        /// Largest supported number of index bits.
        max: usize,
    },
    /// The Reed-Muller order is larger than the number of variables.
    #[error("Reed-Muller order {r} is larger than the number of variables {n}")]
    InvalidOrder {
        /// Requested order.
        r: usize,
        /// Number of variables.
        n: usize,
    },
}

/// Largest number of index bits n accepted by the constructions in
/// [`construction`].
pub const MAX_LOG_LENGTH: usize = 30;

/// Polar code.
///
/// # Examples
/// ```
/// # use polar_ae::code::PolarCode;
/// let code = PolarCode::new(vec![0, 1, 1, 1]).unwrap();
/// assert_eq!(code.length(), 4);
/// assert_eq!(code.log_length(), 2);
/// assert_eq!(code.dimension(), 3);
/// assert_eq!(code.info_positions(), &[1, 2, 3]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PolarCode {
    indicator: Box<[u8]>,
    info_positions: Box<[usize]>,
    log_length: usize,
}

impl PolarCode {
    /// Creates a polar code from its indicator vector.
    ///
    /// The length of the vector must be a power of two and its entries must be
    /// `0` (frozen) or `1` (information).
    pub fn new(indicator: Vec<u8>) -> Result<PolarCode, Error> {
        if !indicator.len().is_power_of_two() {
            return Err(Error::NotPowerOfTwo(indicator.len()));
        }
        if let Some((position, &value)) = indicator.iter().enumerate().find(|(_, &x)| x > 1) {
            return Err(Error::InvalidIndicator { position, value });
        }
        let info_positions = indicator
            .iter()
            .enumerate()
            .filter_map(|(j, &x)| if x == 1 { Some(j) } else { None })
            .collect();
        Ok(PolarCode {
            log_length: indicator.len().trailing_zeros() as usize,
            indicator: indicator.into_boxed_slice(),
            info_positions,
        })
    }

    /// Returns the code length N.
    pub fn length(&self) -> usize {
        self.indicator.len()
    }

    /// Returns n = log2(N).
    pub fn log_length(&self) -> usize {
        self.log_length
    }

    /// Returns the number of information bits k.
    pub fn dimension(&self) -> usize {
        self.info_positions.len()
    }

    /// Returns the code rate k / N.
    pub fn rate(&self) -> f64 {
        self.dimension() as f64 / self.length() as f64
    }

    /// Returns the indicator vector.
    pub fn indicator(&self) -> &[u8] {
        &self.indicator
    }

    /// Returns `true` if coordinate `index` is an information coordinate.
    pub fn is_info(&self, index: usize) -> bool {
        self.indicator[index] == 1
    }

    /// Returns the information positions in increasing order.
    pub fn info_positions(&self) -> &[usize] {
        &self.info_positions
    }
}

impl std::fmt::Display for PolarCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for &x in self.indicator.iter() {
            write!(f, "{x}")?;
        }
        Ok(())
    }
}
