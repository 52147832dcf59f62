//! Polar encoder.
//!
//! The encoder places the message bits in the information coordinates of a
//! zero vector of length N and applies the [polar
//! transform](crate::transform::polar_transform). Since the transform is an
//! involution, the message is recovered from a codeword by transforming it
//! again and reading the information coordinates.

use crate::{code::PolarCode, transform::polar_transform};
use thiserror::Error;

/// Polar encoder error.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Error)]
pub enum Error {
    /// The message length does not match the code dimension.
    #[error("message has length {got} but the code dimension is {expected}")]
    MessageLength {
        /// Code dimension.
        expected: usize,
        /// Message length.
        got: usize,
    },
    /// The codeword length does not match the code length.
    #[error("codeword has length {got} but the code length is {expected}")]
    CodewordLength {
        /// Code length.
        expected: usize,
        /// Codeword length.
        got: usize,
    },
}

/// Polar encoder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Encoder {
    code: PolarCode,
}

impl Encoder {
    /// Creates the encoder for a polar code.
    pub fn new(code: PolarCode) -> Encoder {
        Encoder { code }
    }

    /// Returns the code used by the encoder.
    pub fn code(&self) -> &PolarCode {
        &self.code
    }

    /// Encodes a message into a codeword.
    ///
    /// # Examples
    /// ```
    /// # use polar_ae::{code::PolarCode, encoder::Encoder};
    /// let encoder = Encoder::new(PolarCode::new(vec![0, 1, 1, 1]).unwrap());
    /// assert_eq!(encoder.encode(&[1, 0, 1]).unwrap(), vec![0, 0, 1, 1]);
    /// ```
    pub fn encode(&self, message: &[u8]) -> Result<Vec<u8>, Error> {
        let expected = self.code.dimension();
        if message.len() != expected {
            return Err(Error::MessageLength {
                expected,
                got: message.len(),
            });
        }
        let mut codeword = vec![0; self.code.length()];
        for (&j, &b) in self.code.info_positions().iter().zip(message.iter()) {
            codeword[j] = b;
        }
        polar_transform(&mut codeword);
        Ok(codeword)
    }

    /// Recovers the message corresponding to a codeword.
    ///
    /// The frozen coordinates of the transformed codeword are ignored, so this
    /// can be applied to any word of length N.
    pub fn recover_message(&self, codeword: &[u8]) -> Result<Vec<u8>, Error> {
        if codeword.len() != self.code.length() {
            return Err(Error::CodewordLength {
                expected: self.code.length(),
                got: codeword.len(),
            });
        }
        Ok(recover_message(&self.code, codeword.to_vec()))
    }

    /// Returns `true` if `word` belongs to the code.
    pub fn is_codeword(&self, word: &[u8]) -> bool {
        if word.len() != self.code.length() {
            return false;
        }
        let mut u = word.to_vec();
        polar_transform(&mut u);
        u.iter()
            .zip(self.code.indicator().iter())
            .all(|(&x, &a)| a == 1 || x == 0)
    }
}

// Transforms `codeword` in place and extracts the information coordinates.
pub(crate) fn recover_message(code: &PolarCode, mut codeword: Vec<u8>) -> Vec<u8> {
    polar_transform(&mut codeword);
    code.info_positions().iter().map(|&j| codeword[j]).collect()
}
