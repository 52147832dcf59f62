//! BPSK modulation and demodulation.
//!
//! The modulator maps the bit 0 to the symbol -1.0 and the bit 1 to the symbol
//! +1.0. The demodulator computes the LLRs `log(P(0) / P(1))` of the received
//! symbols, so that a negative LLR corresponds to a hard decision of 1.

/// BPSK modulator.
#[derive(Debug, Clone, Default)]
pub struct BpskModulator {}

impl BpskModulator {
    /// Creates a new BPSK modulator.
    pub fn new() -> BpskModulator {
        BpskModulator::default()
    }

    /// Modulates a sequence of bits into symbols.
    pub fn modulate(&self, codeword: &[u8]) -> Vec<f64> {
        codeword
            .iter()
            .map(|&b| if b == 0 { -1.0 } else { 1.0 })
            .collect()
    }
}

/// BPSK demodulator.
///
/// Assumes the same mapping as the [BpskModulator].
#[derive(Debug, Clone, Default)]
pub struct BpskDemodulator {
    scale: f64,
}

impl BpskDemodulator {
    /// Creates a new BPSK demodulator.
    ///
    /// The `noise_sigma` indicates the channel noise standard deviation. The
    /// channel noise is assumed to be a real Gaussian with mean zero and
    /// standard deviation `noise_sigma`.
    pub fn new(noise_sigma: f64) -> BpskDemodulator {
        BpskDemodulator {
            // Negative scale because we use the convention that +1 means a 1
            // bit.
            scale: -2.0 / (noise_sigma * noise_sigma),
        }
    }

    /// Returns the LLRs corresponding to a sequence of symbols.
    pub fn demodulate(&self, symbols: &[f64]) -> Vec<f64> {
        symbols.iter().map(|&x| self.scale * x).collect()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn modulate() {
        let x = BpskModulator::new().modulate(&[1, 0, 0, 1]);
        assert_eq!(&x, &[1.0, -1.0, -1.0, 1.0]);
    }

    #[test]
    fn demodulate() {
        let demod = BpskDemodulator::new(1.0);
        let llrs = demod.demodulate(&[1.0, -0.5]);
        assert_eq!(&llrs, &[-2.0, 1.0]);
    }
}
