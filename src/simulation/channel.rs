//! Channel simulation.
//!
//! This module contains the simulation of an AWGN channel.

use rand::Rng;
use rand_distr::{Distribution, Normal};

/// AWGN channel simulation.
///
/// This struct is used to add AWGN to BPSK symbols.
#[derive(Debug, Clone)]
pub struct AwgnChannel {
    noise_sigma: f64,
    distr: Normal<f64>,
}

impl AwgnChannel {
    /// Creates a new AWGN channel.
    ///
    /// The channel noise follows a (real) normal distribution with mean zero
    /// and standard deviation sigma.
    ///
    /// # Panics
    ///
    /// This function panics if `noise_sigma` is negative or not finite.
    pub fn new(noise_sigma: f64) -> AwgnChannel {
        assert!(noise_sigma >= 0.0);
        AwgnChannel {
            noise_sigma,
            distr: Normal::new(0.0, noise_sigma).unwrap(),
        }
    }

    /// Creates the AWGN channel corresponding to an Eb/N0.
    ///
    /// The symbols are assumed to have unit energy, so that `Es/N0 = rate *
    /// Eb/N0` and `sigma^2 = 1 / (2 Es/N0)`.
    pub fn from_ebn0_db(ebn0_db: f64, rate: f64) -> AwgnChannel {
        let ebn0 = 10.0_f64.powf(0.1 * ebn0_db);
        let esn0 = rate * ebn0;
        AwgnChannel::new((0.5 / esn0).sqrt())
    }

    /// Returns the noise standard deviation.
    pub fn noise_sigma(&self) -> f64 {
        self.noise_sigma
    }

    /// Adds noise to a sequence of symbols.
    ///
    /// The noise is added in-place to the slice `symbols`. An [Rng] is used as
    /// source of randomness.
    pub fn add_noise<R: Rng>(&self, rng: &mut R, symbols: &mut [f64]) {
        for x in symbols.iter_mut() {
            *x += self.distr.sample(rng);
        }
    }
}
