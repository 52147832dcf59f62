//! # Reproducible random functions
//!
//! Automorphism sampling and the BER simulation draw their randomness from
//! the [`ChaCha8Rng`] RNG of the [rand_chacha] crate, which is always passed
//! explicitly by reference. Seeding it gives reproducible ensembles.
//!
//! # Examples
//! ```
//! # use polar_ae::rand::Rng;
//! # use polar_ae::rand::*;
//! let seed = 42;
//! let mut rng = Rng::seed_from_u64(seed);
//! assert_eq!(rng.next_u64(), 12578764544318200737);
//! ```
use rand_chacha::ChaCha8Rng;
pub use rand_chacha::rand_core::SeedableRng;
pub use rand_core::RngCore;

/// The RNG used throughout this crate for pseudorandom generation.
pub type Rng = ChaCha8Rng;
