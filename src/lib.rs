//! # Polar automorphism ensemble decoding
//!
//! `polar_ae` implements automorphism ensemble (AE) successive cancellation
//! decoding of polar codes and Reed-Muller codes.
//!
//! The decreasing monomial code is given by its indicator vector, which can be
//! built from a minimal information set (see [`code::construction`]). The
//! [`automorphism`] module detects the stabilizer block profile of the code
//! and samples random block lower-triangular affine automorphisms from it. The
//! [`decoder`] module runs one batched SC decoder over all the permuted copies
//! of the channel LLRs and keeps the candidate with the smallest path metric.
//!
//! It can be used as a Rust library or as a CLI tool. See [`cli`] for
//! documentation about the usage of the CLI tool.
//!
//! # Examples
//! ```
//! # use polar_ae::{
//! #     code::construction::reed_muller,
//! #     decoder::{arithmetic::BoxPlus, ensemble::AeDecoder},
//! #     encoder::Encoder,
//! #     rand::*,
//! # };
//! let code = reed_muller(2, 5).unwrap();
//! let encoder = Encoder::new(code.clone());
//! let message = vec![1; code.dimension()];
//! let codeword = encoder.encode(&message).unwrap();
//! let llrs: Vec<f64> = codeword
//!     .iter()
//!     .map(|&b| if b == 0 { 4.0 } else { -4.0 })
//!     .collect();
//! let mut rng = Rng::seed_from_u64(0);
//! let mut decoder =
//!     AeDecoder::with_random_automorphisms(code, 8, BoxPlus::new(), &mut rng).unwrap();
//! let output = decoder.decode(&llrs).unwrap();
//! assert_eq!(output.codeword, codeword);
//! assert_eq!(output.message, message);
//! ```

#![warn(missing_docs)]

pub mod automorphism;
pub mod cli;
pub mod code;
pub mod decoder;
pub mod encoder;
pub mod gf2;
pub mod rand;
pub mod simulation;
pub mod transform;
