//! Automorphism ensemble SC decoder.
//!
//! The channel LLRs are permuted by each of M code automorphisms and the M
//! permuted copies are decoded in a single pass of the batched
//! [`ScDecoder`]. The candidate with the smallest path metric is mapped back
//! to the natural coordinate order and the message is recovered from it. Ties
//! are broken in favor of the lowest member index.
//!
//! The first ensemble member of a decoder built by
//! [`AeDecoder::with_random_automorphisms`] is always the identity, so the
//! winning metric is never worse than that of plain SC decoding.
//!
//! # References
//!
//! \[1\] C. Kestel, M. Geiselhart, L. Johannsen, S. ten Brink and N. Wehn,
//! "Automorphism Ensemble Polar Code Decoders for 6G URLLC," WSA & SCC 2023,
//! pp. 1-6.

use super::{arithmetic::ScArithmetic, sc::ScDecoder, DecoderOutput, Error};
use crate::{
    automorphism::{sample_automorphisms, Permutation},
    code::PolarCode,
    encoder::recover_message,
};
use log::debug;
use rand::Rng;
use rayon::prelude::*;
use std::cmp::Ordering;

/// Automorphism ensemble SC decoder.
#[derive(Debug, Clone)]
pub struct AeDecoder<A: ScArithmetic> {
    code: PolarCode,
    permutations: Vec<Permutation>,
    sc: ScDecoder<A>,
    metrics: Vec<f64>,
}

// Orders candidates by metric and then by member index.
fn compare_candidates(a: (usize, f64), b: (usize, f64)) -> Ordering {
    a.1.total_cmp(&b.1).then(a.0.cmp(&b.0))
}

impl<A: ScArithmetic> AeDecoder<A> {
    /// Creates an ensemble decoder from a list of automorphism permutations.
    ///
    /// The permutations are not checked to be automorphisms of the code. They
    /// must have the length of the code and there must be at least one.
    pub fn new(
        code: PolarCode,
        permutations: Vec<Permutation>,
        arithmetic: A,
    ) -> Result<AeDecoder<A>, Error> {
        if permutations.is_empty() {
            return Err(Error::EmptyEnsemble);
        }
        if let Some(p) = permutations.iter().find(|p| p.len() != code.length()) {
            return Err(Error::PermutationLength {
                expected: code.length(),
                got: p.len(),
            });
        }
        let sc = ScDecoder::new(&code, permutations.len(), arithmetic);
        debug!(
            "built AE decoder with {} members for a ({}, {}) code",
            permutations.len(),
            code.length(),
            code.dimension()
        );
        Ok(AeDecoder {
            metrics: vec![0.0; permutations.len()],
            code,
            permutations,
            sc,
        })
    }

    /// Creates an ensemble decoder with `ensemble_size` members.
    ///
    /// The first member is the identity and the remaining ones are drawn with
    /// [`sample_automorphisms`].
    pub fn with_random_automorphisms<R: Rng>(
        code: PolarCode,
        ensemble_size: usize,
        arithmetic: A,
        rng: &mut R,
    ) -> Result<AeDecoder<A>, Error> {
        if ensemble_size == 0 {
            return Err(Error::EmptyEnsemble);
        }
        let mut permutations = vec![Permutation::identity(code.length())];
        permutations.extend(sample_automorphisms(&code, ensemble_size - 1, rng));
        AeDecoder::new(code, permutations, arithmetic)
    }

    /// Creates a plain SC decoder, which is an ensemble containing only the
    /// identity.
    pub fn plain_sc(code: PolarCode, arithmetic: A) -> AeDecoder<A> {
        let permutations = vec![Permutation::identity(code.length())];
        let sc = ScDecoder::new(&code, 1, arithmetic);
        AeDecoder {
            metrics: vec![0.0],
            code,
            permutations,
            sc,
        }
    }

    /// Returns the code.
    pub fn code(&self) -> &PolarCode {
        &self.code
    }

    /// Returns the ensemble permutations.
    pub fn permutations(&self) -> &[Permutation] {
        &self.permutations
    }

    /// Returns the number of ensemble members M.
    pub fn ensemble_size(&self) -> usize {
        self.permutations.len()
    }

    /// Returns the path metrics of all the members in the last call to
    /// [`decode`](AeDecoder::decode).
    ///
    /// [`decode_parallel`](AeDecoder::decode_parallel) does not update them.
    pub fn metrics(&self) -> &[f64] {
        &self.metrics
    }

    fn check_length(&self, llrs: &[f64]) -> Result<(), Error> {
        if llrs.len() != self.code.length() {
            return Err(Error::LengthMismatch {
                expected: self.code.length(),
                got: llrs.len(),
            });
        }
        Ok(())
    }

    /// Decodes a codeword.
    ///
    /// All the ensemble members are decoded in a single batched SC pass on the
    /// calling thread.
    pub fn decode(&mut self, llrs: &[f64]) -> Result<DecoderOutput, Error> {
        self.check_length(llrs)?;
        let n = self.code.length();
        for (pi, row) in self
            .permutations
            .iter()
            .zip(self.sc.input_mut().chunks_exact_mut(n))
        {
            pi.gather(llrs, row);
        }
        self.sc.run(&mut self.metrics);
        let (member, metric) = self
            .metrics
            .iter()
            .copied()
            .enumerate()
            .min_by(|&a, &b| compare_candidates(a, b))
            .ok_or(Error::EmptyEnsemble)?;
        Ok(self.finish(member, metric, self.sc.codeword(member)))
    }

    /// Decodes a codeword evaluating the ensemble members in parallel.
    ///
    /// Each member is decoded independently on the rayon thread pool. The
    /// result is the same as that of [`decode`](AeDecoder::decode), but the
    /// per-member metrics are not stored, so [`metrics`](AeDecoder::metrics)
    /// keeps the values of the last batched decode.
    pub fn decode_parallel(&self, llrs: &[f64]) -> Result<DecoderOutput, Error> {
        self.check_length(llrs)?;
        let (member, metric, candidate) = self
            .permutations
            .par_iter()
            .enumerate()
            .map_init(
                || {
                    (
                        ScDecoder::new(&self.code, 1, self.sc.arithmetic().clone()),
                        [0.0],
                    )
                },
                |(sc, metric), (member, pi)| {
                    pi.gather(llrs, sc.input_mut());
                    sc.run(metric);
                    (member, metric[0], sc.codeword(0).to_vec())
                },
            )
            .reduce_with(|a, b| match compare_candidates((a.0, a.1), (b.0, b.1)) {
                Ordering::Greater => b,
                _ => a,
            })
            .ok_or(Error::EmptyEnsemble)?;
        Ok(self.finish(member, metric, &candidate))
    }

    fn finish(&self, member: usize, metric: f64, candidate: &[u8]) -> DecoderOutput {
        let mut codeword = vec![0; self.code.length()];
        self.permutations[member].scatter(candidate, &mut codeword);
        let message = recover_message(&self.code, codeword.clone());
        DecoderOutput {
            codeword,
            message,
            metric,
            member,
        }
    }
}
