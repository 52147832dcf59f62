//! Batched successive cancellation decoder.
//!
//! The decoder walks the binary tree of the polar transform. A node at depth
//! `d` (the root has depth 0) covers `N >> d` consecutive coordinates of the
//! transform input. Frozen leaves are decided to zero and add the penalty
//! `log(1 + exp(-llr))` to the path metric, rate-1 nodes (whose coordinates
//! are all information) are hard decided with no penalty, and every other node
//! decodes its two children in order:
//!
//! 1. the left child receives `f(l, r)`, the check combination of the left and
//!    right halves of the node LLRs, and returns `x1`;
//! 2. the right child receives `g(l, r, x1)` and returns `x2`;
//! 3. the node returns `(x1 XOR x2, x2)`.
//!
//! All the operations are applied to every row of the batch before moving to
//! the next node. The recursion is indexed by the depth, which never exceeds
//! n, and each depth owns preallocated LLR and bit buffers.
//!
//! The input LLRs are saturated to `±LLR_LIMIT / N` before decoding. The bit
//! node combination at most doubles the magnitudes at each depth, so every
//! intermediate LLR stays within `±LLR_LIMIT` and infinite channel LLRs (for
//! instance from a noiseless channel) are decoded like very reliable ones.

use super::{arithmetic::ScArithmetic, Error};
use crate::code::PolarCode;

/// Largest LLR magnitude seen by any node of the decoding tree.
pub const LLR_LIMIT: f64 = 1e300;

/// Batched SC decoder.
///
/// Decodes `batch` LLR vectors of length N at once. LLRs and decoded bits are
/// stored row-major, one row per batch element.
#[derive(Debug, Clone)]
pub struct ScDecoder<A: ScArithmetic> {
    arithmetic: A,
    length: usize,
    batch: usize,
    // rate_one[d][i] is true if node i at depth d only covers information
    // coordinates
    rate_one: Box<[Box<[bool]>]>,
    llrs: Box<[Box<[f64]>]>,
    bits: Box<[Box<[u8]>]>,
}

impl<A: ScArithmetic> ScDecoder<A> {
    /// Creates a new batched SC decoder for `batch` LLR vectors.
    pub fn new(code: &PolarCode, batch: usize, arithmetic: A) -> ScDecoder<A> {
        let n = code.log_length();
        let length = code.length();
        let mut rate_one = vec![Box::<[bool]>::default(); n + 1];
        rate_one[n] = code.indicator().iter().map(|&a| a == 1).collect();
        for depth in (0..n).rev() {
            rate_one[depth] = rate_one[depth + 1]
                .chunks_exact(2)
                .map(|pair| pair[0] && pair[1])
                .collect();
        }
        let llrs = (0..=n)
            .map(|depth| vec![0.0; batch * (length >> depth)].into_boxed_slice())
            .collect();
        let bits = (0..=n)
            .map(|depth| vec![0; batch * (length >> depth)].into_boxed_slice())
            .collect();
        ScDecoder {
            arithmetic,
            length,
            batch,
            rate_one: rate_one.into_boxed_slice(),
            llrs,
            bits,
        }
    }

    /// Returns the number of rows decoded at once.
    pub fn batch(&self) -> usize {
        self.batch
    }

    /// Returns the decoder arithmetic.
    pub fn arithmetic(&self) -> &A {
        &self.arithmetic
    }

    /// Decodes a batch of LLR vectors.
    ///
    /// `llrs` contains `batch` rows of N LLRs. On return, `metrics[i]` holds
    /// the path metric of row `i` and the decoded bits can be obtained with
    /// [`codeword`](ScDecoder::codeword).
    pub fn decode(&mut self, llrs: &[f64], metrics: &mut [f64]) -> Result<(), Error> {
        let expected = self.batch * self.length;
        if llrs.len() != expected {
            return Err(Error::LengthMismatch {
                expected,
                got: llrs.len(),
            });
        }
        self.input_mut().copy_from_slice(llrs);
        self.run(metrics);
        Ok(())
    }

    /// Returns the input LLR buffer.
    ///
    /// This can be filled in place before calling [`run`](ScDecoder::run) to
    /// avoid copying the LLRs.
    pub fn input_mut(&mut self) -> &mut [f64] {
        &mut self.llrs[0]
    }

    /// Decodes the LLRs stored in the input buffer.
    ///
    /// # Panics
    ///
    /// Panics if `metrics` is shorter than the batch.
    pub fn run(&mut self, metrics: &mut [f64]) {
        let metrics = &mut metrics[..self.batch];
        metrics.fill(0.0);
        let limit = LLR_LIMIT / self.length as f64;
        for llr in self.llrs[0].iter_mut() {
            *llr = llr.clamp(-limit, limit);
        }
        self.decode_node(0, 0, metrics);
    }

    /// Returns the decoded bits of a batch row.
    pub fn codeword(&self, row: usize) -> &[u8] {
        &self.bits[0][row * self.length..(row + 1) * self.length]
    }

    fn decode_node(&mut self, depth: usize, node: usize, metrics: &mut [f64]) {
        let size = self.length >> depth;
        let arithmetic = &self.arithmetic;
        let rows = self.batch;

        if self.rate_one[depth][node] {
            for (b, &llr) in self.bits[depth].iter_mut().zip(self.llrs[depth].iter()) {
                *b = arithmetic.hard_decision(llr);
            }
            return;
        }
        if size == 1 {
            // frozen leaf
            self.bits[depth].fill(0);
            for (m, &llr) in metrics.iter_mut().zip(self.llrs[depth].iter()) {
                *m += arithmetic.frozen_penalty(llr);
            }
            return;
        }

        let half = size / 2;
        {
            let (parent, child) = self.llrs.split_at_mut(depth + 1);
            let (input, output) = (&parent[depth], &mut child[0]);
            for row in 0..rows {
                let (l, r) = input[row * size..(row + 1) * size].split_at(half);
                let out = &mut output[row * half..(row + 1) * half];
                for ((y, &a), &b) in out.iter_mut().zip(l.iter()).zip(r.iter()) {
                    *y = arithmetic.check_combine(a, b);
                }
            }
        }
        self.decode_node(depth + 1, 2 * node, metrics);

        let arithmetic = &self.arithmetic;
        {
            let (parent, child) = self.llrs.split_at_mut(depth + 1);
            let (input, output) = (&parent[depth], &mut child[0]);
            let (parent_bits, child_bits) = self.bits.split_at_mut(depth + 1);
            let (node_bits, x1) = (&mut parent_bits[depth], &child_bits[0]);
            for row in 0..rows {
                let (l, r) = input[row * size..(row + 1) * size].split_at(half);
                let x1 = &x1[row * half..(row + 1) * half];
                let out = &mut output[row * half..(row + 1) * half];
                for (((y, &a), &b), &x) in out.iter_mut().zip(l.iter()).zip(r.iter()).zip(x1) {
                    *y = arithmetic.bit_combine(a, b, x);
                }
                // keep x1 in the upper half of this node's bits while the
                // right child overwrites the child buffer
                node_bits[row * size..row * size + half].copy_from_slice(x1);
            }
        }
        self.decode_node(depth + 1, 2 * node + 1, metrics);

        let (parent_bits, child_bits) = self.bits.split_at_mut(depth + 1);
        let (node_bits, x2) = (&mut parent_bits[depth], &child_bits[0]);
        for row in 0..rows {
            let x2 = &x2[row * half..(row + 1) * half];
            let (upper, lower) = node_bits[row * size..(row + 1) * size].split_at_mut(half);
            for (u, &x) in upper.iter_mut().zip(x2.iter()) {
                *u ^= x;
            }
            lower.copy_from_slice(x2);
        }
    }
}

#[cfg(test)]
mod test {
    use super::super::arithmetic::{softplus, BoxPlus, MinSum};
    use super::*;
    use crate::code::construction::{from_min_info_set, reed_muller};
    use crate::encoder::Encoder;
    use crate::rand::{Rng, *};
    use crate::simulation::{
        channel::AwgnChannel,
        modulation::{BpskDemodulator, BpskModulator},
    };

    // Direct transcription of the recursive SC rules, used as a reference.
    fn sc_model<A: ScArithmetic>(a: &A, llrs: &[f64], indicator: &[u8]) -> (Vec<u8>, f64) {
        let size = llrs.len();
        if size == 1 && indicator[0] == 0 {
            return (vec![0], softplus(-llrs[0]));
        }
        if indicator.iter().all(|&x| x == 1) {
            return (llrs.iter().map(|&x| u8::from(x < 0.0)).collect(), 0.0);
        }
        let half = size / 2;
        let (l, r) = llrs.split_at(half);
        let f: Vec<f64> = l
            .iter()
            .zip(r)
            .map(|(&x, &y)| a.check_combine(x, y))
            .collect();
        let (x1, m1) = sc_model(a, &f, &indicator[..half]);
        let g: Vec<f64> = l
            .iter()
            .zip(r)
            .zip(&x1)
            .map(|((&x, &y), &b)| a.bit_combine(x, y, b))
            .collect();
        let (x2, m2) = sc_model(a, &g, &indicator[half..]);
        let mut x: Vec<u8> = x1.iter().zip(&x2).map(|(&p, &q)| p ^ q).collect();
        x.extend_from_slice(&x2);
        (x, m1 + m2)
    }

    fn bpsk_llrs(codeword: &[u8], amplitude: f64) -> Vec<f64> {
        codeword
            .iter()
            .map(|&b| if b == 0 { amplitude } else { -amplitude })
            .collect()
    }

    #[test]
    fn noiseless_decoding() {
        let code = from_min_info_set(&[7, 12], 5).unwrap();
        let encoder = Encoder::new(code.clone());
        let mut decoder = ScDecoder::new(&code, 1, BoxPlus::new());
        let mut metric = [0.0];
        for seed in 0..8u32 {
            let message: Vec<u8> = (0..code.dimension())
                .map(|j| ((j as u32 * 7 + seed) % 3 == 0) as u8)
                .collect();
            let codeword = encoder.encode(&message).unwrap();
            decoder
                .decode(&bpsk_llrs(&codeword, 20.0), &mut metric)
                .unwrap();
            assert_eq!(decoder.codeword(0), &codeword[..]);
            assert!(metric[0] < 1e-3);
        }
    }

    #[test]
    fn four_bit_code_metric() {
        // a = [0, 1, 1, 1] and message [1, 0, 1] give the codeword [0, 0, 1,
        // 1]. The observation favors flipping positions 0 and 3.
        let code = PolarCode::new(vec![0, 1, 1, 1]).unwrap();
        let codeword = Encoder::new(code.clone()).encode(&[1, 0, 1]).unwrap();
        assert_eq!(codeword, vec![0, 0, 1, 1]);
        let llrs = [-0.5, 2.0, -2.0, 0.8];

        // Min-sum: f(-0.5, -2.0) = 0.5 and f(2.0, 0.8) = 0.8, so the frozen
        // leaf sees f(0.5, 0.8) = 0.5. Every other leaf is rate-1.
        let mut decoder = ScDecoder::new(&code, 1, MinSum::new());
        let mut metric = [0.0];
        decoder.decode(&llrs, &mut metric).unwrap();
        assert!((metric[0] - (1.0 + (-0.5f64).exp()).ln()).abs() < 1e-12);
        assert_eq!(decoder.codeword(0), &[1, 0, 1, 0]);

        // Exact rule, evaluated step by step.
        let bp = |l: f64, r: f64| {
            l.signum() * r.signum() * l.abs().min(r.abs()) + (1.0 + (-(l + r).abs()).exp()).ln()
                - (1.0 + (-(l - r).abs()).exp()).ln()
        };
        let leaf = bp(bp(-0.5, -2.0), bp(2.0, 0.8));
        let mut decoder = ScDecoder::new(&code, 1, BoxPlus::new());
        decoder.decode(&llrs, &mut metric).unwrap();
        assert!((metric[0] - (1.0 + (-leaf).exp()).ln()).abs() < 1e-12);
        assert_eq!(decoder.codeword(0), &[1, 0, 1, 0]);
    }

    #[test]
    fn matches_recursive_model() {
        let codes = [
            from_min_info_set(&[3, 4], 3).unwrap(),
            from_min_info_set(&[7, 24], 5).unwrap(),
            from_min_info_set(&[6], 4).unwrap(),
            reed_muller(2, 6).unwrap(),
            reed_muller(0, 4).unwrap(),
        ];
        let mut state = 0x2545_f491_4f6c_dd1du64;
        let mut next_llr = || {
            // xorshift, mapped to [-4, 4)
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            (state >> 11) as f64 / (1u64 << 53) as f64 * 8.0 - 4.0
        };
        for code in codes.iter() {
            let batch = 3;
            let llrs: Vec<f64> = (0..batch * code.length()).map(|_| next_llr()).collect();
            let mut exact = ScDecoder::new(code, batch, BoxPlus::new());
            let mut approx = ScDecoder::new(code, batch, MinSum::new());
            let mut metrics = vec![0.0; batch];
            exact.decode(&llrs, &mut metrics).unwrap();
            for row in 0..batch {
                let row_llrs = &llrs[row * code.length()..(row + 1) * code.length()];
                let (bits, metric) = sc_model(&BoxPlus::new(), row_llrs, code.indicator());
                assert_eq!(exact.codeword(row), &bits[..]);
                assert!((metrics[row] - metric).abs() < 1e-9);
            }
            approx.decode(&llrs, &mut metrics).unwrap();
            for row in 0..batch {
                let row_llrs = &llrs[row * code.length()..(row + 1) * code.length()];
                let (bits, metric) = sc_model(&MinSum::new(), row_llrs, code.indicator());
                assert_eq!(approx.codeword(row), &bits[..]);
                assert!((metrics[row] - metric).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn decoded_words_are_codewords() {
        let code = from_min_info_set(&[5], 4).unwrap();
        let encoder = Encoder::new(code.clone());
        let batch = 4;
        let llrs: Vec<f64> = (0..batch * code.length())
            .map(|j| ((j * 37 % 11) as f64 - 5.0) * 0.7)
            .collect();
        let mut decoder = ScDecoder::new(&code, batch, BoxPlus::new());
        let mut metrics = vec![0.0; batch];
        decoder.decode(&llrs, &mut metrics).unwrap();
        for row in 0..batch {
            assert!(encoder.is_codeword(decoder.codeword(row)));
            assert!(metrics[row] >= 0.0);
        }
    }

    fn decode_extreme<A: ScArithmetic>(arithmetic: A, amplitude: f64) {
        let code = reed_muller(1, 3).unwrap();
        let encoder = Encoder::new(code.clone());
        let message = [1, 0, 1, 1];
        let codeword = encoder.encode(&message).unwrap();
        let mut decoder = ScDecoder::new(&code, 1, arithmetic);
        let mut metric = [0.0];
        decoder
            .decode(&bpsk_llrs(&codeword, amplitude), &mut metric)
            .unwrap();
        assert_eq!(decoder.codeword(0), &codeword[..]);
        assert_eq!(
            encoder.recover_message(decoder.codeword(0)).unwrap(),
            message
        );
        assert!(metric[0].is_finite());
        assert!(metric[0] < 1e-9);
    }

    #[test]
    fn extreme_llrs() {
        for amplitude in [1e300, 1e308, f64::MAX, f64::INFINITY] {
            decode_extreme(BoxPlus::new(), amplitude);
            decode_extreme(MinSum::new(), amplitude);
        }
    }

    fn decode_noiseless<A: ScArithmetic>(arithmetic: A) {
        // Zero noise gives infinite LLRs
        let code = from_min_info_set(&[7, 24], 5).unwrap();
        let encoder = Encoder::new(code.clone());
        let message: Vec<u8> = (0..code.dimension()).map(|j| (j % 3 == 1) as u8).collect();
        let codeword = encoder.encode(&message).unwrap();
        let mut symbols = BpskModulator::new().modulate(&codeword);
        AwgnChannel::new(0.0).add_noise(&mut Rng::seed_from_u64(0), &mut symbols);
        let llrs = BpskDemodulator::new(0.0).demodulate(&symbols);
        assert!(llrs.iter().all(|x| x.is_infinite()));
        let mut decoder = ScDecoder::new(&code, 1, arithmetic);
        let mut metric = [0.0];
        decoder.decode(&llrs, &mut metric).unwrap();
        assert_eq!(decoder.codeword(0), &codeword[..]);
        assert_eq!(
            encoder.recover_message(decoder.codeword(0)).unwrap(),
            message
        );
        assert_eq!(metric[0], 0.0);
    }

    #[test]
    fn noiseless_channel() {
        decode_noiseless(BoxPlus::new());
        decode_noiseless(MinSum::new());
    }

    #[test]
    fn saturation_keeps_metric_finite() {
        // The frozen bit receives a saturated negative LLR and pays a huge but
        // finite penalty
        let code = PolarCode::new(vec![0, 1, 1, 1]).unwrap();
        let mut decoder = ScDecoder::new(&code, 1, BoxPlus::new());
        let mut metric = [0.0];
        let inf = f64::INFINITY;
        decoder.decode(&[-inf, inf, inf, inf], &mut metric).unwrap();
        assert!(metric[0].is_finite());
        assert!(metric[0] > 1e200);
        assert!(Encoder::new(code).is_codeword(decoder.codeword(0)));
    }

    #[test]
    fn length_mismatch() {
        let code = reed_muller(1, 3).unwrap();
        let mut decoder = ScDecoder::new(&code, 2, MinSum::new());
        let mut metrics = [0.0; 2];
        assert_eq!(
            decoder.decode(&[0.0; 8], &mut metrics),
            Err(Error::LengthMismatch {
                expected: 16,
                got: 8
            })
        );
    }
}
