//! SC decoder arithmetic.
//!
//! This module contains the trait [`ScArithmetic`], which defines the rules
//! used by the SC decoder to combine LLRs at each node of the decoding tree,
//! and its implementors [`BoxPlus`] (exact log-domain rule) and [`MinSum`]
//! (min-sum approximation). The SC decoder [`ScDecoder`](super::sc::ScDecoder)
//! is generic over this trait, so it is monomorphized for each rule.
//!
//! All the formulas are written in terms of `exp(-|x|)`, so that they stay
//! finite for arbitrarily large LLR magnitudes. The correction terms of the
//! exact rule vanish for infinite arguments.

/// SC decoder arithmetic.
///
/// Only the check node combination differs between implementations. The
/// frozen bit penalty, the hard decision and the bit node combination have
/// default implementations shared by all the rules.
pub trait ScArithmetic: std::fmt::Debug + Clone + Send + Sync {
    /// Check node combination `f(l, r)`.
    ///
    /// Computes the LLR of `u1 XOR u2` given LLRs `left` and `right` of `u1`
    /// and `u2`.
    fn check_combine(&self, left: f64, right: f64) -> f64;

    /// Bit node combination `g(l, r, b) = (-1)^b l + r`.
    fn bit_combine(&self, left: f64, right: f64, bit: u8) -> f64 {
        if bit == 0 {
            right + left
        } else {
            right - left
        }
    }

    /// Path metric penalty of deciding a frozen bit to zero.
    ///
    /// Equals `log(1 + exp(-llr))`.
    fn frozen_penalty(&self, llr: f64) -> f64 {
        softplus(-llr)
    }

    /// Hard decision on an LLR.
    fn hard_decision(&self, llr: f64) -> u8 {
        u8::from(llr < 0.0)
    }
}

/// Computes `log(1 + exp(x))` without overflow.
pub fn softplus(x: f64) -> f64 {
    x.max(0.0) + (-x.abs()).exp().ln_1p()
}

// log(1 + exp(-|x|)), which tends to 0 as |x| grows
fn correction(x: f64) -> f64 {
    if x.is_finite() {
        (-x.abs()).exp().ln_1p()
    } else {
        0.0
    }
}

// Like f64::signum, but returns 0 for 0.
fn sign(x: f64) -> f64 {
    if x > 0.0 {
        1.0
    } else if x < 0.0 {
        -1.0
    } else {
        0.0
    }
}

fn min_sum(left: f64, right: f64) -> f64 {
    sign(left) * sign(right) * left.abs().min(right.abs())
}

/// Exact box-plus check node rule.
///
/// `f(l, r) = sign(l) sign(r) min(|l|, |r|) + log(1 + exp(-|l + r|)) - log(1 +
/// exp(-|l - r|))`, which equals `2 atanh(tanh(l / 2) tanh(r / 2))`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct BoxPlus {}

impl BoxPlus {
    /// Creates a new [`BoxPlus`] decoder arithmetic object.
    pub fn new() -> BoxPlus {
        BoxPlus::default()
    }
}

impl ScArithmetic for BoxPlus {
    fn check_combine(&self, left: f64, right: f64) -> f64 {
        min_sum(left, right) + correction(left + right) - correction(left - right)
    }
}

/// Min-sum check node rule.
///
/// `f(l, r) = sign(l) sign(r) min(|l|, |r|)`. The frozen bit penalty is the
/// same exact formula used by [`BoxPlus`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct MinSum {}

impl MinSum {
    /// Creates a new [`MinSum`] decoder arithmetic object.
    pub fn new() -> MinSum {
        MinSum::default()
    }
}

impl ScArithmetic for MinSum {
    fn check_combine(&self, left: f64, right: f64) -> f64 {
        min_sum(left, right)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn box_plus_model(l: f64, r: f64) -> f64 {
        2.0 * ((0.5 * l).tanh() * (0.5 * r).tanh()).atanh()
    }

    #[test]
    fn softplus_values() {
        assert!((softplus(0.0) - 2f64.ln()).abs() < 1e-15);
        assert!((softplus(1.5) - (1.0 + 1.5f64.exp()).ln()).abs() < 1e-12);
        assert!((softplus(-3.0) - (1.0 + (-3.0f64).exp()).ln()).abs() < 1e-12);
        assert_eq!(softplus(1e6), 1e6);
        assert_eq!(softplus(-1e6), 0.0);
    }

    #[test]
    fn box_plus_matches_tanh_rule() {
        let a = BoxPlus::new();
        for &l in &[-4.0, -1.3, -0.2, 0.5, 2.0, 3.7] {
            for &r in &[-2.5, -0.7, 0.1, 1.1, 4.2] {
                let x = a.check_combine(l, r);
                assert!((x - box_plus_model(l, r)).abs() < 1e-9, "l = {l}, r = {r}");
            }
        }
    }

    #[test]
    fn box_plus_large_magnitudes() {
        let a = BoxPlus::new();
        let x = a.check_combine(1e4, -3e4);
        assert!(x.is_finite());
        assert!((x + 1e4).abs() < 1e-9);
        assert_eq!(a.check_combine(0.0, 5.0), 0.0);
    }

    #[test]
    fn box_plus_infinite_inputs() {
        let a = BoxPlus::new();
        let inf = f64::INFINITY;
        assert_eq!(a.check_combine(inf, inf), inf);
        assert_eq!(a.check_combine(-inf, inf), -inf);
        assert_eq!(a.check_combine(inf, 2.5), 2.5);
        assert_eq!(a.check_combine(-3.0, -inf), 3.0);
        // l + r overflows
        let x = a.check_combine(1.5e308, 1.5e308);
        assert_eq!(x, 1.5e308);
    }

    #[test]
    fn min_sum_rule() {
        let a = MinSum::new();
        assert_eq!(a.check_combine(2.0, -3.0), -2.0);
        assert_eq!(a.check_combine(-2.0, -0.5), 0.5);
        assert_eq!(a.check_combine(0.0, -0.5), 0.0);
        // min-sum overestimates the magnitude of the exact rule
        let b = BoxPlus::new();
        assert!(a.check_combine(1.0, 1.2).abs() > b.check_combine(1.0, 1.2).abs());
    }

    #[test]
    fn bit_combine() {
        let a = MinSum::new();
        assert_eq!(a.bit_combine(1.5, 2.0, 0), 3.5);
        assert_eq!(a.bit_combine(1.5, 2.0, 1), 0.5);
    }

    #[test]
    fn leaf_rules_agree() {
        let a = BoxPlus::new();
        let b = MinSum::new();
        for &llr in &[-1e3, -2.0, -1e-9, 0.0, 1e-9, 0.7, 1e3] {
            assert_eq!(a.hard_decision(llr), b.hard_decision(llr));
            assert_eq!(a.frozen_penalty(llr), b.frozen_penalty(llr));
            assert!(a.frozen_penalty(llr) >= 0.0);
        }
        assert_eq!(a.hard_decision(-0.1), 1);
        assert_eq!(a.hard_decision(0.0), 0);
    }
}
