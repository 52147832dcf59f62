//! Finite field GF(2) arithmetic.
//!
//! This module contains the struct [GF2], which is used as the element type of
//! the binary matrices that describe linear automorphisms of a polar code.

use core::ops::{Add, AddAssign, Mul, MulAssign};
use num_traits::{One, Zero};

/// Finite field GF(2) element.
///
/// Addition is the XOR of the two bits and multiplication is the AND.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default)]
pub struct GF2(u8);

impl GF2 {
    /// Builds an element from the least significant bit of `bit`.
    pub fn from_bit(bit: u8) -> GF2 {
        GF2(bit & 1)
    }

    /// Returns the element as a bit (`0` or `1`).
    pub fn bit(self) -> u8 {
        self.0
    }
}

impl From<bool> for GF2 {
    fn from(b: bool) -> GF2 {
        GF2(u8::from(b))
    }
}

impl From<GF2> for u8 {
    fn from(x: GF2) -> u8 {
        x.0
    }
}

impl Zero for GF2 {
    fn zero() -> GF2 {
        GF2(0)
    }

    fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl One for GF2 {
    fn one() -> GF2 {
        GF2(1)
    }
}

impl Add for GF2 {
    type Output = GF2;

    #[allow(clippy::suspicious_arithmetic_impl)]
    fn add(self, rhs: GF2) -> GF2 {
        GF2(self.0 ^ rhs.0)
    }
}

impl Mul for GF2 {
    type Output = GF2;

    #[allow(clippy::suspicious_arithmetic_impl)]
    fn mul(self, rhs: GF2) -> GF2 {
        GF2(self.0 & rhs.0)
    }
}

macro_rules! impl_assign_ops {
    ($($op:ident, $opmethod:ident, $opassign:ident, $opassign_method:ident);*) => {
        $(
            impl $op<&GF2> for GF2 {
                type Output = GF2;
                fn $opmethod(self, rhs: &GF2) -> GF2 {
                    self.$opmethod(*rhs)
                }
            }

            impl $opassign for GF2 {
                fn $opassign_method(&mut self, rhs: GF2) {
                    *self = self.$opmethod(rhs);
                }
            }
        )*
    };
}

impl_assign_ops!(Add, add, AddAssign, add_assign; Mul, mul, MulAssign, mul_assign);

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn ops() {
        let o = GF2::zero();
        let i = GF2::one();
        assert_eq!(o + o, o);
        assert_eq!(o + i, i);
        assert_eq!(i + o, i);
        assert_eq!(i + i, o);
        assert_eq!(o * i, o);
        assert_eq!(i * i, i);
        let mut x = i;
        x += i;
        assert!(x.is_zero());
        x += i;
        assert!(x.is_one());
        assert_eq!(i + &i, o);
    }

    #[test]
    fn bit_conversions() {
        assert_eq!(GF2::from_bit(3), GF2::one());
        assert_eq!(GF2::from_bit(2), GF2::zero());
        assert_eq!(u8::from(GF2::from(true)), 1);
        assert_eq!(GF2::from(false).bit(), 0);
    }
}
