use crate::gf2::GF2;
use ndarray::{s, Array2};
use num_traits::Zero;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Error {
    NotInvertible,
}

// Reduces a square GF(2) matrix to upper triangular form with ones on the
// diagonal. Fails as soon as a column has no pivot.
pub fn upper_triangular_reduction(array: &mut Array2<GF2>) -> Result<(), Error> {
    let (n, m) = array.dim();
    for j in 0..n.min(m) {
        // Find non-zero element in current column
        let Some(k) = array
            .slice(s![j.., j])
            .iter()
            .position(|x| !x.is_zero())
            .map(|t| j + t)
        else {
            return Err(Error::NotInvertible);
        };

        if k != j {
            for t in j..m {
                array.swap([j, t], [k, t]);
            }
        }

        // Add the pivot row to the rows below to make zeros below diagonal
        for t in (j + 1)..n {
            if !array[[t, j]].is_zero() {
                for u in j..m {
                    let x = array[[j, u]];
                    array[[t, u]] += x;
                }
            }
        }
    }
    if n > m {
        return Err(Error::NotInvertible);
    }
    Ok(())
}

pub fn is_invertible(array: &Array2<GF2>) -> bool {
    let (n, m) = array.dim();
    n == m && upper_triangular_reduction(&mut array.clone()).is_ok()
}
