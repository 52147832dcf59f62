//! Indicator vector construction.
//!
//! Decreasing monomial codes are closed under the partial order on the
//! coordinate indices generated by two elementary moves: setting the least
//! significant bit when it is clear, and moving a set bit `k - 1` up to a
//! clear position `k`. Such a code is fully described by its minimal
//! information set, the set of minimal elements of its information set for
//! this order. Reed-Muller codes are the special case where the information
//! set is the set of indices with Hamming weight at least `n - r`.
//!
//! # References
//!
//! \[1\] M. Geiselhart, A. Elkelesh, M. Ebada, S. Cammerer and S. ten Brink,
//! "On the Automorphism Group of Polar Codes," 2021 IEEE International
//! Symposium on Information Theory (ISIT), pp. 1230-1235.

use super::{Error, PolarCode, MAX_LOG_LENGTH};

fn check_index_bits(n: usize) -> Result<(), Error> {
    if n > MAX_LOG_LENGTH {
        return Err(Error::TooManyIndexBits {
            n,
            max: MAX_LOG_LENGTH,
        });
    }
    Ok(())
}

/// Returns the indices that dominate `i` after one elementary move.
fn successors(i: usize, n: usize) -> impl Iterator<Item = usize> {
    (0..n).filter_map(move |k| {
        let bit = |j: usize| (i >> j) & 1 == 1;
        if k == 0 && !bit(0) {
            Some(i + 1)
        } else if k > 0 && !bit(k) && bit(k - 1) {
            Some(i + (1 << (k - 1)))
        } else {
            None
        }
    })
}

/// Builds a polar code from its minimal information set.
///
/// The information set of the code is the upward closure of `min_info_set`
/// for the partial order described in the [module documentation](self). The
/// closure is computed with an explicit worklist.
///
/// # Examples
/// ```
/// # use polar_ae::code::construction::from_min_info_set;
/// let code = from_min_info_set(&[3, 4], 3).unwrap();
/// assert_eq!(code.indicator(), &[0, 0, 0, 1, 1, 1, 1, 1]);
/// ```
pub fn from_min_info_set(min_info_set: &[usize], n: usize) -> Result<PolarCode, Error> {
    check_index_bits(n)?;
    let length = 1 << n;
    let mut indicator = vec![0; length];
    let mut to_visit = Vec::with_capacity(length);
    for &i in min_info_set {
        if i >= length {
            return Err(Error::IndexOutOfRange { index: i, length });
        }
        to_visit.push(i);
    }
    while let Some(i) = to_visit.pop() {
        if indicator[i] == 1 {
            continue;
        }
        indicator[i] = 1;
        to_visit.extend(successors(i, n).filter(|&j| indicator[j] == 0));
    }
    PolarCode::new(indicator)
}

/// Builds the Reed-Muller code RM(r, n) of length 2^n.
///
/// With the transform convention of [`crate::transform`], the information
/// coordinates are the indices of Hamming weight at least `n - r`.
pub fn reed_muller(r: usize, n: usize) -> Result<PolarCode, Error> {
    check_index_bits(n)?;
    if r > n {
        return Err(Error::InvalidOrder { r, n });
    }
    let min_weight = (n - r) as u32;
    PolarCode::new(
        (0..1usize << n)
            .map(|i| u8::from(i.count_ones() >= min_weight))
            .collect(),
    )
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn successors_of_index() {
        // 3 = 011: only the move of bit 1 to bit 2 applies
        assert_eq!(successors(3, 3).collect::<Vec<_>>(), vec![5]);
        // 4 = 100: setting bit 0
        assert_eq!(successors(4, 3).collect::<Vec<_>>(), vec![5]);
        // 5 = 101: moving bit 0 to bit 1
        assert_eq!(successors(5, 3).collect::<Vec<_>>(), vec![6]);
        assert_eq!(successors(7, 3).count(), 0);
    }

    #[test]
    fn closure_of_single_index() {
        let code = from_min_info_set(&[3], 3).unwrap();
        assert_eq!(code.indicator(), &[0, 0, 0, 1, 0, 1, 1, 1]);
    }

    #[test]
    fn closure_matches_reed_muller() {
        for n in 1..=7 {
            for r in 0..=n {
                let i_min = (1 << (n - r)) - 1;
                assert_eq!(
                    from_min_info_set(&[i_min], n).unwrap(),
                    reed_muller(r, n).unwrap(),
                    "RM({r}, {n})"
                );
            }
        }
    }

    #[test]
    fn closure_is_upward_closed() {
        let n = 6;
        let code = from_min_info_set(&[11, 14, 19], n).unwrap();
        for &i in code.info_positions() {
            for j in successors(i, n) {
                assert!(code.is_info(j));
            }
        }
        assert!(code.is_info(11) && code.is_info(14) && code.is_info(19));
    }

    #[test]
    fn out_of_range() {
        assert_eq!(
            from_min_info_set(&[8], 3),
            Err(Error::IndexOutOfRange {
                index: 8,
                length: 8
            })
        );
    }

    #[test]
    fn too_many_index_bits() {
        let err = Error::TooManyIndexBits {
            n: 64,
            max: MAX_LOG_LENGTH,
        };
        assert_eq!(from_min_info_set(&[0], 64), Err(err));
        assert_eq!(reed_muller(1, 64), Err(err));
        assert!(from_min_info_set(&[], MAX_LOG_LENGTH + 1).is_err());
    }

    #[test]
    fn reed_muller_dimensions() {
        // dim RM(r, n) = sum_{i <= r} binomial(n, i)
        assert_eq!(reed_muller(0, 4).unwrap().dimension(), 1);
        assert_eq!(reed_muller(1, 4).unwrap().dimension(), 5);
        assert_eq!(reed_muller(2, 4).unwrap().dimension(), 11);
        assert_eq!(reed_muller(4, 4).unwrap().dimension(), 16);
        assert!(reed_muller(5, 4).is_err());
    }
}
