//! Linear automorphisms of polar codes.
//!
//! An invertible n x n matrix `A` over GF(2) acts on the coordinates of a code
//! of length N = 2^n by mapping the index `k` with binary expansion `z`
//! (least significant bit first) to the index with binary expansion `Az`. For
//! a decreasing monomial code, every such map that is block diagonal with
//! respect to the stabilizer block profile of the code is a code automorphism
//! (see Theorem 2 in \[1\]), so SC decoding of the permuted observation is a
//! valid decoding of the original code.
//!
//! This module computes the stabilizer block profile of a code (Algorithm 1
//! in \[2\]), draws random block diagonal invertible maps and converts them
//! into coordinate [`Permutation`]s.
//!
//! # References
//!
//! \[1\] M. Geiselhart, A. Elkelesh, M. Ebada, S. Cammerer and S. ten Brink,
//! "Automorphism Ensemble Decoding of Reed-Muller Codes," IEEE Transactions
//! on Communications, vol. 69, no. 10, pp. 6424-6438, Oct. 2021.
//!
//! \[2\] M. Geiselhart, A. Elkelesh, M. Ebada, S. Cammerer and S. ten Brink,
//! "On the Automorphism Group of Polar Codes," 2021 IEEE International
//! Symposium on Information Theory (ISIT), pp. 1230-1235.

use crate::{code::PolarCode, gf2::GF2};
use log::{debug, trace};
use ndarray::{s, Array2};
use num_traits::Zero;
use rand::Rng;
use thiserror::Error;

mod gauss;

/// Automorphism construction error.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Error)]
pub enum Error {
    /// The block lengths do not add up to the number of index bits.
    #[error("block lengths add up to {sum} instead of {expected}")]
    ProfileSum {
        /// Sum of the block lengths.
        sum: usize,
        /// Number of index bits n.
        expected: usize,
    },
    /// A block has zero length.
    #[error("block profile contains an empty block")]
    EmptyBlock,
    /// The matrix is not square.
    #[error("matrix of size {rows}x{cols} is not square")]
    NotSquare {
        /// Number of rows.
        rows: usize,
        /// Number of columns.
        cols: usize,
    },
    /// The matrix is not invertible over GF(2).
    #[error("matrix is not invertible over GF(2)")]
    NotInvertible,
    /// The array is not a permutation of `0..len`.
    #[error("array is not a permutation")]
    NotBijection,
}

/// Stabilizer block profile.
///
/// Ordered list of positive block lengths that add up to the number n of
/// index bits. Block `i` covers the index bits starting at the sum of the
/// lengths of the preceding blocks.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BlockProfile {
    blocks: Box<[usize]>,
}

impl BlockProfile {
    /// Creates a block profile from a list of block lengths.
    ///
    /// The lengths must be positive and add up to `n`.
    pub fn new(blocks: Vec<usize>, n: usize) -> Result<BlockProfile, Error> {
        if blocks.contains(&0) {
            return Err(Error::EmptyBlock);
        }
        let sum = blocks.iter().sum();
        if sum != n {
            return Err(Error::ProfileSum { sum, expected: n });
        }
        Ok(BlockProfile {
            blocks: blocks.into_boxed_slice(),
        })
    }

    /// Returns the block lengths.
    pub fn blocks(&self) -> &[usize] {
        &self.blocks
    }

    /// Returns the number of index bits n covered by the profile.
    pub fn num_bits(&self) -> usize {
        self.blocks.iter().sum()
    }

    /// Iterates over the blocks as `(start, length)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.blocks.iter().scan(0, |start, &len| {
            let block = (*start, len);
            *start += len;
            Some(block)
        })
    }
}

impl std::fmt::Display for BlockProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self.blocks)
    }
}

fn swap_bits(x: usize, i: usize, j: usize) -> usize {
    if ((x >> i) ^ (x >> j)) & 1 == 1 {
        x ^ ((1 << i) | (1 << j))
    } else {
        x
    }
}

// Checks whether the transposition of index bits `i` and `j` maps the
// information set onto itself.
fn transposition_preserves(code: &PolarCode, i: usize, j: usize) -> bool {
    code.info_positions()
        .iter()
        .all(|&x| code.is_info(swap_bits(x, i, j)))
}

/// Computes the stabilizer block profile of a polar code.
///
/// The profile is found greedily: starting at index bit `i0 = 0`, the largest
/// `i1 >= i0` such that swapping index bits `i0` and `i1` maps the information
/// set onto itself closes the block `[i0, i1]`, and the search continues at
/// `i1 + 1`. The trivial block `i1 = i0` is always accepted.
///
/// # Examples
/// ```
/// # use polar_ae::{automorphism::stabilizer_block_profile, code::construction::*};
/// let rm = reed_muller(2, 5).unwrap();
/// assert_eq!(stabilizer_block_profile(&rm).blocks(), &[5]);
/// let code = from_min_info_set(&[3, 4], 3).unwrap();
/// assert_eq!(stabilizer_block_profile(&code).blocks(), &[2, 1]);
/// ```
pub fn stabilizer_block_profile(code: &PolarCode) -> BlockProfile {
    let n = code.log_length();
    let mut blocks = Vec::new();
    let mut i0 = 0;
    while i0 < n {
        let i1 = (i0..n)
            .rev()
            .find(|&i1| transposition_preserves(code, i0, i1))
            .unwrap_or(i0);
        blocks.push(i1 - i0 + 1);
        i0 = i1 + 1;
    }
    debug!("stabilizer block profile of {code}: {blocks:?}");
    BlockProfile {
        blocks: blocks.into_boxed_slice(),
    }
}

/// Invertible linear map on the n index bits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinearMap {
    matrix: Array2<GF2>,
}

impl LinearMap {
    /// Creates a linear map from an n x n matrix over GF(2).
    ///
    /// Returns an error if the matrix is not square or not invertible.
    pub fn new(matrix: Array2<GF2>) -> Result<LinearMap, Error> {
        let (rows, cols) = matrix.dim();
        if rows != cols {
            return Err(Error::NotSquare { rows, cols });
        }
        if !gauss::is_invertible(&matrix) {
            return Err(Error::NotInvertible);
        }
        Ok(LinearMap { matrix })
    }

    /// Returns the identity map on `n` index bits.
    pub fn identity(n: usize) -> LinearMap {
        LinearMap {
            matrix: Array2::from_shape_fn((n, n), |(r, c)| GF2::from(r == c)),
        }
    }

    /// Returns the matrix of the map.
    pub fn matrix(&self) -> &Array2<GF2> {
        &self.matrix
    }

    /// Returns the number of index bits n.
    pub fn num_bits(&self) -> usize {
        self.matrix.nrows()
    }

    /// Applies the map to the index `x`.
    ///
    /// Bit `c` of `x` is the coordinate `c` of the input vector.
    pub fn apply(&self, x: usize) -> usize {
        self.matrix
            .rows()
            .into_iter()
            .enumerate()
            .fold(0, |y, (r, row)| {
                let bit = row
                    .iter()
                    .enumerate()
                    .fold(GF2::zero(), |acc, (c, &a)| {
                        acc + a * GF2::from_bit((x >> c) as u8)
                    });
                y | (usize::from(bit.bit()) << r)
            })
    }
}

fn random_invertible<R: Rng>(size: usize, rng: &mut R) -> Array2<GF2> {
    let mut attempts = 1;
    loop {
        let a = Array2::from_shape_fn((size, size), |_| GF2::from(rng.gen::<bool>()));
        if gauss::is_invertible(&a) {
            trace!("found invertible {size}x{size} matrix after {attempts} attempts");
            return a;
        }
        attempts += 1;
    }
}

/// Draws a random block diagonal invertible linear map.
///
/// Each diagonal block is drawn uniformly among the invertible matrices of its
/// size by rejection sampling. All the entries outside the diagonal blocks are
/// zero.
pub fn random_block_diagonal<R: Rng>(profile: &BlockProfile, rng: &mut R) -> LinearMap {
    let n = profile.num_bits();
    let mut matrix = Array2::zeros((n, n));
    for (start, len) in profile.iter() {
        matrix
            .slice_mut(s![start..start + len, start..start + len])
            .assign(&random_invertible(len, rng));
    }
    LinearMap { matrix }
}

/// Coordinate permutation of a code of length N.
///
/// The permutation is stored as the array `pi` of length N. It acts on
/// vectors by [gathering](Permutation::gather), `y[j] = x[pi[j]]`, and is
/// undone by [scattering](Permutation::scatter), `y[pi[j]] = x[j]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Permutation {
    map: Box<[usize]>,
}

impl Permutation {
    /// Creates a permutation from an array.
    ///
    /// Returns an error if `map` is not a bijection on `0..map.len()`.
    pub fn new(map: Vec<usize>) -> Result<Permutation, Error> {
        let mut seen = vec![false; map.len()];
        for &j in map.iter() {
            match seen.get_mut(j) {
                Some(s) if !*s => *s = true,
                _ => return Err(Error::NotBijection),
            }
        }
        Ok(Permutation {
            map: map.into_boxed_slice(),
        })
    }

    /// Returns the identity permutation of length `len`.
    pub fn identity(len: usize) -> Permutation {
        Permutation {
            map: (0..len).collect(),
        }
    }

    /// Returns the permutation array.
    pub fn as_slice(&self) -> &[usize] {
        &self.map
    }

    /// Returns the length of the permutation.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Returns `true` if the permutation has length zero.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Returns `true` if this is the identity permutation.
    pub fn is_identity(&self) -> bool {
        self.map.iter().enumerate().all(|(j, &k)| j == k)
    }

    /// Writes `output[j] = input[pi[j]]`.
    ///
    /// # Panics
    ///
    /// Panics if the slices are shorter than the permutation.
    pub fn gather<T: Copy>(&self, input: &[T], output: &mut [T]) {
        for (y, &k) in output.iter_mut().zip(self.map.iter()) {
            *y = input[k];
        }
    }

    /// Writes `output[pi[j]] = input[j]`.
    ///
    /// This undoes [`gather`](Permutation::gather).
    ///
    /// # Panics
    ///
    /// Panics if the slices are shorter than the permutation.
    pub fn scatter<T: Copy>(&self, input: &[T], output: &mut [T]) {
        for (&x, &k) in input.iter().zip(self.map.iter()) {
            output[k] = x;
        }
    }

    /// Returns the inverse permutation.
    pub fn inverse(&self) -> Permutation {
        let mut map = vec![0; self.map.len()];
        for (j, &k) in self.map.iter().enumerate() {
            map[k] = j;
        }
        Permutation {
            map: map.into_boxed_slice(),
        }
    }
}

/// Converts a linear map into the permutation it induces on the coordinates.
///
/// The indices `0..N` are enumerated in increasing order and `pi[k]` is the
/// index obtained by applying the map to the binary expansion of `k`. The
/// result is a bijection because the map is invertible.
pub fn linear_permutation(map: &LinearMap) -> Permutation {
    Permutation {
        map: (0..1usize << map.num_bits()).map(|k| map.apply(k)).collect(),
    }
}

/// Samples `count` random automorphism permutations of a code.
///
/// The stabilizer block profile is computed once and each permutation is
/// induced by an independent [`random_block_diagonal`] map.
pub fn sample_automorphisms<R: Rng>(
    code: &PolarCode,
    count: usize,
    rng: &mut R,
) -> Vec<Permutation> {
    let profile = stabilizer_block_profile(code);
    let permutations: Vec<Permutation> = (0..count)
        .map(|_| linear_permutation(&random_block_diagonal(&profile, rng)))
        .collect();
    debug!(
        "sampled {count} automorphisms with profile {profile} ({} identities)",
        permutations.iter().filter(|p| p.is_identity()).count()
    );
    permutations
}
