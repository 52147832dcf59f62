//! Polar transform.
//!
//! The polar (XOR butterfly) transform maps a vector `u` of length N = 2^n to
//! `c` with `c[i] = XOR of u[j]` over all `j` whose binary expansion contains
//! that of `i`. It is computed in n stages of pairwise XORs and it is its own
//! inverse, so the same function is used to encode a message and to recover
//! it from a codeword.

/// Applies the polar transform in place.
///
/// The length of `bits` must be a power of two. The entries are expected to be
/// `0` or `1`.
///
/// # Examples
/// ```
/// # use polar_ae::transform::polar_transform;
/// let mut bits = [0, 1, 1, 1];
/// polar_transform(&mut bits);
/// assert_eq!(bits, [1, 0, 0, 1]);
/// polar_transform(&mut bits);
/// assert_eq!(bits, [0, 1, 1, 1]);
/// ```
pub fn polar_transform(bits: &mut [u8]) {
    let size = bits.len();
    debug_assert!(size.is_power_of_two());
    let mut d = 1;
    while d < size {
        for group in bits.chunks_exact_mut(2 * d) {
            let (upper, lower) = group.split_at_mut(d);
            for (x, &y) in upper.iter_mut().zip(lower.iter()) {
                *x ^= y;
            }
        }
        d *= 2;
    }
}

/// Returns the polar transform of `bits` as a new vector.
pub fn polar_transformed(bits: &[u8]) -> Vec<u8> {
    let mut out = bits.to_vec();
    polar_transform(&mut out);
    out
}
