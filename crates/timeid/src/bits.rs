//! Integer bit helpers shared by every identifier layout.
//!
//! Nothing here holds state. The hash is [BLAKE3] truncated to its first eight
//! bytes, which gives deterministic output with full avalanche behavior for
//! arbitrary content.
//!
//! [BLAKE3]: https://github.com/BLAKE3-team/BLAKE3

use crate::{Error, Result};

// Layout constants are computed with this at compile time.
pub(crate) const fn mask_of(n: u32) -> u64 {
    if n >= u64::BITS {
        u64::MAX
    } else {
        (1 << n) - 1
    }
}

/// Returns a `u64` with the low `n` bits set.
///
/// # Errors
///
/// Returns [`Error::InvalidArgument`] when `n` is `0` or larger than `64`.
///
/// # Example
/// ```
/// use timeid::bit_mask;
///
/// assert_eq!(bit_mask(5).unwrap(), 0b11111);
/// assert!(bit_mask(0).is_err());
/// ```
pub fn bit_mask(n: u32) -> Result<u64> {
    if !(1..=u64::BITS).contains(&n) {
        return Err(Error::invalid_argument(format!(
            "bit mask width must be within 1..=64, got {n}"
        )));
    }
    Ok(mask_of(n))
}

/// Returns how many bits are needed to give `count` values distinct codes.
///
/// This is `0` for a single value and `ceil(log2(count))` otherwise.
///
/// # Errors
///
/// Returns [`Error::InvalidArgument`] when `count` is `0`.
pub fn bits_required_for(count: u64) -> Result<u32> {
    match count {
        0 => Err(Error::invalid_argument("cannot distinguish zero values")),
        1 => Ok(0),
        n => Ok(u64::BITS - (n - 1).leading_zeros()),
    }
}

/// Hashes `bytes` to a well dispersed 64-bit value.
#[must_use]
pub fn hash64(bytes: &[u8]) -> u64 {
    let digest = blake3::hash(bytes);
    let mut head = [0_u8; 8];
    head.copy_from_slice(&digest.as_bytes()[..8]);
    u64::from_be_bytes(head)
}

/// Keeps only the low `n` bits of `value`.
///
/// # Errors
///
/// Same as [`bit_mask`].
pub fn low_bits(value: u64, n: u32) -> Result<u64> {
    Ok(value & bit_mask(n)?)
}

/// Returns `n` pseudo-random bits derived from the content hash of `bytes`.
///
/// Identical input always yields identical bits.
///
/// # Errors
///
/// Same as [`bit_mask`].
pub fn random_low_bits(n: u32, bytes: &[u8]) -> Result<u64> {
    low_bits(hash64(bytes), n)
}
