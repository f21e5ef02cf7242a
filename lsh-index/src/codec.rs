//! Packing of min-hash values into signatures and bucket indices.

/// Number of bits in a signature.
pub const SIGNATURE_BITS: usize = 64;

/// Packs the lowest bit of each of the first 64 values into a signature,
/// most-significant bit first.
///
/// Inputs shorter than 64 values are right-aligned, i.e., the missing
/// positions are never shifted in.
///
/// # Examples
///
/// ```
/// use lsh_index::codec::pack_signature;
///
/// assert_eq!(pack_signature(&[1, 2, 3]), 0b101);
/// ```
pub fn pack_signature(values: &[i32]) -> u64 {
    values
        .iter()
        .take(SIGNATURE_BITS)
        .fold(0, |acc, &v| (acc << 1) | (v & 1) as u64)
}

/// Mixes two integers into one, in the manner of a single Murmur3 round
/// followed by its finalizer.
///
/// For a fixed `a` the mapping of `b` is a bijection and vice versa.
#[inline(always)]
pub const fn combine(a: i32, b: i32) -> i32 {
    let mut k = b as u32;
    k = k.wrapping_mul(0xcc9e_2d51);
    k = k.rotate_left(15);
    k = k.wrapping_mul(0x1b87_3593);

    let mut h = (a as u32) ^ k;
    h = h.rotate_left(13);
    h = h.wrapping_mul(5).wrapping_add(0xe654_6b64);

    h ^= h >> 16;
    h = h.wrapping_mul(0x85eb_ca6b);
    h ^= h >> 13;
    h = h.wrapping_mul(0xc2b2_ae35);
    h ^= h >> 16;
    h as i32
}

/// Folds contiguous groups of `band_width` values into one bucket index per group.
///
/// A trailing incomplete group is dropped, so the output length is
/// `values.len() / band_width`.
///
/// # Panics
///
/// It will panic if `band_width` is 0.
pub fn band(values: &[i32], band_width: usize) -> Vec<i32> {
    assert_ne!(band_width, 0, "band_width must not be 0.");
    values
        .chunks_exact(band_width)
        .map(|group| group.iter().fold(0, |acc, &v| combine(acc, v)))
        .collect()
}

/// Gets the Hamming distance between two signatures.
#[inline(always)]
pub const fn hamming_distance(lhs: u64, rhs: u64) -> u32 {
    (lhs ^ rhs).count_ones()
}

/// Converts a match threshold in percent into the bound on differing bits.
///
/// Two signatures match when their Hamming distance is strictly less than
/// the returned value, e.g., 70 percent allows fewer than 20 differing bits.
/// Thresholds outside `[0, 100]` are not clamped, and the result never
/// increases as the threshold grows.
#[inline(always)]
pub const fn max_differences(threshold_percent: i32) -> i32 {
    // |64 * i32::MAX / 100| fits in i32, but the product does not.
    let bits = SIGNATURE_BITS as i64;
    (bits - (bits * threshold_percent as i64) / 100) as i32
}

/// Checks if two signatures match under a bound from [`max_differences()`].
///
/// Identical signatures always match, so that an item is found by itself
/// even under a threshold of 100 percent.
#[inline(always)]
pub const fn signatures_match(lhs: u64, rhs: u64, max_differences: i32) -> bool {
    let dist = hamming_distance(lhs, rhs) as i32;
    dist == 0 || dist < max_differences
}
