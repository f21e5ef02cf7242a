//! Approximate min-hashing by closeness to random reference points.
use rand::{RngCore, SeedableRng};

use crate::codec;
use crate::errors::{LshIndexError, Result};
use crate::strategy::{check_parameters, HashingResult, HashingStrategy};

/// Large odd multiplier scattering clustered feature values before comparison.
const DECORRELATION: i32 = 1_293_843_569;

/// Strategy comparing every feature with a set of random 32-bit reference points.
///
/// For each reference point, the feature whose scattered bit pattern differs
/// in the fewest bits from the reference point is selected as the min-hash,
/// and ties are broken by the feature nearest to the reference point.
/// Items sharing most of their features tend to select the same features.
pub struct ReferencePointStrategy {
    references: Vec<i32>,
    band_width: usize,
}

impl ReferencePointStrategy {
    /// Creates an instance.
    ///
    /// # Arguments
    ///
    /// * `num_min_hashes` - Number of min-hashes per item (must be at least 64).
    /// * `band_width` - Number of min-hashes joined into one bucket (must be more than 0).
    /// * `seed` - Seed value for the reference points. If `None`, a random seed is used.
    ///
    /// # Errors
    ///
    /// [`LshIndexError::Configuration`] is returned if the parameters are out of range.
    pub fn new(num_min_hashes: usize, band_width: usize, seed: Option<u64>) -> Result<Self> {
        check_parameters(num_min_hashes, band_width)?;
        let seed = seed.unwrap_or_else(rand::random::<u64>);
        let mut seeder = rand_xoshiro::SplitMix64::seed_from_u64(seed);
        let references = (0..num_min_hashes)
            .map(|_| seeder.next_u32() as i32)
            .collect();
        tracing::debug!(num_min_hashes, band_width, seed, "created reference-point strategy");
        Ok(Self {
            references,
            band_width,
        })
    }

    /// Computes the min-hash values, one per reference point in construction order.
    ///
    /// # Errors
    ///
    /// [`LshIndexError::EmptyInput`] is returned if `features` is empty.
    pub fn min_hashes(&self, features: &[i32]) -> Result<Vec<i32>> {
        if features.is_empty() {
            return Err(LshIndexError::empty_input());
        }
        Ok(self
            .references
            .iter()
            .map(|&r| select(features, r))
            .collect())
    }
}

impl HashingStrategy for ReferencePointStrategy {
    fn hash(&self, features: &[i32]) -> Result<HashingResult> {
        let min_hashes = self.min_hashes(features)?;
        Ok(HashingResult::new(
            codec::pack_signature(&min_hashes),
            codec::band(&min_hashes, self.band_width),
        ))
    }

    fn num_min_hashes(&self) -> usize {
        self.references.len()
    }

    fn band_width(&self) -> usize {
        self.band_width
    }
}

/// Ranks a feature against a reference point; the smallest key is selected.
///
/// The feature itself is the last component, making the selection
/// independent of the order of the features.
#[inline(always)]
fn rank(value: i32, reference: i32) -> (u32, u64, i32) {
    let differences = (value.wrapping_mul(DECORRELATION) ^ reference).count_ones();
    let distance = (i64::from(value) - i64::from(reference)).unsigned_abs();
    (differences, distance, value)
}

/// Selects the feature closest to `reference`. `features` must not be empty.
#[inline(always)]
fn select(features: &[i32], reference: i32) -> i32 {
    let mut best = rank(features[0], reference);
    for &v in &features[1..] {
        let key = rank(v, reference);
        if key < best {
            best = key;
        }
    }
    best.2
}
