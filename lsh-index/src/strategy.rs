//! Hashing strategies turning features into bucket indices and a signature.
pub mod reference_point;
pub mod scored_training;

use std::sync::Arc;

use crate::errors::{LshIndexError, Result};
use crate::feature::FeatureSource;

pub use reference_point::ReferencePointStrategy;
pub use scored_training::ScoredTrainingStrategy;

/// Minimum number of min-hashes, so that a signature can be filled.
pub const MIN_NUM_MIN_HASHES: usize = 64;

/// Pair of a signature and bucket indices produced by a strategy.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct HashingResult {
    signature: u64,
    buckets: Vec<i32>,
}

impl HashingResult {
    /// Creates an instance.
    pub const fn new(signature: u64, buckets: Vec<i32>) -> Self {
        Self { signature, buckets }
    }

    /// Gets the 64-bit signature compared in the Hamming space.
    pub const fn signature(&self) -> u64 {
        self.signature
    }

    /// Gets the bucket indices, one per band.
    pub fn buckets(&self) -> &[i32] {
        &self.buckets
    }
}

/// Trait of a locality-sensitive hashing strategy.
///
/// Similar inputs should share bucket indices with high probability, and
/// each bit of the signature should be independent of the others.
/// A strategy is randomized at construction and deterministic afterwards.
pub trait HashingStrategy: Send + Sync {
    /// Hashes a non-empty feature sequence.
    ///
    /// # Errors
    ///
    /// [`LshIndexError::EmptyInput`] is returned if `features` is empty.
    fn hash(&self, features: &[i32]) -> Result<HashingResult>;

    /// Gets the number of min-hashes per item.
    fn num_min_hashes(&self) -> usize;

    /// Gets the number of min-hashes joined into one band.
    fn band_width(&self) -> usize;

    /// Gets the number of bucket indices produced per item.
    fn num_buckets(&self) -> usize {
        self.num_min_hashes() / self.band_width()
    }

    /// Materializes the features of an item once and hashes them.
    fn hash_item<F>(&self, item: &F) -> Result<HashingResult>
    where
        F: FeatureSource + ?Sized,
        Self: Sized,
    {
        self.hash(&item.features())
    }
}

impl<S> HashingStrategy for Box<S>
where
    S: HashingStrategy + ?Sized,
{
    fn hash(&self, features: &[i32]) -> Result<HashingResult> {
        (**self).hash(features)
    }

    fn num_min_hashes(&self) -> usize {
        (**self).num_min_hashes()
    }

    fn band_width(&self) -> usize {
        (**self).band_width()
    }

    fn num_buckets(&self) -> usize {
        (**self).num_buckets()
    }
}

impl<S> HashingStrategy for Arc<S>
where
    S: HashingStrategy + ?Sized,
{
    fn hash(&self, features: &[i32]) -> Result<HashingResult> {
        (**self).hash(features)
    }

    fn num_min_hashes(&self) -> usize {
        (**self).num_min_hashes()
    }

    fn band_width(&self) -> usize {
        (**self).band_width()
    }

    fn num_buckets(&self) -> usize {
        (**self).num_buckets()
    }
}

/// Validates the parameters shared by every strategy and the index.
pub(crate) fn check_parameters(num_min_hashes: usize, band_width: usize) -> Result<()> {
    if num_min_hashes < MIN_NUM_MIN_HASHES {
        return Err(LshIndexError::configuration(format!(
            "At least {MIN_NUM_MIN_HASHES} min-hashes are required, but got {num_min_hashes}."
        )));
    }
    if band_width == 0 {
        return Err(LshIndexError::configuration("Band width must not be 0."));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_parameters() {
        assert!(check_parameters(64, 1).is_ok());
        assert!(check_parameters(120, 5).is_ok());
        assert!(matches!(
            check_parameters(63, 1),
            Err(LshIndexError::Configuration(_))
        ));
        assert!(matches!(
            check_parameters(64, 0),
            Err(LshIndexError::Configuration(_))
        ));
    }

    #[test]
    fn test_dyn_strategy() {
        let strategy: Box<dyn HashingStrategy> =
            Box::new(ReferencePointStrategy::new(120, 5, Some(42)).unwrap());
        assert_eq!(strategy.num_min_hashes(), 120);
        assert_eq!(strategy.band_width(), 5);
        assert_eq!(strategy.num_buckets(), 24);
        let result = strategy.hash_item(&vec![1i32, 2, 3]).unwrap();
        assert_eq!(result.buckets().len(), 24);
    }
}
