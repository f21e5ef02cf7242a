//! Experimental strategy selecting the most stable bands among oversampled candidates.
//!
//! Each candidate hash function scores an item by summing a pseudo-random
//! `+1`/`-1` assignment over its features, and the sign of the score is the
//! min-hash bit. Scores near zero flip under small changes of the item, so
//! more candidate bands than needed are produced and the bands with the
//! fewest near-zero scores are kept.
//!
//! This strategy is less accurate than [`ReferencePointStrategy`](super::ReferencePointStrategy).
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::codec;
use crate::errors::{LshIndexError, Result};
use crate::feature::FeatureSource;
use crate::strategy::{check_parameters, HashingResult, HashingStrategy};

/// Number of entries of a `+1`/`-1` assignment table.
const TABLE_SIZE: usize = 1000;

/// Centred scores whose magnitude is below this value are considered unstable.
const UNSTABLE_SCORE: i32 = 4;

/// Strategy hashing by signs of scores, trained on a reference set of items.
pub struct ScoredTrainingStrategy {
    // num_candidate_hashes tables of TABLE_SIZE entries, concatenated.
    tables: Vec<i8>,
    splits: Vec<i32>,
    num_min_hashes: usize,
    band_width: usize,
}

impl ScoredTrainingStrategy {
    /// Creates an instance.
    ///
    /// # Arguments
    ///
    /// * `num_min_hashes` - Number of min-hashes kept per item (must be at least 64).
    /// * `band_width` - Number of min-hashes joined into one bucket (must be more than 0).
    /// * `num_candidate_hashes` - Number of candidate hash functions (must be more than `num_min_hashes`).
    /// * `training_set` - Items used to choose the splitting point of every candidate,
    ///                    i.e., the median score over the items. If empty, zero is used.
    /// * `seed` - Seed value for the assignment tables. If `None`, a random seed is used.
    ///
    /// # Errors
    ///
    /// * [`LshIndexError::Configuration`] is returned if the parameters are out of range.
    /// * [`LshIndexError::EmptyInput`] is returned if a training item has no feature.
    pub fn new<I, F>(
        num_min_hashes: usize,
        band_width: usize,
        num_candidate_hashes: usize,
        training_set: I,
        seed: Option<u64>,
    ) -> Result<Self>
    where
        I: IntoIterator<Item = F>,
        F: FeatureSource,
    {
        check_parameters(num_min_hashes, band_width)?;
        if num_candidate_hashes <= num_min_hashes {
            return Err(LshIndexError::configuration(format!(
                "The number of candidate hashes must be more than {num_min_hashes}, but got {num_candidate_hashes}."
            )));
        }

        let seed = seed.unwrap_or_else(rand::random::<u64>);
        let mut rng = rand_xoshiro::SplitMix64::seed_from_u64(seed);
        let mut signs: Vec<i8> = (0..TABLE_SIZE)
            .map(|i| if i < TABLE_SIZE / 2 { 1 } else { -1 })
            .collect();
        let mut tables = Vec::with_capacity(num_candidate_hashes * TABLE_SIZE);
        for _ in 0..num_candidate_hashes {
            signs.shuffle(&mut rng);
            tables.extend_from_slice(&signs);
        }

        let mut strategy = Self {
            tables,
            splits: vec![0; num_candidate_hashes],
            num_min_hashes,
            band_width,
        };

        let mut trained = vec![vec![]; num_candidate_hashes];
        for item in training_set {
            let features = item.features();
            if features.is_empty() {
                return Err(LshIndexError::empty_input());
            }
            for (scores, score) in trained.iter_mut().zip(strategy.scores(&features)) {
                scores.push(score);
            }
        }
        let num_trained = trained[0].len();
        if num_trained != 0 {
            for (split, scores) in strategy.splits.iter_mut().zip(trained.iter_mut()) {
                scores.sort_unstable();
                *split = scores[scores.len() / 2];
            }
        }

        tracing::debug!(
            num_min_hashes,
            band_width,
            num_candidate_hashes,
            num_trained,
            seed,
            "created scored-training strategy"
        );
        Ok(strategy)
    }

    /// Gets the number of candidate hash functions.
    pub fn num_candidate_hashes(&self) -> usize {
        self.splits.len()
    }

    /// Computes the centred score of every candidate hash function.
    fn scores(&self, features: &[i32]) -> Vec<i32> {
        self.tables
            .chunks_exact(TABLE_SIZE)
            .zip(&self.splits)
            .map(|(table, &split)| {
                let score: i32 = features
                    .iter()
                    .map(|&v| i32::from(table[v.unsigned_abs() as usize % TABLE_SIZE]))
                    .sum();
                score - split
            })
            .collect()
    }

    /// Produces pairs of a bucket index and its badness for every candidate band,
    /// sorted by ascending badness. The original band order is kept among ties.
    fn candidate_bands(&self, scores: &[i32]) -> Vec<(i32, usize)> {
        let mut bands: Vec<_> = scores
            .chunks_exact(self.band_width)
            .enumerate()
            .map(|(position, band)| {
                // Seeding with the position keeps equal bits of different bands apart.
                let bucket = band
                    .iter()
                    .fold(position as i32, |acc, &s| codec::combine(acc, (s > 0) as i32));
                let badness = band.iter().filter(|s| s.abs() < UNSTABLE_SCORE).count();
                (bucket, badness)
            })
            .collect();
        bands.sort_by_key(|&(_, badness)| badness);
        bands
    }
}

impl HashingStrategy for ScoredTrainingStrategy {
    fn hash(&self, features: &[i32]) -> Result<HashingResult> {
        if features.is_empty() {
            return Err(LshIndexError::empty_input());
        }
        let scores = self.scores(features);
        let buckets = self
            .candidate_bands(&scores)
            .into_iter()
            .take(self.num_buckets())
            .map(|(bucket, _)| bucket)
            .collect();
        let bits: Vec<i32> = scores
            .iter()
            .take(codec::SIGNATURE_BITS)
            .map(|&s| (s > 0) as i32)
            .collect();
        Ok(HashingResult::new(codec::pack_signature(&bits), buckets))
    }

    fn num_min_hashes(&self) -> usize {
        self.num_min_hashes
    }

    fn band_width(&self) -> usize {
        self.band_width
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use rand::Rng;

    const NO_TRAINING: [Vec<i32>; 0] = [];

    #[test]
    fn test_configuration() {
        assert!(matches!(
            ScoredTrainingStrategy::new(64, 4, 64, NO_TRAINING, Some(1)),
            Err(LshIndexError::Configuration(_))
        ));
        assert!(matches!(
            ScoredTrainingStrategy::new(32, 4, 128, NO_TRAINING, Some(1)),
            Err(LshIndexError::Configuration(_))
        ));
        assert!(matches!(
            ScoredTrainingStrategy::new(64, 0, 128, NO_TRAINING, Some(1)),
            Err(LshIndexError::Configuration(_))
        ));
        assert!(matches!(
            ScoredTrainingStrategy::new(64, 4, 128, [vec![1i32], vec![]], Some(1)),
            Err(LshIndexError::EmptyInput(_))
        ));
    }

    #[test]
    fn test_balanced_tables() {
        let strategy = ScoredTrainingStrategy::new(64, 4, 80, NO_TRAINING, Some(2)).unwrap();
        assert_eq!(strategy.num_candidate_hashes(), 80);
        for table in strategy.tables.chunks_exact(TABLE_SIZE) {
            assert_eq!(table.iter().map(|&s| i32::from(s)).sum::<i32>(), 0);
        }
    }

    #[test]
    fn test_empty_input() {
        let strategy = ScoredTrainingStrategy::new(64, 4, 128, NO_TRAINING, Some(3)).unwrap();
        assert_eq!(strategy.hash(&[]), Err(LshIndexError::empty_input()));
    }

    #[test]
    fn test_shape_and_determinism() {
        let mut rng = rand::thread_rng();
        let strategy = ScoredTrainingStrategy::new(96, 6, 300, NO_TRAINING, Some(4)).unwrap();
        let mut features: Vec<i32> = (0..100).map(|_| rng.gen()).collect();
        let expected = strategy.hash(&features).unwrap();
        assert_eq!(expected.buckets().len(), 16);
        features.reverse();
        assert_eq!(strategy.hash(&features).unwrap(), expected);
    }

    #[test]
    fn test_most_stable_bands_first() {
        let mut rng = rand::thread_rng();
        let strategy = ScoredTrainingStrategy::new(64, 4, 200, NO_TRAINING, Some(5)).unwrap();
        let features: Vec<i32> = (0..30).map(|_| rng.gen_range(0..5000)).collect();
        let bands = strategy.candidate_bands(&strategy.scores(&features));
        assert_eq!(bands.len(), 50);
        assert!(bands.windows(2).all(|w| w[0].1 <= w[1].1));

        let result = strategy.hash(&features).unwrap();
        let kept: Vec<i32> = bands.iter().take(16).map(|b| b.0).collect();
        assert_eq!(result.buckets(), &kept[..]);
    }

    #[test]
    fn test_training_centres_scores() {
        let item = vec![3, 1, 4, 1, 5, 9, 2, 6];
        let strategy =
            ScoredTrainingStrategy::new(64, 4, 100, [item.clone()], Some(6)).unwrap();
        assert!(strategy.scores(&item).iter().all(|&s| s == 0));

        // Every score of the training item is unstable and every bit is unset.
        let result = strategy.hash(&item).unwrap();
        assert_eq!(result.signature(), 0);
        assert_eq!(result.buckets().len(), 16);
    }

    #[test]
    fn test_similar_items_share_buckets() {
        let mut rng = rand::thread_rng();
        let strategy = ScoredTrainingStrategy::new(64, 2, 256, NO_TRAINING, Some(7)).unwrap();
        let base: Vec<i32> = (0..200).map(|_| rng.gen_range(0..100_000)).collect();
        let mut similar = base.clone();
        similar[0] = 123_456;
        let lhs = strategy.hash(&base).unwrap();
        let rhs = strategy.hash(&similar).unwrap();
        assert!(lhs.buckets().iter().any(|b| rhs.buckets().contains(b)));
    }
}
