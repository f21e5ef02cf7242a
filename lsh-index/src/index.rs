//! Similarity index over bucket and signature tables.
use std::hash::Hash;
use std::sync::atomic::{AtomicUsize, Ordering};

use dashmap::DashMap;
use hashbrown::HashSet;
use rayon::prelude::*;

use crate::bucket::SignatureSet;
use crate::codec;
use crate::errors::Result;
use crate::feature::FeatureSource;
use crate::strategy::{check_parameters, HashingStrategy, ReferencePointStrategy};

/// In-memory approximate similarity index with banded locality-sensitive hashing.
///
/// Items are hashed by a [`HashingStrategy`] into bucket indices and a 64-bit
/// signature. A search gathers the signatures stored in the buckets of a query,
/// keeps those within a Hamming distance derived from a match threshold, and
/// returns the items that produced them.
///
/// All operations take `&self`, and the index can be shared across threads.
/// The tables are sharded concurrent maps, so there is no global lock.
/// Items are never removed.
///
/// # Examples
///
/// ```
/// use lsh_index::{ReferencePointStrategy, SimilarityIndex};
///
/// let strategy = ReferencePointStrategy::new(120, 5, Some(42)).unwrap();
/// let index = SimilarityIndex::new(120, 5, strategy).unwrap();
///
/// let item: Vec<i32> = (0..100).collect();
/// index.add(item.clone()).unwrap();
///
/// let results = index.search(&item, 70).unwrap();
/// assert!(results.contains(&item));
/// ```
pub struct SimilarityIndex<T, S = ReferencePointStrategy> {
    num_min_hashes: usize,
    band_width: usize,
    strategy: S,
    buckets: DashMap<i32, SignatureSet>,
    signatures: DashMap<u64, Vec<T>>,
    num_items: AtomicUsize,
}

impl<T, S> SimilarityIndex<T, S>
where
    T: Clone + Eq + Hash,
    S: HashingStrategy,
{
    /// Creates an empty index.
    ///
    /// # Arguments
    ///
    /// * `num_min_hashes` - Number of min-hashes per item (must be at least 64).
    ///                      More min-hashes are slower but more accurate.
    /// * `band_width` - Number of min-hashes joined into one band (must be more than 0).
    ///                  Wider bands are faster but less accurate.
    /// * `strategy` - Strategy generating min-hashes and signatures.
    ///
    /// The strategy's own parameters are used for hashing; `num_min_hashes` and
    /// `band_width` are only validated and reported by the getters.
    ///
    /// # Errors
    ///
    /// [`LshIndexError::Configuration`](crate::LshIndexError::Configuration) is returned
    /// if the parameters are out of range.
    pub fn new(num_min_hashes: usize, band_width: usize, strategy: S) -> Result<Self> {
        check_parameters(num_min_hashes, band_width)?;
        if num_min_hashes != strategy.num_min_hashes() || band_width != strategy.band_width() {
            tracing::debug!(
                num_min_hashes,
                band_width,
                strategy_num_min_hashes = strategy.num_min_hashes(),
                strategy_band_width = strategy.band_width(),
                "index parameters differ from the strategy; the strategy's are used for hashing"
            );
        }
        tracing::debug!(
            num_min_hashes,
            band_width,
            buckets_per_item = strategy.num_buckets(),
            "created similarity index"
        );
        Ok(Self {
            num_min_hashes,
            band_width,
            strategy,
            buckets: DashMap::new(),
            signatures: DashMap::new(),
            num_items: AtomicUsize::new(0),
        })
    }

    /// Inserts an item.
    ///
    /// The item is recorded under its signature, and the signature is recorded
    /// once in every bucket of the item. Concurrent insertions into the same
    /// bucket never lose each other's signatures.
    ///
    /// # Errors
    ///
    /// [`LshIndexError::EmptyInput`](crate::LshIndexError::EmptyInput) is returned
    /// if the item has no feature. Nothing is recorded in that case.
    pub fn add(&self, item: T) -> Result<()>
    where
        T: FeatureSource,
    {
        let result = self.strategy.hash_item(&item)?;
        let signature = result.signature();

        // The signature table is written first, so that every signature in a bucket
        // can be resolved to items.
        self.signatures.entry(signature).or_default().push(item);
        for &bucket in result.buckets() {
            self.buckets.entry(bucket).or_default().insert(signature);
        }
        self.num_items.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    /// Inserts items with the rayon thread pool.
    ///
    /// # Errors
    ///
    /// [`LshIndexError::EmptyInput`](crate::LshIndexError::EmptyInput) is returned
    /// if an item has no feature. Items other than the failed one may have been inserted.
    pub fn add_all_in_parallel<I>(&self, items: I) -> Result<()>
    where
        I: IntoParallelIterator<Item = T>,
        T: FeatureSource + Send + Sync,
    {
        items.into_par_iter().try_for_each(|item| self.add(item))
    }

    /// Searches for the items similar to a query.
    ///
    /// A stored item is returned if it shares at least one bucket with the query
    /// and its signature differs in fewer than `64 - 64 * threshold_percent / 100`
    /// bits from the query's one. Items with a signature identical to the query's
    /// one are returned under any threshold, so the query itself is found if it was inserted.
    ///
    /// Thresholds outside `[0, 100]` are accepted; lower values return more items.
    ///
    /// # Errors
    ///
    /// [`LshIndexError::EmptyInput`](crate::LshIndexError::EmptyInput) is returned
    /// if the query has no feature.
    pub fn search<Q>(&self, query: &Q, threshold_percent: i32) -> Result<HashSet<T>>
    where
        Q: FeatureSource + ?Sized,
    {
        let result = self.strategy.hash(&query.features())?;
        let signature = result.signature();
        let max_differences = codec::max_differences(threshold_percent);

        let mut matched = HashSet::new();
        for bucket in result.buckets() {
            if let Some(stored) = self.buckets.get(bucket) {
                matched.extend(
                    stored
                        .iter()
                        .filter(|&s| codec::signatures_match(signature, s, max_differences)),
                );
            }
        }

        let mut similar = HashSet::new();
        for s in matched {
            if let Some(items) = self.signatures.get(&s) {
                similar.extend(items.iter().cloned());
            }
        }
        Ok(similar)
    }

    /// Gets the items recorded under a signature, in insertion order.
    pub fn items_with_signature(&self, signature: u64) -> Vec<T> {
        self.signatures
            .get(&signature)
            .map_or_else(Vec::new, |items| items.value().clone())
    }

    /// Gets the signatures recorded in a bucket, in insertion order.
    pub fn signatures_in_bucket(&self, bucket: i32) -> Vec<u64> {
        self.buckets
            .get(&bucket)
            .map_or_else(Vec::new, |stored| stored.iter().collect())
    }

    /// Gets the strategy.
    pub const fn strategy(&self) -> &S {
        &self.strategy
    }

    /// Gets the number of min-hashes given at construction.
    pub const fn num_min_hashes(&self) -> usize {
        self.num_min_hashes
    }

    /// Gets the band width given at construction.
    pub const fn band_width(&self) -> usize {
        self.band_width
    }

    /// Gets the number of distinct buckets holding signatures.
    pub fn total_buckets(&self) -> usize {
        self.buckets.len()
    }

    /// Gets the number of distinct signatures.
    pub fn num_signatures(&self) -> usize {
        self.signatures.len()
    }

    /// Gets the number of inserted items.
    pub fn len(&self) -> usize {
        self.num_items.load(Ordering::Relaxed)
    }

    /// Checks if the index is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Gets the ratio of bucket insertions that landed in an already existing bucket.
    pub fn collision_rate(&self) -> f64 {
        let insertions = self.len() * self.strategy.num_buckets();
        if insertions == 0 {
            return 0.;
        }
        1. - self.total_buckets() as f64 / insertions as f64
    }

    /// Gets the approximate memory usage of the tables in bytes.
    pub fn memory_in_bytes(&self) -> usize {
        let buckets: usize = self
            .buckets
            .iter()
            .map(|e| {
                std::mem::size_of::<(i32, SignatureSet)>() + e.value().memory_in_bytes()
            })
            .sum();
        let signatures: usize = self
            .signatures
            .iter()
            .map(|e| {
                std::mem::size_of::<(u64, Vec<T>)>()
                    + e.value().capacity() * std::mem::size_of::<T>()
            })
            .sum();
        buckets + signatures
    }
}
