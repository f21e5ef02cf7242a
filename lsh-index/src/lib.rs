//! In-memory approximate similarity index with banded locality-sensitive hashing.
//!
//! An item is represented by a set of integer features ([`FeatureSource`]).
//! A [`HashingStrategy`] reduces the features into several min-hashes, which are
//! joined band by band into bucket indices and packed into a 64-bit signature.
//! A [`SimilarityIndex`] finds candidates of similar items through shared buckets
//! and filters them by the Hamming distance between signatures.
//!
//! # Examples
//!
//! ```
//! use lsh_index::{ReferencePointStrategy, SimilarityIndex};
//!
//! let strategy = ReferencePointStrategy::new(120, 5, Some(42)).unwrap();
//! let index = SimilarityIndex::new(120, 5, strategy).unwrap();
//!
//! let mut item: Vec<i32> = (0..100).map(|i| i * 7).collect();
//! index.add(item.clone()).unwrap();
//!
//! // Items sharing most of their features are found.
//! let original = item.clone();
//! item[0] = 12345;
//! assert!(index.search(&item, 70).unwrap().contains(&original));
//! ```
#![deny(missing_docs)]

pub mod bucket;
pub mod codec;
pub mod errors;
pub mod feature;
pub mod index;
pub mod strategy;

pub use errors::{LshIndexError, Result};
pub use feature::FeatureSource;
pub use index::SimilarityIndex;
pub use strategy::{
    HashingResult, HashingStrategy, ReferencePointStrategy, ScoredTrainingStrategy,
};
