use lsh_index::codec::{band, pack_signature};
use lsh_index::{HashingStrategy, ReferencePointStrategy, ScoredTrainingStrategy, SimilarityIndex};
use proptest::prelude::*;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn reference_point_is_order_independent(
        features in prop::collection::vec(any::<i32>(), 1..200),
        shift in any::<usize>(),
        seed in any::<u64>(),
    ) {
        let strategy = ReferencePointStrategy::new(64, 4, Some(seed)).unwrap();
        let expected = strategy.hash(&features).unwrap();
        let mut permuted = features.clone();
        permuted.reverse();
        let len = permuted.len();
        permuted.rotate_left(shift % len);
        prop_assert_eq!(strategy.hash(&permuted).unwrap(), expected);
    }

    #[test]
    fn scored_training_is_order_independent(
        features in prop::collection::vec(any::<i32>(), 1..200),
        seed in any::<u64>(),
    ) {
        let no_training: [Vec<i32>; 0] = [];
        let strategy = ScoredTrainingStrategy::new(64, 4, 96, no_training, Some(seed)).unwrap();
        let expected = strategy.hash(&features).unwrap();
        let mut permuted = features.clone();
        permuted.reverse();
        prop_assert_eq!(strategy.hash(&permuted).unwrap(), expected);
    }

    #[test]
    fn signature_uses_first_64_values(
        values in prop::collection::vec(any::<i32>(), 0..100),
    ) {
        let n = values.len().min(64);
        let expected = values[..n]
            .iter()
            .enumerate()
            .fold(0u64, |acc, (i, &v)| acc | (((v & 1) as u64) << (n - 1 - i)));
        prop_assert_eq!(pack_signature(&values), expected);
    }

    #[test]
    fn band_truncates_trailing_group(
        values in prop::collection::vec(any::<i32>(), 0..100),
        band_width in 1usize..20,
    ) {
        prop_assert_eq!(band(&values, band_width).len(), values.len() / band_width);
    }

    #[test]
    fn lower_threshold_never_loses_matches(
        items in prop::collection::vec(prop::collection::vec(0i32..500, 20..40), 1..30),
        query in prop::collection::vec(0i32..500, 20..40),
        t1 in prop_oneof![-20i32..120, any::<i32>()],
        t2 in prop_oneof![-20i32..120, any::<i32>()],
    ) {
        let (high, low) = if t1 >= t2 { (t1, t2) } else { (t2, t1) };
        let strategy = ReferencePointStrategy::new(64, 2, Some(5)).unwrap();
        let index = SimilarityIndex::new(64, 2, strategy).unwrap();
        for item in items {
            index.add(item).unwrap();
        }
        let strict = index.search(&query, high).unwrap();
        let loose = index.search(&query, low).unwrap();
        prop_assert!(strict.is_subset(&loose));
    }
}
