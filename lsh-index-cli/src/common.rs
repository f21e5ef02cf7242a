use std::str::FromStr;

use lsh_index::{
    FeatureSource, HashingStrategy, ReferencePointStrategy, Result, ScoredTrainingStrategy,
};
use tracing_subscriber::EnvFilter;

#[derive(Clone, Copy, Debug)]
pub enum StrategyKind {
    Reference,
    Scored,
}

impl FromStr for StrategyKind {
    type Err = &'static str;
    fn from_str(kind: &str) -> Result<Self, Self::Err> {
        match kind {
            "reference" => Ok(Self::Reference),
            "scored" => Ok(Self::Scored),
            _ => Err("Could not parse a strategy option"),
        }
    }
}

/// Builds a strategy of the given kind. The training set is used only by the scored strategy.
pub fn build_strategy<I, F>(
    kind: StrategyKind,
    num_min_hashes: usize,
    band_width: usize,
    num_candidate_hashes: usize,
    training_set: I,
    seed: Option<u64>,
) -> Result<Box<dyn HashingStrategy>>
where
    I: IntoIterator<Item = F>,
    F: FeatureSource,
{
    Ok(match kind {
        StrategyKind::Reference => Box::new(ReferencePointStrategy::new(
            num_min_hashes,
            band_width,
            seed,
        )?),
        StrategyKind::Scored => Box::new(ScoredTrainingStrategy::new(
            num_min_hashes,
            band_width,
            num_candidate_hashes,
            training_set,
            seed,
        )?),
    })
}

/// Installs a subscriber printing events to stderr, filtered by `RUST_LOG`.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();
}
