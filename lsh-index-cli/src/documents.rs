//! Measures how often similar documents belong to the same category.
mod common;
mod text;

use std::borrow::Cow;
use std::error::Error;
use std::fs::File;
use std::hash::{Hash, Hasher};
use std::io::{BufRead, BufReader};
use std::path::PathBuf;
use std::time::Instant;

use clap::Parser;
use hashbrown::{HashMap, HashSet};

use common::StrategyKind;
use lsh_index::{FeatureSource, SimilarityIndex};
use text::TextFeaturizer;

#[derive(Parser, Debug)]
#[clap(
    name = "lsh-index-documents",
    about = "A program to evaluate similar-document searches against document categories."
)]
struct Args {
    /// File path to a document file, where each line is a category and a text
    /// separated by a tab.
    #[clap(short = 'i', long)]
    document_path: PathBuf,

    /// Documents whose signatures are less similar than this percentage are ignored.
    #[clap(short = 't', long, default_value = "70")]
    threshold: i32,

    /// Number of bands, i.e., buckets stored per document.
    #[clap(short = 'b', long, default_value = "40")]
    num_bands: usize,

    /// Number of min-hashes joined into one band.
    #[clap(short = 'w', long, default_value = "3")]
    band_width: usize,

    /// Window size of word shingles (must be more than 0).
    #[clap(long, default_value = "2")]
    window_size: usize,

    /// Shingles appearing in more documents than this value are removed.
    #[clap(long, default_value = "2000")]
    max_df: usize,

    /// Hashing strategy, "reference" or "scored".
    #[clap(short = 'm', long, default_value = "reference")]
    strategy: StrategyKind,

    /// Number of candidate hashes of the scored strategy.
    #[clap(long, default_value = "360")]
    num_candidate_hashes: usize,

    /// Seed value for random values.
    #[clap(short = 's', long)]
    seed: Option<u64>,
}

/// Document identified by its line number.
#[derive(Clone, Debug)]
struct Document {
    id: usize,
    category: String,
    feature: Vec<i32>,
}

impl PartialEq for Document {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Document {}

impl Hash for Document {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl FeatureSource for Document {
    fn features(&self) -> Cow<'_, [i32]> {
        Cow::Borrowed(&self.feature)
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    common::init_tracing();
    let args = Args::parse();

    let seed = args.seed.unwrap_or_else(rand::random::<u64>);
    let featurizer = TextFeaturizer::new(args.window_size, seed)?;

    let mut documents = {
        eprintln!("Loading documents and extracting features...");
        let mut documents = vec![];
        for (id, line) in BufReader::new(File::open(&args.document_path)?)
            .lines()
            .enumerate()
        {
            let line = line?;
            let (category, body) = line
                .split_once('\t')
                .ok_or_else(|| format!("Line {} has no tab separator.", id + 1))?;
            let mut feature = vec![];
            featurizer.extract(body, &mut feature);
            documents.push(Document {
                id,
                category: category.to_string(),
                feature,
            });
        }
        documents
    };

    remove_common_features(&mut documents, args.max_df);
    let num_loaded = documents.len();
    documents.retain(|d| !d.feature.is_empty());
    if documents.len() != num_loaded {
        tracing::warn!(
            num_skipped = num_loaded - documents.len(),
            "skipped documents without features"
        );
    }

    let num_min_hashes = args.num_bands * args.band_width;
    let strategy = common::build_strategy(
        args.strategy,
        num_min_hashes,
        args.band_width,
        args.num_candidate_hashes,
        documents.iter(),
        Some(seed),
    )?;
    let index = SimilarityIndex::new(num_min_hashes, args.band_width, strategy)?;

    {
        eprintln!("Inserting {} documents...", documents.len());
        let start = Instant::now();
        index.add_all_in_parallel(documents.clone())?;
        eprintln!(
            "Inserted in {} sec, consuming {} MiB",
            start.elapsed().as_secs_f64(),
            index.memory_in_bytes() as f64 / (1024. * 1024.)
        );
    }

    eprintln!("Searching for similar documents...");
    let start = Instant::now();
    let mut successes = 0;
    let mut failures = 0;
    for document in &documents {
        for similar in index.search(document, args.threshold)? {
            if similar == *document {
                continue;
            }
            if similar.category == document.category {
                successes += 1;
            } else {
                failures += 1;
            }
        }
    }
    let search_time = start.elapsed().as_secs_f64();

    println!("Successes: {successes}");
    println!("Failures: {failures}");
    println!(
        "Accuracy: {:.1}%",
        100. * successes as f64 / (successes + failures).max(1) as f64
    );
    println!("Search time: {search_time} sec");
    println!("Total buckets: {}", index.total_buckets());
    println!("Collision rate: {:.1}%", 100. * index.collision_rate());

    Ok(())
}

/// Removes the features appearing in more than `max_df` documents.
fn remove_common_features(documents: &mut [Document], max_df: usize) {
    let mut counter = HashMap::<i32, usize>::new();
    let mut dedup = HashSet::new();
    for document in documents.iter() {
        dedup.clear();
        for &f in &document.feature {
            if dedup.insert(f) {
                *counter.entry(f).or_insert(0) += 1;
            }
        }
    }
    for document in documents.iter_mut() {
        document.feature.retain(|f| counter[f] <= max_df);
    }
}
