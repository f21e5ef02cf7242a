//! Finds simulated devices again after changing some of their attributes.
mod common;

use std::borrow::Cow;
use std::error::Error;
use std::hash::{Hash, Hasher};
use std::time::Instant;

use clap::Parser;
use rand::{Rng, SeedableRng};

use common::StrategyKind;
use lsh_index::{FeatureSource, SimilarityIndex};

#[derive(Parser, Debug)]
#[clap(
    name = "lsh-index-devices",
    about = "A program to find changed devices among simulated ones."
)]
struct Args {
    /// Number of simulated devices.
    #[clap(short = 'n', long, default_value = "50000")]
    num_devices: usize,

    /// Number of attributes per device.
    #[clap(short = 'a', long, default_value = "100")]
    num_attributes: usize,

    /// Number of attributes changed before searching.
    #[clap(short = 'c', long, default_value = "15")]
    num_to_change: usize,

    /// Devices whose signatures are less similar than this percentage are ignored.
    #[clap(short = 't', long, default_value = "70")]
    threshold: i32,

    /// Number of bands, i.e., buckets stored per device.
    #[clap(short = 'b', long, default_value = "20")]
    num_bands: usize,

    /// Number of min-hashes joined into one band. Wider bands yield greater precision
    /// but less recall.
    #[clap(short = 'w', long, default_value = "6")]
    band_width: usize,

    /// Hashing strategy, "reference" or "scored".
    #[clap(short = 'm', long, default_value = "reference")]
    strategy: StrategyKind,

    /// Number of candidate hashes of the scored strategy.
    #[clap(long, default_value = "360")]
    num_candidate_hashes: usize,

    /// Number of devices used to train the scored strategy.
    #[clap(long, default_value = "1000")]
    num_training: usize,

    /// Seed value for random values.
    #[clap(short = 's', long)]
    seed: Option<u64>,

    /// Disables parallel insertion.
    #[clap(short = 'p', long)]
    disable_parallel: bool,
}

/// Simulated device identified by its id.
#[derive(Clone, Debug)]
struct Device {
    id: usize,
    attributes: Vec<i32>,
}

impl PartialEq for Device {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Device {}

impl Hash for Device {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl FeatureSource for Device {
    fn features(&self) -> Cow<'_, [i32]> {
        Cow::Borrowed(&self.attributes)
    }
}

/// Generates devices whose attributes take one of a few values.
/// Data with many common values may not hash uniformly.
struct DeviceGenerator {
    options: Vec<Vec<i32>>,
}

impl DeviceGenerator {
    const NUM_OPTIONS: usize = 10;
    const VALUE_CEILING: i32 = 10000;

    fn new<R: Rng>(num_attributes: usize, rng: &mut R) -> Self {
        let options = (0..num_attributes)
            .map(|_| {
                (0..Self::NUM_OPTIONS)
                    .map(|_| rng.gen_range(0..Self::VALUE_CEILING))
                    .collect()
            })
            .collect();
        Self { options }
    }

    fn device<R: Rng>(&self, id: usize, rng: &mut R) -> Device {
        let attributes = self
            .options
            .iter()
            .map(|o| o[rng.gen_range(0..Self::NUM_OPTIONS)])
            .collect();
        Device { id, attributes }
    }

    fn change<R: Rng>(&self, device: &mut Device, num_to_change: usize, rng: &mut R) {
        for _ in 0..num_to_change {
            let i = rng.gen_range(0..self.options.len());
            device.attributes[i] = self.options[i][rng.gen_range(0..Self::NUM_OPTIONS)];
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    common::init_tracing();
    let args = Args::parse();

    if args.num_attributes == 0 {
        return Err("num_attributes must not be 0.".into());
    }

    let seed = args.seed.unwrap_or_else(rand::random::<u64>);
    let mut rng = rand_xoshiro::Xoshiro256PlusPlus::seed_from_u64(seed);

    let generator = DeviceGenerator::new(args.num_attributes, &mut rng);
    let mut devices: Vec<_> = (0..args.num_devices)
        .map(|id| generator.device(id, &mut rng))
        .collect();

    let num_min_hashes = args.num_bands * args.band_width;
    let strategy = common::build_strategy(
        args.strategy,
        num_min_hashes,
        args.band_width,
        args.num_candidate_hashes,
        devices.iter().take(args.num_training),
        Some(seed),
    )?;
    let index = SimilarityIndex::new(num_min_hashes, args.band_width, strategy)?;

    {
        eprintln!("Inserting {} devices...", devices.len());
        let start = Instant::now();
        if args.disable_parallel {
            for device in &devices {
                index.add(device.clone())?;
            }
        } else {
            index.add_all_in_parallel(devices.clone())?;
        }
        eprintln!(
            "Inserted in {} sec, consuming {} MiB",
            start.elapsed().as_secs_f64(),
            index.memory_in_bytes() as f64 / (1024. * 1024.)
        );
    }

    for device in devices.iter_mut() {
        generator.change(device, args.num_to_change, &mut rng);
    }

    eprintln!("Searching for changed devices...");
    let start = Instant::now();
    let mut successes = 0;
    let mut failures = 0;
    for (i, device) in devices.iter().enumerate() {
        if (i + 1) % 10000 == 0 {
            eprintln!("Processed {} devices...", i + 1);
        }
        if index.search(device, args.threshold)?.contains(device) {
            successes += 1;
        } else {
            failures += 1;
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
