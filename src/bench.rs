//! Benchmarks weighted_pick by timing repeated samples from a synthetic set
use clap::Parser;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::hint::black_box;
use std::process;
use std::time::Instant;
use weighted_pick::weighted::WeightedSet;

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(flatten)]
    verbose: clap_verbosity_flag::Verbosity,
    #[arg(short, long, default_value_t = 1000)]
    entries: usize,
    #[arg(short, long, default_value_t = 1000000)]
    iterations: usize,
    #[arg(long, default_value_t = 10)]
    episodes: usize,
    /// Reassign a random weight every N samples, forcing the total to be recomputed
    #[arg(short, long)]
    mutate_every: Option<usize>,
    #[arg(short, long, default_value_t = 0)]
    seed: u64,
}

fn build_set(entries: usize, rng: &mut StdRng) -> WeightedSet<usize> {
    let mut set = WeightedSet::new();
    for key in 0..entries {
        if let Err(err) = set.insert(key, rng.gen_range(0.5..10.0)) {
            eprintln!("Failed to build benchmark set: {}", err);
            process::exit(1);
        }
    }
    set
}

fn run_benchmark(
    set: &mut WeightedSet<usize>,
    iterations: usize,
    mutate_every: Option<usize>,
    rng: &mut StdRng,
) -> f64 {
    let start = Instant::now();
    for i in 0..iterations {
        if let Some(every) = mutate_every {
            if every > 0 && i % every == 0 {
                let key = rng.gen_range(0..set.len());
                let weight = rng.gen_range(0.5..10.0);
                if let Err(err) = set.set_weight(&key, weight) {
                    log::error!("Failed to mutate key {}: {}", key, err);
                }
            }
        }
        match set.sample_with(rng) {
            Ok(key) => {
                black_box(key);
            }
            Err(err) => {
                eprintln!("Sampling failed: {}", err);
                process::exit(1);
            }
        }
    }
    let elapsed = start.elapsed();
    let samples_per_second = iterations as f64 / elapsed.as_secs_f64();
    println!(
        "{} samples in {:.2} seconds ({:.2} samples per second)",
        iterations,
        &elapsed.as_secs_f64(),
        samples_per_second
    );
    elapsed.as_secs_f64()
}

fn main() {
    let args = Args::parse();
    println!(
        "===\nEntries: {}, Iterations: {}, Episodes: {}, Mutate every: {:?}",
        args.entries, args.iterations, args.episodes, args.mutate_every
    );
    println!("---");
    env_logger::Builder::new()
        .filter_level(args.verbose.log_level_filter())
        .init();

    if args.entries == 0 {
        eprintln!("Need at least one entry to sample");
        process::exit(1);
    }

    let mut rng = StdRng::seed_from_u64(args.seed);
    let mut set = build_set(args.entries, &mut rng);

    let durations: Vec<f64> = (0..args.episodes)
        .map(|_| run_benchmark(&mut set, args.iterations, args.mutate_every, &mut rng))
        .collect();
    println!("---");
    println!(
        "Average duration: {:.2} seconds",
        durations.iter().sum::<f64>() / durations.len() as f64
    );
    println!(
        "Average samples per second: {}",
        (args.episodes * args.iterations) as f64 / durations.iter().sum::<f64>()
    );
}
