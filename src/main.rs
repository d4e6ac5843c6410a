//! Draws samples from a weight table and compares observed frequencies to the expected ones
use clap::Parser;
use env_logger::fmt::Formatter;
use log::Record;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::io::Write;
use std::{fs, process, thread};
use weighted_pick::weighted::{WeightError, WeightedSet};

const DEFAULT_SAMPLES: usize = 10000;

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg()]
    config_file: String,
    /// Number of samples to draw. Overrides the config file.
    #[arg(short('n'), long)]
    samples: Option<usize>,
    /// Seed for a reproducible run
    #[arg(short, long)]
    seed: Option<u64>,
    /// Write a JSON report. Without a path it goes to reports/<timestamp>.json
    #[arg(short, long, num_args = 0..=1)]
    report: Option<Option<String>>,
    #[command(flatten)]
    verbose: clap_verbosity_flag::Verbosity,
}

#[derive(Debug, Deserialize)]
struct DrawSettings {
    entries: WeightedSet<String>,
    samples: Option<usize>,
}

#[derive(Debug, Serialize)]
struct ReportRow {
    key: String,
    count: usize,
    observed: f64,
    expected: f64,
}

#[derive(Debug, Serialize)]
struct Report {
    config_file: String,
    generated_at: String,
    samples: usize,
    seed: Option<u64>,
    rows: Vec<ReportRow>,
}

fn run_draws(
    set: &WeightedSet<String>,
    samples: usize,
    rng: &mut StdRng,
) -> Result<Vec<ReportRow>, WeightError> {
    let mut counts: HashMap<&String, usize> = HashMap::new();
    for _ in 0..samples {
        *counts.entry(set.sample_with(rng)?).or_insert(0) += 1;
    }
    set.iter()
        .map(|(key, _)| {
            let count = counts.get(key).copied().unwrap_or(0);
            Ok(ReportRow {
                key: key.clone(),
                count,
                observed: if samples == 0 {
                    0.0
                } else {
                    100.0 * count as f64 / samples as f64
                },
                expected: set.probability_percentage(key)?,
            })
        })
        .collect()
}

fn fail(message: String) -> ! {
    eprintln!("{}", message);
    process::exit(1);
}

fn main() {
    let args = Args::parse();
    env_logger::Builder::new()
        .format(|buf: &mut Formatter, record: &Record| {
            let thread_id = thread::current().id();
            let timestamp = buf.timestamp_millis();
            writeln!(
                buf,
                "[{}] [Thread: {:?}] [{}] - {}",
                timestamp,
                thread_id,
                record.level(),
                record.args()
            )
        })
        .filter_level(args.verbose.log_level_filter())
        .init();

    let config_file = fs::read_to_string(&args.config_file).unwrap_or_else(|err| {
        fail(format!(
            "Failed to read config file {}: {}",
            args.config_file, err
        ))
    });
    let settings: DrawSettings = serde_json::from_str(&config_file).unwrap_or_else(|err| {
        fail(format!(
            "Failed to parse config file {}: {}",
            args.config_file, err
        ))
    });
    let samples = args
        .samples
        .or(settings.samples)
        .unwrap_or(DEFAULT_SAMPLES);
    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    log::info!(
        "Drawing {} samples from {} entries (total weight {})",
        samples,
        settings.entries.len(),
        settings.entries.total_weight()
    );

    let rows = run_draws(&settings.entries, samples, &mut rng)
        .unwrap_or_else(|err| fail(format!("Failed to sample: {}", err)));

    println!("Key\tCount\tObserved\tExpected");
    for row in rows.iter() {
        println!(
            "{}\t{}\t{:>5.2}%\t{:>5.2}%",
            row.key, row.count, row.observed, row.expected
        );
    }

    if let Some(report_path) = args.report {
        let now = chrono::Local::now();
        let report_path = report_path
            .unwrap_or_else(|| format!("reports/{}.json", now.format("%Y-%m-%d_%H-%M-%S")));
        let report = Report {
            config_file: args.config_file.clone(),
            generated_at: now.to_rfc3339(),
            samples,
            seed: args.seed,
            rows,
        };
        if let Some(parent) = std::path::Path::new(&report_path).parent() {
            if let Err(err) = fs::create_dir_all(parent) {
                fail(format!(
                    "Failed to create report folder {}: {}",
                    parent.display(),
                    err
                ));
            }
        }
        let serialized = serde_json::to_string_pretty(&report)
            .unwrap_or_else(|err| fail(format!("Failed to serialize report: {}", err)));
        if let Err(err) = fs::write(&report_path, serialized) {
            fail(format!("Failed to write report {}: {}", report_path, err));
        }
        println!("Report written to {}", report_path);
    }
}
