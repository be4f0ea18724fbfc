use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use rfid_synth::schema::files;
use rfid_synth::table::{read_csv_as_strings, summarize_events_frame};
use rfid_synth::{CsvSink, LocationPerformance, Pipeline, SynthConfig};

/// Synthesize RFID warehouse inventory data
#[derive(Parser, Debug)]
#[command(name = "rfid-synth")]
#[command(about = "Generate products, RFID read events and location performance tables")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the generator and write the CSV tables
    Generate(GenerateArgs),

    /// Recompute the location summary of an existing read-event CSV
    Summarize {
        /// Path to rfid_reads.csv
        reads_csv: PathBuf,
    },
}

#[derive(Args, Debug)]
struct GenerateArgs {
    /// TOML file with generation parameters
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of products in the catalog
    #[arg(long)]
    products: Option<usize>,

    /// Number of warehouse zones
    #[arg(long)]
    locations: Option<usize>,

    /// Number of RFID readers
    #[arg(long)]
    readers: Option<u32>,

    /// Days of simulated history
    #[arg(long)]
    days: Option<u32>,

    /// Probability that a single read attempt succeeds
    #[arg(long)]
    success_probability: Option<f64>,

    /// RNG seed for a reproducible run
    #[arg(long, env = "RFID_SYNTH_SEED")]
    seed: Option<u64>,

    /// Day after the simulated window (YYYY-MM-DD), defaults to today
    #[arg(long)]
    reference_date: Option<NaiveDate>,

    /// Directory receiving the CSV files
    #[arg(short, long)]
    output_dir: Option<PathBuf>,
}

impl GenerateArgs {
    fn into_config(self) -> Result<SynthConfig> {
        let mut config = match &self.config {
            Some(path) => SynthConfig::from_toml_file(path)
                .with_context(|| format!("Failed to load config: {}", path.display()))?,
            None => SynthConfig::default(),
        };
        if let Some(n) = self.products {
            config.num_products = n;
        }
        if let Some(n) = self.locations {
            config.num_locations = n;
        }
        if let Some(n) = self.readers {
            config.num_readers = n;
        }
        if let Some(n) = self.days {
            config.days = n;
        }
        if let Some(p) = self.success_probability {
            config.success_probability = p;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        if self.reference_date.is_some() {
            config.reference_date = self.reference_date;
        }
        if let Some(dir) = self.output_dir {
            config.output_dir = dir;
        }
        Ok(config)
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Generate(args) => generate(args),
        Commands::Summarize { reads_csv } => summarize(reads_csv),
    }
}

fn generate(args: GenerateArgs) -> Result<()> {
    let config = args.into_config()?;
    let output_dir = config.output_dir.clone();
    let pipeline = Pipeline::new(config).context("Invalid configuration")?;

    let mut sink = CsvSink::create(&output_dir)
        .with_context(|| format!("Failed to create output directory: {}", output_dir.display()))?;
    let summary = pipeline.run(&mut sink).context("Generation failed")?;

    println!("\nLocation Performance Summary:");
    print_performance(&summary.performance);
    println!();
    println!("Data Generation Complete!");
    println!("- {} products created", summary.product_count);
    println!("- {} RFID read events generated", summary.event_count);
    println!("- Seed: {}", summary.seed);
    println!(
        "- Files saved to {} ({}, {}, {})",
        sink.dir().display(),
        files::PRODUCTS,
        files::READ_EVENTS,
        files::LOCATION_PERFORMANCE
    );
    Ok(())
}

fn summarize(path: PathBuf) -> Result<()> {
    let df = read_csv_as_strings(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let rows = summarize_events_frame(&df)?;
    println!("Location Performance Summary ({} events):", df.height());
    print_performance(&rows);
    Ok(())
}

fn print_performance(rows: &[LocationPerformance]) {
    println!(
        "{:<10} {:>12} {:>20} {:>12}",
        "location", "success_rate", "avg_signal_strength", "event_count"
    );
    for r in rows {
        println!(
            "{:<10} {:>12.3} {:>20.3} {:>12}",
            r.location, r.success_rate, r.avg_signal_strength, r.event_count
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn generate_config(argv: &[&str]) -> SynthConfig {
        let cli = Cli::try_parse_from(argv).unwrap();
        match cli.command {
            Commands::Generate(args) => args.into_config().unwrap(),
            other => panic!("expected generate, got {other:?}"),
        }
    }

    #[test]
    fn flags_override_toml_and_toml_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("synth.toml");
        std::fs::write(&path, "num_products = 50\ndays = 4\nseed = 9\n").unwrap();
        let path = path.to_str().unwrap();

        let config = generate_config(&[
            "rfid-synth", "generate", "--config", path, "--days", "3",
        ]);
        assert_eq!(config.days, 3);
        assert_eq!(config.num_products, 50);
        assert_eq!(config.seed, Some(9));
        assert_eq!(config.num_readers, 20);

        let config = generate_config(&[
            "rfid-synth", "generate", "--config", path, "--seed", "11",
            "--output-dir", "out",
        ]);
        assert_eq!(config.seed, Some(11));
        assert_eq!(config.days, 4);
        assert_eq!(config.output_dir, PathBuf::from("out"));
    }

    #[test]
    fn flags_without_file_override_defaults() {
        let config = generate_config(&["rfid-synth", "generate", "--products", "12"]);
        assert_eq!(config.num_products, 12);
        assert_eq!(config.days, 7);
        assert_eq!(config.read_frequencies, vec![1, 2, 3, 5, 10]);
    }

    #[test]
    fn missing_config_file_is_an_error() {
        let cli = Cli::try_parse_from(["rfid-synth", "generate", "--config", "/nonexistent/x.toml"])
            .unwrap();
        let Commands::Generate(args) = cli.command else {
            panic!("expected generate");
        };
        assert!(args.into_config().is_err());
    }
}
