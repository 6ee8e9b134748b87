//! Finance Engine CLI
//!
//! Reads JSON calculation requests, runs them, and prints JSON results

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use finance_engine::amortization::write_schedule_csv;
use finance_engine::{CalculationRequest, CalculationResponse, EngineConfig, ScenarioRunner};
use log::info;
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "finance_engine")]
#[command(about = "Run financial projections and simulations from JSON requests")]
struct Args {
    /// Engine config file (default: config/engine.json if present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pretty: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run a single calculation request
    Run {
        /// Request JSON file
        #[arg(short, long)]
        input: PathBuf,

        /// Write the amortization schedule to this CSV file
        #[arg(long)]
        csv: Option<PathBuf>,

        /// Seed for Monte Carlo requests
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Run an array of calculation requests in parallel
    Batch {
        /// JSON file holding an array of requests
        #[arg(short, long)]
        input: PathBuf,
    },
}

/// One batch result; exactly one of `response` and `error` is set
#[derive(Serialize)]
struct BatchEntry {
    index: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    response: Option<CalculationResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => EngineConfig::from_json_path(path)
            .and_then(EngineConfig::with_env_overrides)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => EngineConfig::load().context("loading default config")?,
    };
    let runner = ScenarioRunner::new(config);

    match args.command {
        Command::Run { input, csv, seed } => {
            let mut request: CalculationRequest = read_json(&input)?;
            if let Some(seed) = seed {
                request = request.with_seed(seed);
            }
            info!("running {} request from {}", request.calculator(), input.display());

            let response = runner
                .run(&request)
                .with_context(|| format!("{} calculation failed", request.calculator()))?;

            if let Some(csv_path) = csv {
                export_schedule(&response, &csv_path)?;
            }
            print_json(&response, args.pretty)
        }
        Command::Batch { input } => {
            let requests: Vec<CalculationRequest> = read_json(&input)?;
            let entries: Vec<BatchEntry> = runner
                .run_batch(&requests)
                .into_iter()
                .enumerate()
                .map(|(index, result)| match result {
                    Ok(response) => BatchEntry {
                        index,
                        response: Some(response),
                        error: None,
                    },
                    Err(err) => BatchEntry {
                        index,
                        response: None,
                        error: Some(err.to_string()),
                    },
                })
                .collect();

            let failed = entries.iter().filter(|e| e.error.is_some()).count();
            info!("batch complete: {} ok, {} failed", entries.len() - failed, failed);
            print_json(&entries, args.pretty)
        }
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    serde_json::from_reader(std::io::BufReader::new(file))
        .with_context(|| format!("parsing {}", path.display()))
}

fn export_schedule(response: &CalculationResponse, path: &Path) -> Result<()> {
    let CalculationResponse::Amortization(result) = response else {
        bail!("--csv is only supported for amortization requests");
    };
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    write_schedule_csv(&result.schedule, BufWriter::new(file))
        .with_context(|| format!("writing schedule to {}", path.display()))?;
    info!("wrote {} schedule rows to {}", result.schedule.len(), path.display());
    Ok(())
}

fn print_json<T: Serialize>(value: &T, pretty: bool) -> Result<()> {
    let text = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{text}");
    Ok(())
}
