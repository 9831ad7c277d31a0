//! # tp-cli
//!
//! Command-line driver for the twin prime search.
//!
//! # Usage
//!
//! ```bash
//! # Five pairs, seeds included, on the nine-worker grid
//! cargo run -p tp-cli --bin twin-primes -- 5 --workers 9
//!
//! # Worker count from the environment, stats as JSON on stderr
//! TWIN_PRIMES_WORKERS=auto cargo run -p tp-cli --bin twin-primes -- 1000 --stats
//! ```
//!
//! Results go to stdout exactly once. Progress, errors, and stats go to
//! stderr.

pub mod logging;

use clap::Parser;
use thiserror::Error;
use tp_cluster::{ClusterConfig, ClusterError, Coordinator, TwinPrimeReport};
use tp_core::{SearchRequest, TwinPrimeError};

/// Parallel twin prime search.
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "twin-primes", version, about)]
pub struct Args {
    /// Total twin prime pairs to print, including (3, 5) and (5, 7)
    #[arg(value_name = "NUM_PAIRS")]
    pub requested_total: u64,

    /// Worker count, or `auto` for one per CPU [default: $TWIN_PRIMES_WORKERS, then 1]
    #[arg(short, long, value_name = "N|auto")]
    pub workers: Option<String>,

    /// Print run statistics as JSON on stderr
    #[arg(long)]
    pub stats: bool,

    /// Log level when RUST_LOG is unset
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

/// Errors surfaced by the command line.
#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] TwinPrimeError),

    #[error(transparent)]
    Cluster(#[from] ClusterError),

    #[error("failed to serialize stats: {0}")]
    Stats(#[from] serde_json::Error),

    #[error("failed to write output: {0}")]
    Output(#[from] std::io::Error),
}

impl CliError {
    /// Whether the error stems from the invocation rather than the run.
    #[must_use]
    pub fn is_usage(&self) -> bool {
        matches!(
            self,
            CliError::Core(TwinPrimeError::InvalidRequest { .. } | TwinPrimeError::Config(_))
        )
    }
}

/// Resolve the topology for `args`.
pub fn cluster_config(args: &Args) -> Result<ClusterConfig, CliError> {
    let config = match args.workers.as_deref() {
        Some(value) => ClusterConfig::parse_workers(value)?,
        None => ClusterConfig::resolve(None)?,
    };
    config.validate()?;
    Ok(config)
}

/// Validate the request, then run the search.
pub fn run(args: &Args) -> Result<TwinPrimeReport, CliError> {
    let request = SearchRequest::new(args.requested_total)?;
    let config = cluster_config(args)?;
    Ok(Coordinator::new(config).run(request)?)
}

/// Stats document printed by `--stats`.
pub fn render_stats(report: &TwinPrimeReport) -> Result<String, CliError> {
    Ok(serde_json::to_string_pretty(report.stats())?)
}
