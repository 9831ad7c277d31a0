//! Cluster configuration.
//!
//! The worker count is supplied by the environment, not computed by the
//! search. Resolution order: explicit value, then `TWIN_PRIMES_WORKERS`,
//! then a single worker.

use tp_core::{Result, TwinPrimeError, WORKERS_COUNT_CANONICAL, WORKERS_COUNT_MAX};

/// Environment variable holding the worker count.
pub const WORKERS_ENV_VAR: &str = "TWIN_PRIMES_WORKERS";

/// Configuration for a cluster run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClusterConfig {
    /// Number of workers, idle ones included
    pub workers_count: u64,
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self::single()
    }
}

impl ClusterConfig {
    /// One worker searching all nine shards.
    #[must_use]
    pub fn single() -> Self {
        Self { workers_count: 1 }
    }

    /// The 3x3 grid: one worker per shard.
    #[must_use]
    pub fn canonical() -> Self {
        Self {
            workers_count: WORKERS_COUNT_CANONICAL,
        }
    }

    /// One worker per logical CPU.
    #[must_use]
    pub fn per_core() -> Self {
        Self {
            workers_count: (num_cpus::get() as u64).clamp(1, WORKERS_COUNT_MAX),
        }
    }

    #[must_use]
    pub fn with_workers(workers_count: u64) -> Self {
        Self { workers_count }
    }

    /// Read `TWIN_PRIMES_WORKERS`, if set.
    pub fn from_env() -> Result<Option<Self>> {
        match std::env::var(WORKERS_ENV_VAR) {
            Ok(value) => Self::parse_workers(&value).map(Some),
            Err(std::env::VarError::NotPresent) => Ok(None),
            Err(e) => Err(TwinPrimeError::Config(format!("{}: {}", WORKERS_ENV_VAR, e))),
        }
    }

    /// Explicit worker count if given, else the environment, else [`Self::single`].
    pub fn resolve(workers_count: Option<u64>) -> Result<Self> {
        let config = match workers_count {
            Some(count) => Self::with_workers(count),
            None => Self::from_env()?.unwrap_or_default(),
        };
        config.validate()?;
        Ok(config)
    }

    /// Parse a worker count. `auto` selects [`Self::per_core`].
    pub fn parse_workers(value: &str) -> Result<Self> {
        let value = value.trim();
        if value.eq_ignore_ascii_case("auto") {
            return Ok(Self::per_core());
        }
        value
            .parse::<u64>()
            .map(Self::with_workers)
            .map_err(|e| TwinPrimeError::Config(format!("invalid worker count {:?}: {}", value, e)))
    }

    pub fn validate(&self) -> Result<()> {
        if self.workers_count == 0 || self.workers_count > WORKERS_COUNT_MAX {
            return Err(TwinPrimeError::TopologyMismatch(format!(
                "worker count {} outside 1..={}",
                self.workers_count, WORKERS_COUNT_MAX
            )));
        }
        Ok(())
    }
}
