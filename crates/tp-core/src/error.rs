//! Errors raised while validating, planning, or running a search.
//!
//! Every variant is fatal for the run that produced it. There is no
//! degraded mode and no partial result delivery.

use thiserror::Error;

/// Errors from the twin prime search core.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TwinPrimeError {
    /// Fewer than the two seed pairs were requested.
    #[error("invalid request: requested total {requested_total} is below the 2 seed pairs")]
    InvalidRequest { requested_total: u64 },

    /// A result buffer could not be reserved.
    #[error("allocation failed: could not reserve a buffer for {requested} pairs")]
    Allocation { requested: u64 },

    /// Worker count or shard coverage breaks the partition invariant.
    #[error("topology mismatch: {0}")]
    TopologyMismatch(String),

    /// A worker's cursor ran past the representable range before its quota was met.
    #[error("worker {rank} exhausted its search space after {found} of {quota} pairs")]
    SearchExhausted { rank: u64, found: u64, quota: u64 },

    /// Invalid configuration value.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Result type alias for core operations.
pub type Result<T> = std::result::Result<T, TwinPrimeError>;
