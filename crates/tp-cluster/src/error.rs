//! Cluster-level errors.

use thiserror::Error;
use tp_core::TwinPrimeError;

/// Failures of the barrier + gather rendezvous.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GatherError {
    /// A worker failed; everyone blocked at the barrier is released with this.
    #[error("run aborted by worker {rank}: {reason}")]
    Aborted { rank: u64, reason: String },

    #[error("worker {rank} arrived twice")]
    DuplicateArrival { rank: u64 },

    #[error("rank {rank} out of range for {workers_count} workers")]
    RankOutOfRange { rank: u64, workers_count: u64 },

    #[error("results were already gathered")]
    AlreadyGathered,

    #[error("rendezvous lock poisoned")]
    Poisoned,
}

/// Errors that abort a cluster run.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClusterError {
    #[error(transparent)]
    Core(#[from] TwinPrimeError),

    #[error(transparent)]
    Gather(#[from] GatherError),

    #[error("worker {rank} panicked")]
    WorkerPanicked { rank: u64 },

    #[error("failed to spawn worker {rank}: {reason}")]
    Spawn { rank: u64, reason: String },
}

/// Result type alias for cluster operations.
pub type Result<T> = std::result::Result<T, ClusterError>;
