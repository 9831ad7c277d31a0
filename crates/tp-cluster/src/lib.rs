//! # tp-cluster
//!
//! Parallel twin prime search over a fixed set of workers.
//!
//! Each worker derives its shard set and quota from its rank, searches
//! until the quota is met, and moves its result set into a
//! [`GatherBarrier`]. The coordinator waits for every worker, concatenates
//! their sets in rank order, sorts, and prepends the seed pairs.
//!
//! ```rust
//! use tp_cluster::{ClusterConfig, Coordinator};
//! use tp_core::SearchRequest;
//!
//! let report = Coordinator::new(ClusterConfig::with_workers(3))
//!     .run(SearchRequest::new(5).unwrap())
//!     .unwrap();
//! assert_eq!(
//!     report.to_string(),
//!     "Found 3 twin prime pairs:\n(3, 5) (5, 7) (11, 13) (17, 19) (29, 31) \n"
//! );
//! ```
//!
//! The rendezvous has loom tests under `#[cfg(loom)]`:
//!
//! ```bash
//! RUSTFLAGS="--cfg loom" cargo test -p tp-cluster --release
//! ```

pub mod config;
pub mod coordinator;
pub mod error;
pub mod rendezvous;
pub mod report;
mod sync;
pub mod worker;

pub use config::{ClusterConfig, WORKERS_ENV_VAR};
pub use coordinator::Coordinator;
pub use error::{ClusterError, GatherError, Result};
pub use rendezvous::GatherBarrier;
pub use report::{RunStats, TwinPrimeReport};
pub use worker::{Worker, WorkerStats};
