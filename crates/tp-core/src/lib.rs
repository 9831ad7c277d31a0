//! # tp-core
//!
//! Pure building blocks of the parallel twin prime search.
//!
//! | Module | Role |
//! |--------|------|
//! | `primality` | Trial-division primality test |
//! | `shard` | The nine mod-30 wheel shards |
//! | `assign` | Worker to shard mapping for any worker count |
//! | `quota` | Per-worker pair quotas |
//! | `candidates` | Lazy candidate and twin prime iterators |
//! | `results` | Pair type and quota-bounded result buffers |
//! | `request` | Validated requests |
//! | `invariants` | Properties a finished run must satisfy |
//!
//! Nothing here spawns threads or performs I/O; `tp-cluster` composes these
//! pieces into workers and a coordinator.
//!
//! ## Usage
//!
//! ```rust
//! use tp_core::{ShardPlan, TwinPrimeSearch};
//!
//! let plan = ShardPlan::new(9).unwrap();
//! let found: Vec<u64> = TwinPrimeSearch::new(plan.shards_for(8))
//!     .take(3)
//!     .map(|p| p.lower())
//!     .collect();
//! assert_eq!(found, vec![179, 269, 809]);
//! ```

pub mod assign;
pub mod candidates;
pub mod error;
pub mod invariants;
pub mod primality;
pub mod property;
pub mod quota;
pub mod request;
pub mod results;
pub mod shard;

pub use assign::{assign_shards, canonical_shard, ShardPlan, WORKERS_COUNT_CANONICAL, WORKERS_COUNT_MAX};
pub use candidates::{CandidateGenerator, TwinPrimeSearch};
pub use error::{Result, TwinPrimeError};
pub use invariants::{check_local_order, RunProperties, RunPropertyChecker};
pub use primality::{is_prime, is_twin_prime};
pub use property::{PropertyChecker, PropertyResult, PropertySummary, Stage};
pub use quota::{plan_quotas, QuotaPlan};
pub use request::SearchRequest;
pub use results::{GlobalResultSet, LocalResultSet, TwinPrime, SEED_PAIRS};
pub use shard::{all_shards, ShardConfig, ShardSet, SHARDS_COUNT};
