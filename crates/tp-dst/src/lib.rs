//! # tp-dst
//!
//! Deterministic simulation helpers for the gather protocol.
//!
//! Workers reach the barrier in whatever order the OS schedules them. These
//! helpers replay arrival orders reproducibly from a seed, so a test can
//! hand results to the rendezvous in a chosen order and check that the
//! gathered, sorted output never depends on it.
//!
//! ## Usage
//!
//! ```rust
//! use tp_dst::{ArrivalSchedule, SeededRng};
//!
//! let mut schedule = ArrivalSchedule::new(SeededRng::new(12345), 4);
//! let order = schedule.next_order();
//! assert_eq!(order.len(), 4);
//! ```
//!
//! ## Reproducibility
//!
//! ```bash
//! DST_SEED=12345 cargo test
//! ```

pub mod arrival;
pub mod random;

pub use arrival::{all_orders, ArrivalSchedule};
pub use random::SeededRng;

/// Get DST seed from environment or generate random one.
///
/// Prints the seed for reproduction. Use `DST_SEED=<seed>` to reproduce.
#[must_use]
pub fn get_or_generate_seed() -> u64 {
    match std::env::var("DST_SEED").ok().and_then(|s| s.parse::<u64>().ok()) {
        Some(seed) => {
            println!("DST_SEED={} (from environment)", seed);
            seed
        }
        None => {
            // Zero is reserved; the RNG refuses it.
            let seed = rand::random::<u64>().max(1);
            println!("DST_SEED={} (randomly generated)", seed);
            seed
        }
    }
}
