//! Worker-to-shard assignment.
//!
//! Shard `s` is owned by worker `s mod workers_count`. With nine workers this
//! is the canonical 3x3 grid (worker `w` searches row `w / 3`, class
//! `[11, 17, 29][w % 3]`). With fewer workers some workers own several
//! shards; with more, workers from rank 9 upwards own none and stay idle.

use crate::error::{Result, TwinPrimeError};
use crate::shard::{ShardConfig, ShardSet, SHARDS_COUNT};

/// Largest supported worker count.
pub const WORKERS_COUNT_MAX: u64 = 1024;

/// Canonical worker count: one worker per shard.
pub const WORKERS_COUNT_CANONICAL: u64 = SHARDS_COUNT as u64;

/// Shards owned by worker `worker_index` out of `workers_count`.
///
/// Pure and total for `worker_index < workers_count`.
#[must_use]
pub fn assign_shards(worker_index: u64, workers_count: u64) -> ShardSet {
    debug_assert!(workers_count > 0, "must have at least one worker");
    debug_assert!(worker_index < workers_count, "worker index out of range");

    let mut set = ShardSet::empty();
    for s in 0..SHARDS_COUNT {
        if s as u64 % workers_count == worker_index {
            set.insert(ShardConfig::from_index(s));
        }
    }
    set
}

/// Canonical single-shard assignment for the nine-worker grid.
#[must_use]
pub fn canonical_shard(worker_index: u64) -> ShardConfig {
    debug_assert!(worker_index < WORKERS_COUNT_CANONICAL);
    ShardConfig::from_index(worker_index as usize)
}

/// Assignment for a whole topology, computed once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShardPlan {
    assignments: Vec<ShardSet>,
}

impl ShardPlan {
    /// Build and verify the plan for `workers_count` workers.
    pub fn new(workers_count: u64) -> Result<Self> {
        if workers_count == 0 {
            return Err(TwinPrimeError::TopologyMismatch(
                "worker count must be at least 1".to_string(),
            ));
        }
        if workers_count > WORKERS_COUNT_MAX {
            return Err(TwinPrimeError::TopologyMismatch(format!(
                "worker count {} exceeds maximum {}",
                workers_count, WORKERS_COUNT_MAX
            )));
        }

        let plan = Self::from_assignments(
            (0..workers_count)
                .map(|w| assign_shards(w, workers_count))
                .collect(),
        );
        plan.verify_coverage()?;
        Ok(plan)
    }

    /// Wrap an explicit assignment without verifying it.
    #[must_use]
    pub fn from_assignments(assignments: Vec<ShardSet>) -> Self {
        Self { assignments }
    }

    /// Check that every shard is owned by exactly one worker.
    pub fn verify_coverage(&self) -> Result<()> {
        let mut owners = [0u64; SHARDS_COUNT];
        for set in &self.assignments {
            for shard in set.iter() {
                owners[shard.index()] += 1;
            }
        }

        for (index, &count) in owners.iter().enumerate() {
            if count != 1 {
                return Err(TwinPrimeError::TopologyMismatch(format!(
                    "shard {} ({}) is owned by {} workers",
                    index,
                    ShardConfig::from_index(index),
                    count
                )));
            }
        }
        Ok(())
    }

    #[must_use]
    pub fn workers_count(&self) -> u64 {
        self.assignments.len() as u64
    }

    /// Number of workers owning at least one shard.
    ///
    /// Active workers are always ranks `0..active_workers_count()`.
    #[must_use]
    pub fn active_workers_count(&self) -> u64 {
        self.assignments.iter().filter(|s| !s.is_empty()).count() as u64
    }

    #[must_use]
    pub fn shards_for(&self, worker_index: u64) -> ShardSet {
        debug_assert!(worker_index < self.workers_count());
        self.assignments[worker_index as usize]
    }

    pub fn iter(&self) -> impl Iterator<Item = (u64, ShardSet)> + '_ {
        self.assignments
            .iter()
            .enumerate()
            .map(|(w, &set)| (w as u64, set))
    }
}
