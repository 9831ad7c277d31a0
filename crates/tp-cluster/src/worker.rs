//! Search workers.
//!
//! A worker owns a fixed shard set and quota, computed once at startup. It
//! reserves its result buffer at exactly the quota, runs the merged
//! candidate search until the buffer is full, and returns the frozen set.

use std::time::Instant;

use serde::Serialize;
use tracing::{debug, info};
use tp_core::{
    LocalResultSet, QuotaPlan, Result, ShardPlan, ShardSet, TwinPrimeError, TwinPrimeSearch,
};

/// Per-worker execution statistics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorkerStats {
    pub rank: u64,
    pub shards: ShardSet,
    pub quota: u64,
    pub pairs_found: u64,
    pub candidates_examined: u64,
    pub elapsed_us: u64,
}

/// One search worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Worker {
    rank: u64,
    shards: ShardSet,
    quota: u64,
}

impl Worker {
    #[must_use]
    pub fn new(rank: u64, shards: ShardSet, quota: u64) -> Self {
        debug_assert!(
            quota == 0 || !shards.is_empty(),
            "worker {} has a quota but no shards",
            rank
        );
        Self {
            rank,
            shards,
            quota,
        }
    }

    /// Worker `rank` as configured by the startup plans.
    #[must_use]
    pub fn from_plans(rank: u64, shard_plan: &ShardPlan, quota_plan: &QuotaPlan) -> Self {
        Self::new(rank, shard_plan.shards_for(rank), quota_plan.quota_for(rank))
    }

    #[must_use]
    pub fn rank(&self) -> u64 {
        self.rank
    }

    #[must_use]
    pub fn shards(&self) -> ShardSet {
        self.shards
    }

    #[must_use]
    pub fn quota(&self) -> u64 {
        self.quota
    }

    /// Search until the quota is met.
    pub fn run(&self) -> Result<(LocalResultSet, WorkerStats)> {
        let start = Instant::now();
        let mut local = LocalResultSet::with_quota(self.rank, self.quota)?;
        let mut search = TwinPrimeSearch::new(self.shards);

        debug!(
            rank = self.rank,
            quota = self.quota,
            shards = self.shards.len(),
            "worker searching"
        );

        while !local.is_full() {
            match search.next() {
                Some(pair) => local.push(pair),
                None => {
                    return Err(TwinPrimeError::SearchExhausted {
                        rank: self.rank,
                        found: local.len() as u64,
                        quota: self.quota,
                    })
                }
            }
        }

        let stats = WorkerStats {
            rank: self.rank,
            shards: self.shards,
            quota: self.quota,
            pairs_found: local.len() as u64,
            candidates_examined: search.candidates_examined(),
            elapsed_us: start.elapsed().as_micros() as u64,
        };

        info!(
            rank = self.rank,
            quota = self.quota,
            candidates_examined = stats.candidates_examined,
            "worker finished finding twin primes"
        );

        Ok((local, stats))
    }
}

#[cfg(all(test, not(loom)))]
mod tests {
    use super::*;
    use tp_core::{canonical_shard, check_local_order, TwinPrime};

    #[test]
    fn test_canonical_last_worker() {
        let worker = Worker::new(8, ShardSet::single(canonical_shard(8)), 3);
        let (local, stats) = worker.run().unwrap();

        let found: Vec<u64> = local.pairs().iter().map(TwinPrime::lower).collect();
        assert_eq!(found, vec![179, 269, 809]);
        assert_eq!(stats.pairs_found, 3);
        assert!(check_local_order(&local).holds);
        // 89, 179, 269, 359, 449, 539, 629, 719, 809
        assert_eq!(stats.candidates_examined, 9);
    }

    #[test]
    fn test_zero_quota() {
        let worker = Worker::new(3, ShardSet::single(canonical_shard(3)), 0);
        let (local, stats) = worker.run().unwrap();
        assert!(local.is_empty());
        assert_eq!(stats.candidates_examined, 0);
    }

    #[test]
    fn test_idle_worker() {
        let worker = Worker::new(10, ShardSet::empty(), 0);
        let (local, _) = worker.run().unwrap();
        assert!(local.is_empty());
    }

    #[test]
    fn test_from_plans() {
        let shard_plan = ShardPlan::new(3).unwrap();
        let quota_plan = QuotaPlan::new(10, 3, 3).unwrap();
        let worker = Worker::from_plans(2, &shard_plan, &quota_plan);
        assert_eq!(worker.quota(), 4);
        assert_eq!(worker.shards().len(), 3);

        let (local, _) = worker.run().unwrap();
        assert_eq!(local.len(), 4);
        assert!(local.pairs().iter().all(|p| p.lower() % 30 == 29));
    }

    #[test]
    fn test_allocation_failure() {
        let worker = Worker::new(0, ShardSet::full(), u64::MAX);
        assert_eq!(
            worker.run().unwrap_err(),
            TwinPrimeError::Allocation {
                requested: u64::MAX
            }
        );
    }

    #[test]
    fn test_stats_serialize() {
        let worker = Worker::new(0, ShardSet::single(canonical_shard(0)), 1);
        let (_, stats) = worker.run().unwrap();
        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["rank"], 0);
        assert_eq!(json["pairs_found"], 1);
        assert_eq!(json["shards"][0]["residue_class"], 11);
    }
}
