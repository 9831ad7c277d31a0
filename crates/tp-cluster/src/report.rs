//! The coordinator's final report and its text rendering.

use std::fmt;

use serde::Serialize;
use tp_core::{
    GlobalResultSet, QuotaPlan, RunProperties, SearchRequest, ShardPlan, TwinPrime,
};

use crate::worker::WorkerStats;

/// Timing and per-worker statistics of one run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunStats {
    pub requested_total: u64,
    pub total_pairs: u64,
    pub workers_count: u64,
    pub active_workers_count: u64,
    pub search_us: u64,
    pub sort_us: u64,
    pub workers: Vec<WorkerStats>,
}

/// Sorted result of a run, ready to print.
///
/// Renders as
///
/// ```text
/// Found <N> twin prime pairs:
/// (3, 5) (5, 7) (p1, p1+2) ... (pN, pN+2)
/// ```
///
/// where every pair is followed by one space.
#[derive(Debug, Clone)]
pub struct TwinPrimeReport {
    request: SearchRequest,
    shard_plan: ShardPlan,
    quota_plan: QuotaPlan,
    results: GlobalResultSet,
    stats: RunStats,
}

impl TwinPrimeReport {
    pub(crate) fn new(
        request: SearchRequest,
        shard_plan: ShardPlan,
        quota_plan: QuotaPlan,
        results: GlobalResultSet,
        stats: RunStats,
    ) -> Self {
        debug_assert!(results.is_sorted(), "report built from unsorted results");
        debug_assert!(results.len() as u64 == request.total_pairs());

        Self {
            request,
            shard_plan,
            quota_plan,
            results,
            stats,
        }
    }

    #[must_use]
    pub fn total_pairs(&self) -> u64 {
        self.request.total_pairs()
    }

    /// Found pairs, seeds excluded, ascending.
    #[must_use]
    pub fn pairs(&self) -> &[TwinPrime] {
        self.results.pairs()
    }

    /// Seeds followed by the found pairs.
    pub fn all_pairs(&self) -> impl Iterator<Item = TwinPrime> + '_ {
        self.results.with_seeds()
    }

    #[must_use]
    pub fn stats(&self) -> &RunStats {
        &self.stats
    }
}

impl fmt::Display for TwinPrimeReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Found {} twin prime pairs:", self.total_pairs())?;
        for pair in self.all_pairs() {
            write!(f, "{} ", pair)?;
        }
        writeln!(f)
    }
}

impl RunProperties for TwinPrimeReport {
    fn shard_plan(&self) -> &ShardPlan {
        &self.shard_plan
    }

    fn quota_plan(&self) -> &QuotaPlan {
        &self.quota_plan
    }

    fn pairs_found(&self, worker_index: u64) -> u64 {
        self.stats
            .workers
            .iter()
            .find(|w| w.rank == worker_index)
            .map_or(0, |w| w.pairs_found)
    }

    fn global_results(&self) -> &[TwinPrime] {
        self.results.pairs()
    }
}
