//! Run invariants.
//!
//! | Property | Stage | Description |
//! |----------|-------|-------------|
//! | ShardCoverage | assignment | Every shard owned by exactly one worker |
//! | QuotaConservation | quota | Quotas sum to the pairs requested |
//! | QuotaMet | search | Every worker found exactly its quota |
//! | TwinPrimality | search | Every pair has both members prime |
//! | WheelResidue | search | Every pair starts at 11, 17 or 29 mod 30 |
//! | ResultCount | gather | Global result holds exactly `total_pairs` pairs |
//! | GlobalOrder | gather | Global result strictly increasing |

use crate::assign::ShardPlan;
use crate::primality::is_prime;
use crate::property::{PropertyChecker, PropertyResult, Stage};
use crate::quota::QuotaPlan;
use crate::results::{LocalResultSet, TwinPrime};
use crate::shard::{RESIDUE_CLASSES, WHEEL_MODULUS};

/// State a finished run exposes for property checking.
pub trait RunProperties {
    fn shard_plan(&self) -> &ShardPlan;

    fn quota_plan(&self) -> &QuotaPlan;

    /// Pairs worker `worker_index` handed to the coordinator.
    fn pairs_found(&self, worker_index: u64) -> u64;

    /// Sorted global result, seeds excluded.
    fn global_results(&self) -> &[TwinPrime];
}

/// Property checker for a finished run.
pub struct RunPropertyChecker<'a, T: RunProperties> {
    run: &'a T,
}

impl<'a, T: RunProperties> RunPropertyChecker<'a, T> {
    #[must_use]
    pub fn new(run: &'a T) -> Self {
        Self { run }
    }

    fn check_shard_coverage(&self) -> PropertyResult {
        match self.run.shard_plan().verify_coverage() {
            Ok(()) => PropertyResult::pass("ShardCoverage", Stage::Assignment),
            Err(e) => PropertyResult::fail("ShardCoverage", Stage::Assignment, e.to_string()),
        }
    }

    fn check_quota_conservation(&self) -> PropertyResult {
        let plan = self.run.quota_plan();
        let sum: u64 = plan.quotas().iter().sum();

        if sum != plan.total_pairs() {
            return PropertyResult::fail(
                "QuotaConservation",
                Stage::Quota,
                format!("quotas sum to {}, expected {}", sum, plan.total_pairs()),
            );
        }
        if plan.quotas().len() as u64 != self.run.shard_plan().workers_count() {
            return PropertyResult::fail(
                "QuotaConservation",
                Stage::Quota,
                format!(
                    "{} quotas for {} workers",
                    plan.quotas().len(),
                    self.run.shard_plan().workers_count()
                ),
            );
        }
        PropertyResult::pass("QuotaConservation", Stage::Quota)
    }

    fn check_quota_met(&self) -> PropertyResult {
        let plan = self.run.quota_plan();
        for (rank, &quota) in plan.quotas().iter().enumerate() {
            let found = self.run.pairs_found(rank as u64);
            if found != quota {
                return PropertyResult::fail(
                    "QuotaMet",
                    Stage::Search,
                    format!("worker {} found {} pairs, quota {}", rank, found, quota),
                );
            }
        }
        PropertyResult::pass("QuotaMet", Stage::Search)
    }

    fn check_twin_primality(&self) -> PropertyResult {
        for pair in self.run.global_results() {
            if !is_prime(pair.lower()) || !is_prime(pair.upper()) {
                return PropertyResult::fail(
                    "TwinPrimality",
                    Stage::Search,
                    format!("{} is not a twin prime pair", pair),
                );
            }
        }
        PropertyResult::pass("TwinPrimality", Stage::Search)
    }

    fn check_wheel_residue(&self) -> PropertyResult {
        for pair in self.run.global_results() {
            let residue = pair.lower() % WHEEL_MODULUS;
            if !RESIDUE_CLASSES.contains(&residue) {
                return PropertyResult::fail(
                    "WheelResidue",
                    Stage::Search,
                    format!("{} starts at residue {} mod 30", pair, residue),
                );
            }
        }
        PropertyResult::pass("WheelResidue", Stage::Search)
    }

    fn check_result_count(&self) -> PropertyResult {
        let len = self.run.global_results().len() as u64;
        let expected = self.run.quota_plan().total_pairs();
        if len != expected {
            return PropertyResult::fail(
                "ResultCount",
                Stage::Gather,
                format!("gathered {} pairs, expected {}", len, expected),
            );
        }
        PropertyResult::pass("ResultCount", Stage::Gather)
    }

    fn check_global_order(&self) -> PropertyResult {
        for window in self.run.global_results().windows(2) {
            if window[0] >= window[1] {
                return PropertyResult::fail(
                    "GlobalOrder",
                    Stage::Gather,
                    format!("{} does not precede {}", window[0], window[1]),
                );
            }
        }
        PropertyResult::pass("GlobalOrder", Stage::Gather)
    }
}

impl<T: RunProperties> PropertyChecker for RunPropertyChecker<'_, T> {
    fn check_all(&self) -> Vec<PropertyResult> {
        vec![
            self.check_shard_coverage(),
            self.check_quota_conservation(),
            self.check_quota_met(),
            self.check_twin_primality(),
            self.check_wheel_residue(),
            self.check_result_count(),
            self.check_global_order(),
        ]
    }
}

/// LocalOrder: a worker's pairs are strictly increasing.
#[must_use]
pub fn check_local_order(local: &LocalResultSet) -> PropertyResult {
    for window in local.pairs().windows(2) {
        if window[0] >= window[1] {
            return PropertyResult::fail(
                "LocalOrder",
                Stage::Search,
                format!(
                    "worker {}: {} does not precede {}",
                    local.rank(),
                    window[0],
                    window[1]
                ),
            );
        }
    }
    PropertyResult::pass("LocalOrder", Stage::Search)
}
