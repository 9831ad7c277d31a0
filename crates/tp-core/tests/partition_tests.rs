//! Cross-module checks: assignment, quotas and candidate generation
//! together partition the wheel without gaps or overlap.

use std::collections::BTreeSet;

use tp_core::shard::{RESIDUE_CLASSES, WHEEL_MODULUS};
use tp_core::{CandidateGenerator, QuotaPlan, ShardPlan, TwinPrimeSearch};

const LIMIT: u64 = 5_000;

#[test]
fn test_workers_partition_candidates() {
    let wheel: BTreeSet<u64> = (0..LIMIT)
        .filter(|x| RESIDUE_CLASSES.contains(&(x % WHEEL_MODULUS)))
        .collect();

    for workers_count in 1..=12 {
        let plan = ShardPlan::new(workers_count).unwrap();
        let mut union = BTreeSet::new();
        let mut total = 0usize;

        for (_, shards) in plan.iter() {
            for x in CandidateGenerator::for_shards(shards).take_while(|&x| x < LIMIT) {
                union.insert(x);
                total += 1;
            }
        }

        assert_eq!(union, wheel, "workers_count={}", workers_count);
        assert_eq!(total, wheel.len(), "overlap for workers_count={}", workers_count);
    }
}

#[test]
fn test_sequential_pipeline_three_workers() {
    let plan = ShardPlan::new(3).unwrap();
    let quotas = QuotaPlan::new(3, 3, plan.active_workers_count()).unwrap();

    let mut all: Vec<u64> = plan
        .iter()
        .flat_map(|(w, shards)| {
            TwinPrimeSearch::new(shards)
                .take(quotas.quota_for(w) as usize)
                .map(|p| p.lower())
        })
        .collect();
    all.sort_unstable();

    assert_eq!(all, vec![11, 17, 29]);
}
