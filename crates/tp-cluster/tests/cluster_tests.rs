//! End-to-end runs of the coordinator across topologies.
#![cfg(not(loom))]

use tp_cluster::{ClusterConfig, Coordinator, GatherBarrier, Worker};
use tp_core::{
    GlobalResultSet, PropertyChecker, QuotaPlan, RunPropertyChecker, SearchRequest, ShardPlan,
    TwinPrime,
};
use tp_dst::{all_orders, get_or_generate_seed, ArrivalSchedule, SeededRng};

fn run(requested_total: u64, workers_count: u64) -> tp_cluster::TwinPrimeReport {
    Coordinator::new(ClusterConfig::with_workers(workers_count))
        .run(SearchRequest::new(requested_total).unwrap())
        .unwrap()
}

#[test]
fn test_five_requested_output() {
    for workers_count in [1, 3] {
        assert_eq!(
            run(5, workers_count).to_string(),
            "Found 3 twin prime pairs:\n(3, 5) (5, 7) (11, 13) (17, 19) (29, 31) \n",
            "workers_count={}",
            workers_count
        );
    }
}

#[test]
fn test_two_requested_output() {
    for workers_count in [1, 4, 9, 16] {
        assert_eq!(
            run(2, workers_count).to_string(),
            "Found 0 twin prime pairs:\n(3, 5) (5, 7) \n"
        );
    }
}

#[test]
fn test_canonical_grid_matches_reference_run() {
    // Nine workers, two pairs each: the first two twin primes of every shard.
    let report = run(20, 9);
    let found: Vec<u64> = report.pairs().iter().map(TwinPrime::lower).collect();
    assert_eq!(
        found,
        vec![11, 17, 29, 41, 59, 71, 101, 107, 137, 149, 179, 227, 269, 311, 347, 431, 569, 617]
    );
}

#[test]
fn test_invariants_hold_for_many_topologies() {
    for workers_count in 1..=14 {
        for requested_total in [2, 3, 11, 40] {
            let report = run(requested_total, workers_count);
            let summary = RunPropertyChecker::new(&report).summary();
            assert_eq!(
                summary.failed,
                0,
                "workers={} requested={}\n{}",
                workers_count,
                requested_total,
                summary.format_report()
            );
            assert_eq!(report.pairs().len() as u64, requested_total - 2);
        }
    }
}

/// Run every worker sequentially, returning their frozen sets by rank.
fn local_sets(total_pairs: u64, workers_count: u64) -> Vec<tp_core::LocalResultSet> {
    let shard_plan = ShardPlan::new(workers_count).unwrap();
    let quota_plan =
        QuotaPlan::new(total_pairs, workers_count, shard_plan.active_workers_count()).unwrap();
    (0..workers_count)
        .map(|rank| Worker::from_plans(rank, &shard_plan, &quota_plan).run().unwrap().0)
        .collect()
}

fn gathered_in_order(total_pairs: u64, order: &[u64], locals: &[tp_core::LocalResultSet]) -> Vec<TwinPrime> {
    let barrier = GatherBarrier::new(order.len() as u64);
    crossbeam_utils::thread::scope(|s| {
        for (position, &rank) in order.iter().enumerate() {
            let local = locals[rank as usize].clone();
            let barrier = &barrier;
            s.spawn(move |_| barrier.arrive(rank, local).unwrap());
            // Let this worker hand over before the next one starts.
            while barrier.arrived_count().unwrap() <= position as u64 {
                std::thread::yield_now();
            }
        }
    })
    .unwrap();

    let mut global = GlobalResultSet::gather(total_pairs, barrier.gather().unwrap()).unwrap();
    global.sort();
    global.into_pairs()
}

#[test]
fn test_result_independent_of_arrival_order_exhaustive() {
    let total_pairs = 13;
    let locals = local_sets(total_pairs, 4);
    let reference = gathered_in_order(total_pairs, &[0, 1, 2, 3], &locals);

    for order in all_orders(4) {
        assert_eq!(gathered_in_order(total_pairs, &order, &locals), reference, "order {:?}", order);
    }
}

#[test]
fn test_result_independent_of_arrival_order_seeded() {
    let seed = get_or_generate_seed();
    let total_pairs = 30;
    let locals = local_sets(total_pairs, 9);
    let reference = gathered_in_order(total_pairs, &(0..9).collect::<Vec<u64>>(), &locals);

    let mut schedule = ArrivalSchedule::new(SeededRng::new(seed), 9);
    for _ in 0..25 {
        let order = schedule.next_order();
        assert_eq!(
            gathered_in_order(total_pairs, &order, &locals),
            reference,
            "order {:?} ({})",
            order,
            schedule.format_seed()
        );
    }
}

#[test]
fn test_merge_permutation_then_sort() {
    // Concatenating local sets in any rank permutation sorts to the same result.
    let total_pairs = 20;
    let locals = local_sets(total_pairs, 5);
    let mut rng = SeededRng::new(7);

    let mut reference = GlobalResultSet::gather(total_pairs, locals.clone()).unwrap();
    reference.sort();

    for _ in 0..20 {
        let permuted: Vec<_> = rng
            .permutation(5)
            .into_iter()
            .map(|r| locals[r as usize].clone())
            .collect();
        let mut global = GlobalResultSet::gather(total_pairs, permuted).unwrap();
        global.sort();
        assert_eq!(global.pairs(), reference.pairs());
    }
}
