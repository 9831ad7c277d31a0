//! Arrival orders at the barrier.
//!
//! An arrival order is a permutation of worker ranks: the order in which
//! workers finish searching and hand their results over.

use crate::random::SeededRng;

/// Largest worker count for which [`all_orders`] enumerates permutations.
const ORDERS_WORKERS_COUNT_MAX: u64 = 7;

/// Largest worker count a schedule accepts.
const WORKERS_COUNT_MAX: u64 = 1024;

/// Reproducible source of arrival orders.
pub struct ArrivalSchedule {
    rng: SeededRng,
    workers_count: u64,
    orders_count: u64,
}

impl ArrivalSchedule {
    pub fn new(rng: SeededRng, workers_count: u64) -> Self {
        debug_assert!(workers_count > 0, "Must have at least one worker");
        debug_assert!(
            workers_count <= WORKERS_COUNT_MAX,
            "Too many workers: {} > {}",
            workers_count,
            WORKERS_COUNT_MAX
        );

        Self {
            rng,
            workers_count,
            orders_count: 0,
        }
    }

    #[must_use]
    pub fn workers_count(&self) -> u64 {
        self.workers_count
    }

    /// Number of orders drawn so far.
    #[must_use]
    pub fn orders_count(&self) -> u64 {
        self.orders_count
    }

    /// Draw the next arrival order.
    pub fn next_order(&mut self) -> Vec<u64> {
        self.orders_count += 1;
        let order = self.rng.permutation(self.workers_count);
        debug_assert!(order.len() as u64 == self.workers_count);
        order
    }

    /// Seed to print when a test using this schedule fails.
    #[must_use]
    pub fn format_seed(&self) -> String {
        format!("DST_SEED={}", self.rng.seed())
    }
}

/// Every arrival order of `workers_count` workers, in lexicographic order.
#[must_use]
pub fn all_orders(workers_count: u64) -> Vec<Vec<u64>> {
    debug_assert!(
        workers_count <= ORDERS_WORKERS_COUNT_MAX,
        "{}! orders is too many to enumerate",
        workers_count
    );

    let mut current: Vec<u64> = (0..workers_count).collect();
    let mut orders = vec![current.clone()];

    // Next lexicographic permutation until the sequence is descending.
    loop {
        let Some(pivot) = (1..current.len()).rev().find(|&i| current[i - 1] < current[i]) else {
            break;
        };
        let pivot = pivot - 1;
        let swap = (pivot + 1..current.len())
            .rev()
            .find(|&j| current[j] > current[pivot])
            .unwrap_or(pivot + 1);
        current.swap(pivot, swap);
        current[pivot + 1..].reverse();
        orders.push(current.clone());
    }
    orders
}
