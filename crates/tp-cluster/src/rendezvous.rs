//! Barrier + gather rendezvous.
//!
//! Each worker moves its [`LocalResultSet`] into a slot indexed by its rank
//! and then blocks until every worker has arrived. The coordinator blocks in
//! [`GatherBarrier::gather`] until the same condition holds and then takes
//! the slots in rank order. A worker that fails calls
//! [`GatherBarrier::abort`], which releases every blocked party with
//! [`GatherError::Aborted`].
//!
//! There is no timeout. A worker that never arrives or aborts stalls the run.

use tp_core::LocalResultSet;

use crate::error::GatherError;
use crate::sync::{Condvar, Mutex, MutexGuard};

struct Slots {
    slots: Vec<Option<LocalResultSet>>,
    arrived_count: u64,
    aborted: Option<(u64, String)>,
    gathered: bool,
}

impl Slots {
    fn released(&self) -> bool {
        self.arrived_count == self.slots.len() as u64 || self.aborted.is_some()
    }

    fn check_aborted(&self) -> Result<(), GatherError> {
        match &self.aborted {
            Some((rank, reason)) => Err(GatherError::Aborted {
                rank: *rank,
                reason: reason.clone(),
            }),
            None => Ok(()),
        }
    }
}

/// One-shot barrier that collects one result set per worker.
pub struct GatherBarrier {
    state: Mutex<Slots>,
    changed: Condvar,
    workers_count: u64,
}

impl GatherBarrier {
    #[must_use]
    pub fn new(workers_count: u64) -> Self {
        debug_assert!(workers_count > 0, "Must have at least one worker");

        Self {
            state: Mutex::new(Slots {
                slots: (0..workers_count).map(|_| None).collect(),
                arrived_count: 0,
                aborted: None,
                gathered: false,
            }),
            changed: Condvar::new(),
            workers_count,
        }
    }

    #[must_use]
    pub fn workers_count(&self) -> u64 {
        self.workers_count
    }

    fn lock(&self) -> Result<MutexGuard<'_, Slots>, GatherError> {
        self.state.lock().map_err(|_| GatherError::Poisoned)
    }

    fn wait_released<'a>(
        &self,
        mut state: MutexGuard<'a, Slots>,
    ) -> Result<MutexGuard<'a, Slots>, GatherError> {
        while !state.released() {
            state = self.changed.wait(state).map_err(|_| GatherError::Poisoned)?;
        }
        Ok(state)
    }

    /// Hand over `local` and wait at the barrier.
    ///
    /// Returns once every worker has arrived, or with
    /// [`GatherError::Aborted`] if any worker aborted first.
    pub fn arrive(&self, rank: u64, local: LocalResultSet) -> Result<(), GatherError> {
        if rank >= self.workers_count {
            return Err(GatherError::RankOutOfRange {
                rank,
                workers_count: self.workers_count,
            });
        }
        debug_assert!(local.rank() == rank, "result set handed over under the wrong rank");

        let mut state = self.lock()?;
        state.check_aborted()?;

        let slot = &mut state.slots[rank as usize];
        if slot.is_some() {
            return Err(GatherError::DuplicateArrival { rank });
        }
        *slot = Some(local);
        state.arrived_count += 1;
        debug_assert!(state.arrived_count <= self.workers_count);

        if state.released() {
            self.changed.notify_all();
        }

        let state = self.wait_released(state)?;
        state.check_aborted()
    }

    /// Abort the run on behalf of `rank`, releasing everyone blocked here.
    ///
    /// The first abort wins; later ones keep the original reason.
    pub fn abort(&self, rank: u64, reason: impl Into<String>) {
        // A poisoned lock already means the run is lost.
        if let Ok(mut state) = self.state.lock() {
            if state.aborted.is_none() {
                state.aborted = Some((rank, reason.into()));
            }
        }
        self.changed.notify_all();
    }

    /// Wait for every worker, then take all result sets in rank order.
    pub fn gather(&self) -> Result<Vec<LocalResultSet>, GatherError> {
        let state = self.lock()?;
        let mut state = self.wait_released(state)?;
        state.check_aborted()?;

        if state.gathered {
            return Err(GatherError::AlreadyGathered);
        }
        state.gathered = true;

        let locals: Option<Vec<LocalResultSet>> =
            state.slots.iter_mut().map(Option::take).collect();
        let locals = locals.ok_or(GatherError::AlreadyGathered)?;
        debug_assert!(locals.len() as u64 == self.workers_count);
        Ok(locals)
    }

    /// Workers that have handed over so far.
    pub fn arrived_count(&self) -> Result<u64, GatherError> {
        Ok(self.lock()?.arrived_count)
    }
}

#[cfg(all(test, not(loom)))]
mod tests {
    use super::*;
    use tp_core::TwinPrime;

    fn local(rank: u64, values: &[u64]) -> LocalResultSet {
        let mut set = LocalResultSet::with_quota(rank, values.len() as u64).unwrap();
        for &v in values {
            set.push(TwinPrime::new(v));
        }
        set
    }

    fn lowers(locals: &[LocalResultSet]) -> Vec<Vec<u64>> {
        locals
            .iter()
            .map(|l| l.pairs().iter().map(TwinPrime::lower).collect())
            .collect()
    }

    #[test]
    fn test_single_worker_does_not_block() {
        let barrier = GatherBarrier::new(1);
        barrier.arrive(0, local(0, &[11])).unwrap();
        assert_eq!(lowers(&barrier.gather().unwrap()), vec![vec![11]]);
    }

    #[test]
    fn test_gather_in_rank_order_regardless_of_arrival() {
        let barrier = GatherBarrier::new(3);
        crossbeam_utils::thread::scope(|s| {
            for rank in [2u64, 0, 1] {
                let barrier = &barrier;
                s.spawn(move |_| {
                    barrier
                        .arrive(rank, local(rank, &[100 * rank + 11]))
                        .unwrap();
                });
            }
            let locals = barrier.gather().unwrap();
            assert_eq!(lowers(&locals), vec![vec![11], vec![111], vec![211]]);
        })
        .unwrap();
        assert_eq!(barrier.arrived_count().unwrap(), 3);
    }

    #[test]
    fn test_duplicate_and_out_of_range() {
        let barrier = GatherBarrier::new(2);
        assert_eq!(
            barrier.arrive(5, local(5, &[])),
            Err(GatherError::RankOutOfRange {
                rank: 5,
                workers_count: 2
            })
        );

        crossbeam_utils::thread::scope(|s| {
            let first = s.spawn(|_| barrier.arrive(0, local(0, &[11])));
            // Wait until rank 0 is parked at the barrier.
            while barrier.arrived_count().unwrap() == 0 {
                std::thread::yield_now();
            }
            assert_eq!(
                barrier.arrive(0, local(0, &[17])),
                Err(GatherError::DuplicateArrival { rank: 0 })
            );
            barrier.arrive(1, local(1, &[29])).unwrap();
            first.join().unwrap().unwrap();
        })
        .unwrap();
    }

    #[test]
    fn test_abort_releases_everyone() {
        let barrier = GatherBarrier::new(3);
        crossbeam_utils::thread::scope(|s| {
            let waiting = s.spawn(|_| barrier.arrive(0, local(0, &[11])));
            barrier.abort(1, "allocation failed");
            let expected = GatherError::Aborted {
                rank: 1,
                reason: "allocation failed".to_string(),
            };
            assert_eq!(waiting.join().unwrap(), Err(expected.clone()));
            assert_eq!(barrier.gather(), Err(expected));
        })
        .unwrap();
    }

    #[test]
    fn test_first_abort_wins() {
        let barrier = GatherBarrier::new(2);
        barrier.abort(0, "first");
        barrier.abort(1, "second");
        assert_eq!(
            barrier.gather(),
            Err(GatherError::Aborted {
                rank: 0,
                reason: "first".to_string()
            })
        );
    }

    #[test]
    fn test_gather_twice() {
        let barrier = GatherBarrier::new(1);
        barrier.arrive(0, local(0, &[])).unwrap();
        assert!(barrier.gather().is_ok());
        assert_eq!(barrier.gather(), Err(GatherError::AlreadyGathered));
    }
}

#[cfg(loom)]
mod loom_tests {
    use super::*;
    use loom::sync::Arc;
    use loom::thread;
    use tp_core::TwinPrime;

    fn local(rank: u64, value: u64) -> LocalResultSet {
        let mut set = LocalResultSet::with_quota(rank, 1).unwrap();
        set.push(TwinPrime::new(value));
        set
    }

    #[test]
    fn loom_two_workers_gather_in_rank_order() {
        loom::model(|| {
            let barrier = Arc::new(GatherBarrier::new(2));

            let handles: Vec<_> = [(1u64, 17u64), (0, 11)]
                .into_iter()
                .map(|(rank, value)| {
                    let barrier = Arc::clone(&barrier);
                    thread::spawn(move || barrier.arrive(rank, local(rank, value)))
                })
                .collect();

            let locals = barrier.gather().unwrap();
            assert_eq!(locals[0].pairs(), &[TwinPrime::new(11)]);
            assert_eq!(locals[1].pairs(), &[TwinPrime::new(17)]);

            for handle in handles {
                assert!(handle.join().unwrap().is_ok());
            }
        });
    }

    #[test]
    fn loom_abort_never_deadlocks() {
        loom::model(|| {
            let barrier = Arc::new(GatherBarrier::new(2));

            let arriving = {
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || barrier.arrive(0, local(0, 11)))
            };
            let failing = {
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || barrier.abort(1, "search exhausted"))
            };

            assert!(barrier.gather().is_err());
            assert!(arriving.join().unwrap().is_err());
            failing.join().unwrap();
        });
    }
}
