//! Run coordination: spawn, barrier, gather, sort, assemble.
//!
//! ```text
//!  worker 0 ─┐
//!  worker 1 ─┼─> GatherBarrier ──> rank-order buffer ──> sort ──> report
//!  worker n ─┘   (all arrive)       (len = total_pairs)
//! ```

use std::time::Instant;

use tracing::{error, info};
use tp_core::{GlobalResultSet, LocalResultSet, QuotaPlan, SearchRequest, ShardPlan};

#[cfg(debug_assertions)]
use tp_core::{PropertyChecker, RunPropertyChecker};

use crate::config::ClusterConfig;
use crate::error::{ClusterError, GatherError, Result};
use crate::report::{RunStats, TwinPrimeReport};
use crate::rendezvous::GatherBarrier;
use crate::worker::{Worker, WorkerStats};

/// What the coordinator holds after the barrier: the gathered sets and
/// every worker's own outcome.
type GatherOutcome = (
    std::result::Result<Vec<LocalResultSet>, GatherError>,
    Vec<Result<WorkerStats>>,
);

/// Runs one search across a fixed set of worker threads.
pub struct Coordinator {
    config: ClusterConfig,
}

impl Coordinator {
    #[must_use]
    pub fn new(config: ClusterConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &ClusterConfig {
        &self.config
    }

    /// Run the search for `request` and return the sorted report.
    ///
    /// Any worker failure aborts the whole run; no partial result is
    /// returned.
    pub fn run(&self, request: SearchRequest) -> Result<TwinPrimeReport> {
        self.config.validate()?;

        let total_pairs = request.total_pairs();
        let shard_plan = ShardPlan::new(self.config.workers_count)?;
        let quota_plan = QuotaPlan::new(
            total_pairs,
            shard_plan.workers_count(),
            shard_plan.active_workers_count(),
        )?;

        info!(
            workers = shard_plan.workers_count(),
            active = shard_plan.active_workers_count(),
            total_pairs,
            "starting twin prime search"
        );

        let start = Instant::now();
        let barrier = GatherBarrier::new(shard_plan.workers_count());
        let (gathered, outcomes) = self.spawn_and_gather(&shard_plan, &quota_plan, &barrier)?;
        let search_us = start.elapsed().as_micros() as u64;

        let locals = match gathered {
            Ok(locals) => locals,
            Err(e) => return Err(originating_error(e, outcomes)),
        };
        let mut workers = Vec::with_capacity(outcomes.len());
        for outcome in outcomes {
            workers.push(outcome?);
        }

        info!("gathered lists, sorting");
        let sort_start = Instant::now();
        let mut results = GlobalResultSet::gather(total_pairs, locals)?;
        results.sort();
        let sort_us = sort_start.elapsed().as_micros() as u64;
        info!(pairs = results.len(), "sorted lists");

        let stats = RunStats {
            requested_total: request.requested_total(),
            total_pairs,
            workers_count: shard_plan.workers_count(),
            active_workers_count: shard_plan.active_workers_count(),
            search_us,
            sort_us,
            workers,
        };
        let report = TwinPrimeReport::new(request, shard_plan, quota_plan, results, stats);

        #[cfg(debug_assertions)]
        {
            let checker = RunPropertyChecker::new(&report);
            debug_assert!(checker.all_hold(), "{}", checker.summary().format_report());
        }

        Ok(report)
    }

    /// Spawn one thread per worker and gather on the calling thread.
    fn spawn_and_gather(
        &self,
        shard_plan: &ShardPlan,
        quota_plan: &QuotaPlan,
        barrier: &GatherBarrier,
    ) -> Result<GatherOutcome> {
        crossbeam_utils::thread::scope(|s| {
            let handles: Vec<_> = shard_plan
                .iter()
                .map(|(rank, _)| {
                    let worker = Worker::from_plans(rank, shard_plan, quota_plan);
                    let handle = s
                        .builder()
                        .name(format!("tp-worker-{}", rank))
                        .spawn(move |_| run_worker(worker, barrier))
                        .map_err(|e| {
                            error!(rank, error = %e, "failed to spawn worker");
                            barrier.abort(rank, format!("spawn failed: {}", e));
                            e.to_string()
                        });
                    (rank, handle)
                })
                .collect();

            let gathered = barrier.gather();

            let outcomes: Vec<Result<WorkerStats>> = handles
                .into_iter()
                .map(|(rank, handle)| match handle {
                    Ok(handle) => handle
                        .join()
                        .unwrap_or(Err(ClusterError::WorkerPanicked { rank })),
                    Err(reason) => Err(ClusterError::Spawn { rank, reason }),
                })
                .collect();

            (gathered, outcomes)
        })
        .map_err(|_| ClusterError::WorkerPanicked { rank: 0 })
    }
}

/// Body of one worker thread: search, then hand over or abort.
fn run_worker(worker: Worker, barrier: &GatherBarrier) -> Result<WorkerStats> {
    match worker.run() {
        Ok((local, stats)) => {
            barrier.arrive(worker.rank(), local)?;
            Ok(stats)
        }
        Err(e) => {
            error!(rank = worker.rank(), error = %e, "worker failed, aborting run");
            barrier.abort(worker.rank(), e.to_string());
            Err(e.into())
        }
    }
}

/// Prefer the worker error that caused an abort over the abort itself.
fn originating_error(gather_error: GatherError, outcomes: Vec<Result<WorkerStats>>) -> ClusterError {
    outcomes
        .into_iter()
        .filter_map(std::result::Result::err)
        .find(|e| !matches!(e, ClusterError::Gather(GatherError::Aborted { .. })))
        .unwrap_or(ClusterError::Gather(gather_error))
}
