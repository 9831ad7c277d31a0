//! Stateright model of one search run.
//!
//! | Property | Kind | Description |
//! |----------|------|-------------|
//! | NoGatherBeforeBarrier | always | Coordinator collects only once every worker arrived |
//! | NoEarlyRelease | always | No worker passes the barrier before all arrived |
//! | RankOrderPlacement | always | Gathered buffer is the local sets concatenated by rank |
//! | NoLostPairs | always | Gathered buffer holds every local pair exactly once |
//! | SortedBeforeEmit | always | Emitted output is sorted and holds `total_pairs` pairs |
//! | Completes | sometimes | A run reaches the emitted state |

use stateright::Model;
use tp_core::{QuotaPlan, Result, ShardPlan, TwinPrimeSearch};

/// Largest worker count explored; beyond this the state space explodes.
const WORKERS_COUNT_MAX: u64 = 6;

/// Per-worker protocol phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum WorkerPhase {
    /// Running the candidate search
    Searching,
    /// Result set handed over, blocked at the barrier
    Arrived,
    /// Passed the barrier
    Released,
}

/// Coordinator protocol phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CoordinatorPhase {
    Waiting,
    Gathered,
    Sorted,
    Emitted,
}

/// Global protocol state.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GatherState {
    pub workers: Vec<WorkerPhase>,
    /// Handed-over result sets, indexed by rank
    pub slots: Vec<Option<Vec<u64>>>,
    /// Coordinator buffer
    pub buffer: Vec<u64>,
    pub coordinator: CoordinatorPhase,
}

impl GatherState {
    fn all_arrived(&self) -> bool {
        self.slots.iter().all(Option::is_some)
    }
}

/// Protocol steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GatherAction {
    /// Worker meets its quota and hands its set over
    Arrive { rank: u64 },
    /// Worker leaves the barrier
    Release { rank: u64 },
    /// Coordinator concatenates the slots in rank order
    Gather,
    Sort,
    Emit,
}

/// Model of a run with fixed local result sets.
pub struct GatherModel {
    /// What each worker finds, indexed by rank
    pub locals: Vec<Vec<u64>>,
    pub total_pairs: u64,
}

impl GatherModel {
    /// Model with explicit per-worker results.
    pub fn new(locals: Vec<Vec<u64>>) -> Self {
        debug_assert!(!locals.is_empty(), "Must have at least one worker");
        debug_assert!(
            locals.len() as u64 <= WORKERS_COUNT_MAX,
            "Model checking with many workers is slow"
        );

        let total_pairs = locals.iter().map(|l| l.len() as u64).sum();
        Self {
            locals,
            total_pairs,
        }
    }

    /// Model whose local sets come from the real shard and quota plans.
    pub fn from_plans(total_pairs: u64, workers_count: u64) -> Result<Self> {
        let shard_plan = ShardPlan::new(workers_count)?;
        let quota_plan =
            QuotaPlan::new(total_pairs, workers_count, shard_plan.active_workers_count())?;

        let locals = shard_plan
            .iter()
            .map(|(rank, shards)| {
                TwinPrimeSearch::new(shards)
                    .take(quota_plan.quota_for(rank) as usize)
                    .map(|p| p.lower())
                    .collect()
            })
            .collect();
        Ok(Self::new(locals))
    }

    fn rank_order(&self) -> Vec<u64> {
        self.locals.iter().flatten().copied().collect()
    }
}

impl Model for GatherModel {
    type State = GatherState;
    type Action = GatherAction;

    fn init_states(&self) -> Vec<Self::State> {
        let workers_count = self.locals.len();
        vec![GatherState {
            workers: vec![WorkerPhase::Searching; workers_count],
            slots: vec![None; workers_count],
            buffer: Vec::new(),
            coordinator: CoordinatorPhase::Waiting,
        }]
    }

    fn actions(&self, state: &Self::State, actions: &mut Vec<Self::Action>) {
        let all_arrived = state.all_arrived();

        for (rank, phase) in state.workers.iter().enumerate() {
            let rank = rank as u64;
            match phase {
                WorkerPhase::Searching => actions.push(GatherAction::Arrive { rank }),
                WorkerPhase::Arrived if all_arrived => {
                    actions.push(GatherAction::Release { rank })
                }
                WorkerPhase::Arrived | WorkerPhase::Released => {}
            }
        }

        match state.coordinator {
            CoordinatorPhase::Waiting if all_arrived => actions.push(GatherAction::Gather),
            CoordinatorPhase::Gathered => actions.push(GatherAction::Sort),
            CoordinatorPhase::Sorted => actions.push(GatherAction::Emit),
            _ => {}
        }
    }

    fn next_state(&self, state: &Self::State, action: Self::Action) -> Option<Self::State> {
        let mut next = state.clone();

        match action {
            GatherAction::Arrive { rank } => {
                next.workers[rank as usize] = WorkerPhase::Arrived;
                next.slots[rank as usize] = Some(self.locals[rank as usize].clone());
            }
            GatherAction::Release { rank } => {
                next.workers[rank as usize] = WorkerPhase::Released;
            }
            GatherAction::Gather => {
                for slot in &mut next.slots {
                    next.buffer.extend(slot.take().unwrap_or_default());
                }
                next.coordinator = CoordinatorPhase::Gathered;
            }
            GatherAction::Sort => {
                next.buffer.sort_unstable();
                next.coordinator = CoordinatorPhase::Sorted;
            }
            GatherAction::Emit => {
                next.coordinator = CoordinatorPhase::Emitted;
            }
        }

        Some(next)
    }

    fn properties(&self) -> Vec<stateright::Property<Self>> {
        vec![
            stateright::Property::always(
                "NoGatherBeforeBarrier",
                |_model: &Self, state: &Self::State| {
                    state.coordinator == CoordinatorPhase::Waiting
                        || state.workers.iter().all(|&w| w != WorkerPhase::Searching)
                },
            ),
            stateright::Property::always("NoEarlyRelease", |_model: &Self, state: &Self::State| {
                !state.workers.contains(&WorkerPhase::Released)
                    || state.workers.iter().all(|&w| w != WorkerPhase::Searching)
            }),
            stateright::Property::always(
                "RankOrderPlacement",
                |model: &Self, state: &Self::State| {
                    state.coordinator != CoordinatorPhase::Gathered
                        || state.buffer == model.rank_order()
                },
            ),
            stateright::Property::always("NoLostPairs", |model: &Self, state: &Self::State| {
                if state.coordinator == CoordinatorPhase::Waiting {
                    return state.buffer.is_empty();
                }
                let mut gathered = state.buffer.clone();
                let mut expected = model.rank_order();
                gathered.sort_unstable();
                expected.sort_unstable();
                gathered == expected
            }),
            stateright::Property::always(
                "SortedBeforeEmit",
                |model: &Self, state: &Self::State| {
                    state.coordinator != CoordinatorPhase::Emitted
                        || (state.buffer.len() as u64 == model.total_pairs
                            && state.buffer.windows(2).all(|w| w[0] < w[1]))
                },
            ),
            stateright::Property::sometimes("Completes", |_model: &Self, state: &Self::State| {
                state.coordinator == CoordinatorPhase::Emitted
                    && state.workers.iter().all(|&w| w == WorkerPhase::Released)
            }),
        ]
    }
}
