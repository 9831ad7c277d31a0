//! # tp-stateright
//!
//! Stateright model of the barrier + gather + sort protocol.
//!
//! The model explores every interleaving of workers finishing, handing
//! over, and the coordinator gathering, sorting and emitting, and checks the
//! protocol invariants in every reachable state. Worker results are
//! computed with `tp-core`, so the model runs on real shard and quota plans.

pub mod gather_protocol;

pub use gather_protocol::{CoordinatorPhase, GatherAction, GatherModel, GatherState, WorkerPhase};
