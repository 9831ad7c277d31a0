//! Invariants of a twin prime search run.

pub mod run;

pub use run::{check_local_order, RunProperties, RunPropertyChecker};
