// src/fleet/mod.rs

//! Fleet execution layer.
//!
//! Fans one logical command out to every target of a target set, runs the
//! per-target executions concurrently under a bounded worker pool, and
//! aggregates the terminal outcomes:
//!
//! - [`executor`] owns the fan-out, per-target timeout and error policy.
//! - [`outcome`] holds the per-target and fleet-level result types.
//! - [`status`] renders one live status line per target.
//! - [`report`] reduces a [`outcome::FleetResult`] into a summary.

pub mod executor;
pub mod outcome;
pub mod report;
pub mod status;

pub use executor::{ErrorPolicy, ExecTarget, FleetExecutor, FleetOptions};
pub use outcome::{FailReason, FleetResult, RunOutcome};
pub use report::summarize;
pub use status::StatusBoard;
