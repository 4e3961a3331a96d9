// src/fleet/outcome.rs

//! Per-target and fleet-level result values.
//!
//! Errors flow through these types as values: a failed target never
//! unwinds the fleet call, it is recorded and surfaced in the final
//! report. Every dispatched target resolves to exactly one [`RunOutcome`].

use std::fmt;
use std::path::{Path, PathBuf};

/// Why a target failed before producing an exit code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailReason {
    /// The per-target timeout elapsed; the process group was killed.
    Timeout,
    /// The child process/channel could not be created.
    Spawn(String),
    /// The output channel broke before the terminal event.
    Channel(String),
    /// Cancelled by the abort-all error policy after another target failed.
    Aborted,
}

impl fmt::Display for FailReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailReason::Timeout => write!(f, "timeout"),
            FailReason::Spawn(msg) => write!(f, "spawn error: {msg}"),
            FailReason::Channel(msg) => write!(f, "channel error: {msg}"),
            FailReason::Aborted => write!(f, "aborted"),
        }
    }
}

/// Terminal result of one target's execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// The process ran to completion (any exit code).
    Completed {
        exit_code: i32,
        stdout: String,
        stderr: String,
    },
    /// The execution never reached a process exit.
    Failed(FailReason),
}

impl RunOutcome {
    /// A target succeeded iff it completed with exit code 0.
    pub fn succeeded(&self) -> bool {
        matches!(self, RunOutcome::Completed { exit_code: 0, .. })
    }

    pub fn exit_code(&self) -> Option<i32> {
        match self {
            RunOutcome::Completed { exit_code, .. } => Some(*exit_code),
            RunOutcome::Failed(_) => None,
        }
    }
}

/// The ordered mapping target name -> outcome for one fleet call.
#[derive(Debug, Clone)]
pub struct FleetResult {
    outcomes: Vec<(String, RunOutcome)>,
    output_dir: Option<PathBuf>,
}

impl FleetResult {
    pub fn new(outcomes: Vec<(String, RunOutcome)>, output_dir: Option<PathBuf>) -> Self {
        Self {
            outcomes,
            output_dir,
        }
    }

    /// Outcomes in the target set's original order.
    pub fn outcomes(&self) -> &[(String, RunOutcome)] {
        &self.outcomes
    }

    pub fn get(&self, name: &str) -> Option<&RunOutcome> {
        self.outcomes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, outcome)| outcome)
    }

    /// Where per-target output files were persisted, if anywhere.
    pub fn output_dir(&self) -> Option<&Path> {
        self.output_dir.as_deref()
    }

    /// True iff every target completed with exit code 0.
    pub fn overall_success(&self) -> bool {
        self.outcomes.iter().all(|(_, outcome)| outcome.succeeded())
    }
}
