// src/fleet/report.rs

//! Fleet result aggregation.
//!
//! A pure reduction over already-resolved outcomes; this module has no
//! failure modes of its own.

use super::outcome::{FailReason, FleetResult, RunOutcome};

/// Reduce a fleet result to `(overall_success, human-readable report)`.
///
/// The report lists every target in its original order with its status,
/// exit code if any, and where full output was persisted.
pub fn summarize(result: &FleetResult) -> (bool, String) {
    let mut lines = Vec::with_capacity(result.outcomes().len() + 2);

    for (name, outcome) in result.outcomes() {
        lines.push(match outcome {
            RunOutcome::Completed { exit_code: 0, .. } => format!("{name}: SUCCESS"),
            RunOutcome::Completed { exit_code, .. } => {
                format!("{name}: FAIL (exit code {exit_code})")
            }
            RunOutcome::Failed(FailReason::Timeout) => format!("{name}: TIMEOUT"),
            RunOutcome::Failed(FailReason::Spawn(msg)) => {
                format!("{name}: SPAWN FAILED ({msg})")
            }
            RunOutcome::Failed(FailReason::Channel(msg)) => {
                format!("{name}: CHANNEL ERROR ({msg})")
            }
            RunOutcome::Failed(FailReason::Aborted) => format!("{name}: ABORTED"),
        });
    }

    if let Some(dir) = result.output_dir() {
        lines.push(format!("output: {}", dir.display()));
    }

    let total = result.outcomes().len();
    let failed = result
        .outcomes()
        .iter()
        .filter(|(_, outcome)| !outcome.succeeded())
        .count();
    let overall = failed == 0;
    lines.push(if overall {
        format!("all {total} target(s) succeeded")
    } else {
        format!("{failed} of {total} target(s) failed")
    });

    (overall, lines.join("\n"))
}
