// src/exec/mod.rs

//! Process execution core.
//!
//! This layer knows how to start one external command (locally, or wrapped
//! in a remote-shell invocation), demultiplex its stdout/stderr into a
//! single ordered event stream, and drain that stream through pluggable
//! sinks.
//!
//! - [`command`] normalizes argv-style commands into one shell-safe string.
//! - [`launcher`] spawns the child process in its own process group.
//! - [`demux`] merges stdout/stderr/exit into one [`demux::EventStream`].
//! - [`sink`] consumes an event stream through [`sink::EventSink`]s.
//! - [`runner`] combines the above into `run` / `run_stream` entry points.

use std::time::Duration;

use thiserror::Error;

pub mod command;
pub mod demux;
pub mod launcher;
pub mod runner;
pub mod sink;

pub use command::{command_from_args, normalize};
pub use demux::{EventStream, StreamEvent, demux};
pub use launcher::{ExecutionContext, LaunchSpec, LaunchedProcess, launch};
pub use runner::{DEFAULT_TIMEOUT, ExecResult, run, run_stream};
pub use sink::{EventSink, FileSink, MemorySink, PrefixSink, drain};

/// Errors of a single command execution.
///
/// These never unwind a fleet call; the fleet layer converts them into
/// per-target outcomes.
#[derive(Error, Debug)]
pub enum ExecError {
    /// The child process could not be created.
    #[error("failed to spawn process: {0}")]
    Spawn(#[source] std::io::Error),

    /// The per-execution timeout elapsed before the terminal exit event.
    #[error("timed out after {0:?}")]
    Timeout(Duration),

    /// The event stream closed before delivering an exit event.
    #[error("output channel broke: {0}")]
    Channel(String),
}
