// src/exec/runner.rs

//! High-level `run` / `run_stream` entry points combining launcher, demux
//! and sinks.

use std::time::Duration;

use super::demux::{EventStream, demux};
use super::launcher::{ExecutionContext, LaunchSpec, launch};
use super::sink::{EventSink, MemorySink, drain};
use super::ExecError;

/// Default per-execution timeout for the blocking [`run`].
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Captured result of one completed execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecResult {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
}

impl ExecResult {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Start a command and return its live event stream.
pub async fn run_stream(
    context: &ExecutionContext,
    command: &str,
    input: Option<String>,
) -> Result<EventStream, ExecError> {
    let spec = LaunchSpec {
        context: context.clone(),
        command: command.to_string(),
        input,
    };
    let process = launch(&spec).await?;
    Ok(demux(process))
}

/// Run a command to completion, capturing its output.
///
/// On timeout the whole process group is killed and
/// [`ExecError::Timeout`] is returned.
pub async fn run(
    context: &ExecutionContext,
    command: &str,
    input: Option<String>,
    timeout: Option<Duration>,
) -> Result<ExecResult, ExecError> {
    let deadline = timeout.unwrap_or(DEFAULT_TIMEOUT);
    let mut stream = run_stream(context, command, input).await?;

    let mut mem = MemorySink::new();
    let drained = {
        let mut sinks: [&mut dyn EventSink; 1] = [&mut mem];
        tokio::time::timeout(deadline, drain(&mut stream, &mut sinks)).await
    };

    match drained {
        Ok(Some(exit_code)) => {
            let (stdout, stderr, _) = mem.into_parts();
            Ok(ExecResult {
                stdout,
                stderr,
                exit_code,
            })
        }
        Ok(None) => Err(ExecError::Channel(
            "event stream closed before exit".to_string(),
        )),
        Err(_) => {
            stream.kill_group();
            Err(ExecError::Timeout(deadline))
        }
    }
}
