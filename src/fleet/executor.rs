// src/fleet/executor.rs

//! Concurrent fan-out of one command across a target set.
//!
//! Each target gets its own unit of work: launch, demultiplex, drain
//! through live-status and file-persistence sinks, record the outcome. A
//! semaphore bounds how many units run at once; a watch channel carries
//! the abort-all signal. The only state shared between units is that
//! semaphore, the cancel flag, and the output-serialization lock inside
//! the status board / shared writer.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Semaphore, watch};
use tracing::{debug, warn};

use crate::exec::runner::run_stream;
use crate::exec::sink::{
    EventSink, FileSink, MemorySink, PrefixSink, SharedWriter, drain, stdout_writer,
};
use crate::exec::{DEFAULT_TIMEOUT, ExecutionContext};

use super::outcome::{FailReason, FleetResult, RunOutcome};
use super::status::StatusBoard;

/// What to do with still-running targets when one target fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorPolicy {
    /// Leave other targets alone; the failure shows up in the report.
    #[default]
    Continue,
    /// Kill every still-running execution as soon as one target fails.
    AbortAll,
}

/// Options of one fleet call.
#[derive(Debug, Clone)]
pub struct FleetOptions {
    /// Per-target timeout.
    pub timeout: Duration,
    /// Bounded worker pool size; `None` means fully parallel.
    pub concurrency: Option<usize>,
    pub on_error: ErrorPolicy,
    /// Where to persist per-target output files; `None` disables
    /// persistence.
    pub output_dir: Option<PathBuf>,
}

impl Default for FleetOptions {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            concurrency: None,
            on_error: ErrorPolicy::Continue,
            output_dir: None,
        }
    }
}

/// One addressable unit of a fleet call: a display name plus the execution
/// context that reaches it.
#[derive(Debug, Clone)]
pub struct ExecTarget {
    pub name: String,
    pub context: ExecutionContext,
}

/// Runs one command against a whole target set.
pub struct FleetExecutor {
    options: FleetOptions,
}

impl FleetExecutor {
    pub fn new(options: FleetOptions) -> Self {
        Self { options }
    }

    /// Execute `command` on every target, returning once all targets have
    /// reached a terminal outcome. Target order in the result matches the
    /// input order.
    pub async fn execute(
        &self,
        targets: &[ExecTarget],
        command: &str,
        input: Option<&str>,
    ) -> FleetResult {
        let names: Vec<String> = targets.iter().map(|t| t.name.clone()).collect();
        let board = Arc::new(StatusBoard::new(names));
        let shared_out = stdout_writer();

        let limit = self
            .options
            .concurrency
            .unwrap_or_else(|| targets.len())
            .max(1);
        let semaphore = Arc::new(Semaphore::new(limit));
        let (cancel_tx, cancel_rx) = watch::channel(false);
        let cancel_tx = Arc::new(cancel_tx);

        let mut handles = Vec::with_capacity(targets.len());
        for (index, target) in targets.iter().enumerate() {
            let unit = UnitOfWork {
                target: target.clone(),
                index,
                command: command.to_string(),
                input: input.map(str::to_string),
                options: self.options.clone(),
                board: Arc::clone(&board),
                shared_out: shared_out.clone(),
                semaphore: Arc::clone(&semaphore),
                cancel_tx: Arc::clone(&cancel_tx),
                cancel_rx: cancel_rx.clone(),
            };
            handles.push((target.name.clone(), tokio::spawn(run_unit(unit))));
        }

        let mut outcomes = Vec::with_capacity(handles.len());
        for (name, handle) in handles {
            let outcome = match handle.await {
                Ok(outcome) => outcome,
                Err(err) => {
                    warn!(name = %name, error = %err, "target worker task failed");
                    RunOutcome::Failed(FailReason::Channel(format!(
                        "worker task failed: {err}"
                    )))
                }
            };
            outcomes.push((name, outcome));
        }

        FleetResult::new(outcomes, self.options.output_dir.clone())
    }
}

/// Everything one target's execution needs, owned.
struct UnitOfWork {
    target: ExecTarget,
    index: usize,
    command: String,
    input: Option<String>,
    options: FleetOptions,
    board: Arc<StatusBoard>,
    shared_out: SharedWriter,
    semaphore: Arc<Semaphore>,
    cancel_tx: Arc<watch::Sender<bool>>,
    cancel_rx: watch::Receiver<bool>,
}

enum UnitEnd {
    Exited(Option<i32>),
    TimedOut,
    Cancelled,
}

/// Live output sink for one target: in-place status line when the
/// terminal is interactive, prefixed structured lines otherwise.
enum LiveSink {
    Board(BoardSink),
    Prefix(PrefixSink),
}

async fn run_unit(unit: UnitOfWork) -> RunOutcome {
    let UnitOfWork {
        target,
        index,
        command,
        input,
        options,
        board,
        shared_out,
        semaphore,
        cancel_tx,
        cancel_rx,
    } = unit;

    let _permit = match Arc::clone(&semaphore).acquire_owned().await {
        Ok(permit) => permit,
        Err(_) => {
            return RunOutcome::Failed(FailReason::Channel(
                "worker pool closed".to_string(),
            ));
        }
    };

    // A failure elsewhere may have aborted the fleet while we waited for a
    // pool slot.
    if *cancel_rx.borrow() {
        board.set(index, "aborted");
        return RunOutcome::Failed(FailReason::Aborted);
    }

    board.set(index, "running");
    debug!(name = %target.name, command = %command, "dispatching command");

    let mut stream = match run_stream(&target.context, &command, input).await {
        Ok(stream) => stream,
        Err(err) => {
            board.set(index, "spawn failed");
            let outcome = RunOutcome::Failed(FailReason::Spawn(err.to_string()));
            signal_failure(&options, &cancel_tx);
            return outcome;
        }
    };

    let mut mem = MemorySink::new();
    let mut file_sink = match &options.output_dir {
        Some(dir) => match FileSink::create(dir, &target.name) {
            Ok(sink) => Some(sink),
            Err(err) => {
                warn!(name = %target.name, error = %err, "could not open output files");
                None
            }
        },
        None => None,
    };
    let mut live = if board.interactive() {
        LiveSink::Board(BoardSink {
            board: Arc::clone(&board),
            index,
        })
    } else {
        LiveSink::Prefix(PrefixSink::new(&target.name, shared_out))
    };

    let end = {
        let mut sinks: Vec<&mut dyn EventSink> = Vec::with_capacity(3);
        sinks.push(&mut mem);
        if let Some(sink) = file_sink.as_mut() {
            sinks.push(sink);
        }
        match &mut live {
            LiveSink::Board(sink) => sinks.push(sink),
            LiveSink::Prefix(sink) => sinks.push(sink),
        }

        tokio::select! {
            drained = tokio::time::timeout(options.timeout, drain(&mut stream, &mut sinks)) => {
                match drained {
                    Ok(exit_code) => UnitEnd::Exited(exit_code),
                    Err(_) => UnitEnd::TimedOut,
                }
            }
            () = cancelled(cancel_rx.clone()) => UnitEnd::Cancelled,
        }
    };

    let outcome = match end {
        UnitEnd::Exited(Some(exit_code)) => {
            board.set(
                index,
                &if exit_code == 0 {
                    "done".to_string()
                } else {
                    format!("exit {exit_code}")
                },
            );
            let (stdout, stderr, _) = mem.into_parts();
            RunOutcome::Completed {
                exit_code,
                stdout,
                stderr,
            }
        }
        UnitEnd::Exited(None) => {
            board.set(index, "channel error");
            RunOutcome::Failed(FailReason::Channel(
                "event stream closed before exit".to_string(),
            ))
        }
        UnitEnd::TimedOut => {
            stream.kill_group();
            board.set(index, "timeout");
            RunOutcome::Failed(FailReason::Timeout)
        }
        UnitEnd::Cancelled => {
            stream.kill_group();
            board.set(index, "aborted");
            RunOutcome::Failed(FailReason::Aborted)
        }
    };

    if !outcome.succeeded() {
        signal_failure(&options, &cancel_tx);
    }
    outcome
}

fn signal_failure(options: &FleetOptions, cancel_tx: &watch::Sender<bool>) {
    if options.on_error == ErrorPolicy::AbortAll {
        cancel_tx.send_replace(true);
    }
}

/// Resolves once the cancel flag flips to true; pends forever otherwise.
async fn cancelled(mut cancel_rx: watch::Receiver<bool>) {
    loop {
        if *cancel_rx.borrow() {
            return;
        }
        if cancel_rx.changed().await.is_err() {
            // Sender gone without ever cancelling; nothing to wait for.
            std::future::pending::<()>().await;
        }
    }
}

/// Feeds each output line into the target's status line.
struct BoardSink {
    board: Arc<StatusBoard>,
    index: usize,
}

impl EventSink for BoardSink {
    fn on_stdout(&mut self, line: &str) {
        self.board.set(self.index, line.trim_end());
    }

    fn on_stderr(&mut self, line: &str) {
        self.board.set(self.index, line.trim_end());
    }
}
