// src/exec/demux.rs

//! Stream demultiplexing.
//!
//! For one running child process, two concurrent line-readers (stdout and
//! stderr) push events into a single bounded queue as lines arrive, so a
//! long-running command can be tailed live without buffering whole streams.
//! A coordinating task waits for both readers to reach EOF, then for the
//! process to exit, then emits exactly one [`StreamEvent::Exit`] and closes
//! the queue.
//!
//! Ordering: within each stream, line order is preserved. Interleaving
//! *between* stdout and stderr is best effort only. `Exit` is always last,
//! and is emitted even if the process is killed or a read fails mid-stream,
//! so consumers never wait on a queue that will not close.

use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use super::launcher::{self, LaunchedProcess};

/// Sentinel exit code used when the OS reports none (e.g. killed by signal).
pub const EXIT_UNKNOWN: i32 = -1;

/// One unit of observed output, or the terminal exit signal.
///
/// Lines keep the trailing newline as read from the child; a final
/// unterminated line is delivered without one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamEvent {
    Stdout(String),
    Stderr(String),
    Exit(i32),
}

/// The ordered event stream of one execution.
pub struct EventStream {
    rx: mpsc::Receiver<StreamEvent>,
    pgid: Option<i32>,
}

impl EventStream {
    /// Next event, or `None` once the stream is closed after `Exit`.
    pub async fn next_event(&mut self) -> Option<StreamEvent> {
        self.rx.recv().await
    }

    /// Process group id of the underlying child, if known.
    pub fn pgid(&self) -> Option<i32> {
        self.pgid
    }

    /// Kill the child's whole process group, best effort.
    pub fn kill_group(&self) {
        if let Some(pgid) = self.pgid {
            launcher::kill_group(pgid);
        }
    }
}

/// Demultiplex a launched process into one ordered [`EventStream`].
pub fn demux(process: LaunchedProcess) -> EventStream {
    let LaunchedProcess { mut child, pgid } = process;
    let (tx, rx) = mpsc::channel::<StreamEvent>(64);

    let stdout = child.stdout.take();
    let stderr = child.stderr.take();

    let out_reader = tokio::spawn(pump(stdout, tx.clone(), StreamEvent::Stdout));
    let err_reader = tokio::spawn(pump(stderr, tx.clone(), StreamEvent::Stderr));

    // Coordinator: both streams drained first, then the exit status, so no
    // output event can be lost after the terminal event is delivered.
    tokio::spawn(async move {
        let _ = tokio::join!(out_reader, err_reader);

        let code = match child.wait().await {
            Ok(status) => status.code().unwrap_or(EXIT_UNKNOWN),
            Err(err) => {
                warn!(error = %err, "waiting for child process failed");
                EXIT_UNKNOWN
            }
        };

        let _ = tx.send(StreamEvent::Exit(code)).await;
        // Dropping the last sender closes the queue.
    });

    EventStream { rx, pgid }
}

/// Read one output channel line by line, forwarding each as an event.
async fn pump<R>(
    reader: Option<R>,
    tx: mpsc::Sender<StreamEvent>,
    wrap: fn(String) -> StreamEvent,
) where
    R: AsyncRead + Unpin,
{
    let Some(reader) = reader else {
        return;
    };
    let mut reader = BufReader::new(reader);

    loop {
        let mut line = String::new();
        match reader.read_line(&mut line).await {
            Ok(0) => break,
            Ok(_) => {
                if tx.send(wrap(line)).await.is_err() {
                    // Consumer went away; stop reading.
                    break;
                }
            }
            Err(err) => {
                debug!(error = %err, "reading child output failed mid-stream");
                break;
            }
        }
    }
}
