// src/exec/sink.rs

//! Event stream consumption.
//!
//! [`drain`] pulls events in emission order until the terminal exit event,
//! dispatching each to the supplied [`EventSink`]s. Sinks compose: a fleet
//! run typically drains through a live status sink, a file sink, and an
//! in-memory capture at the same time.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use super::demux::{EventStream, StreamEvent};

/// Handler of demultiplexed stream events.
///
/// All methods default to dropping the event, so implementations only
/// override what they care about. `on_exit` is invoked exactly once per
/// execution, after both output streams are fully drained.
pub trait EventSink: Send {
    fn on_stdout(&mut self, _line: &str) {}
    fn on_stderr(&mut self, _line: &str) {}
    fn on_exit(&mut self, _code: i32) {}
}

/// Drain an event stream through the given sinks.
///
/// Returns the exit code from the terminal event, or `None` if the stream
/// closed without one (broken channel).
pub async fn drain(
    stream: &mut EventStream,
    sinks: &mut [&mut dyn EventSink],
) -> Option<i32> {
    let mut exit_code = None;

    while let Some(event) = stream.next_event().await {
        match event {
            StreamEvent::Stdout(line) => {
                for sink in sinks.iter_mut() {
                    sink.on_stdout(&line);
                }
            }
            StreamEvent::Stderr(line) => {
                for sink in sinks.iter_mut() {
                    sink.on_stderr(&line);
                }
            }
            StreamEvent::Exit(code) => {
                for sink in sinks.iter_mut() {
                    sink.on_exit(code);
                }
                exit_code = Some(code);
            }
        }
    }

    exit_code
}

/// Writer shared between sinks of concurrently-executing targets.
///
/// The mutex is the output-serialization lock: it keeps lines from
/// different targets from interleaving mid-line on one terminal.
pub type SharedWriter = Arc<Mutex<Box<dyn Write + Send>>>;

/// A [`SharedWriter`] over the process stdout.
pub fn stdout_writer() -> SharedWriter {
    Arc::new(Mutex::new(Box::new(std::io::stdout())))
}

/// Prints every event annotated with the target's identity, for
/// interleaved multi-target consoles:
///
/// ```text
/// node1 STDOUT | hello world
/// node1 EXIT CODE | 0
/// ```
pub struct PrefixSink {
    prefix: String,
    writer: SharedWriter,
}

impl PrefixSink {
    pub fn new(prefix: &str, writer: SharedWriter) -> Self {
        Self {
            prefix: prefix.to_string(),
            writer,
        }
    }

    fn emit(&self, kind: &str, text: &str) {
        let Ok(mut writer) = self.writer.lock() else {
            return;
        };
        let _ = writeln!(writer, "{} {} | {}", self.prefix, kind, text);
        let _ = writer.flush();
    }
}

impl EventSink for PrefixSink {
    fn on_stdout(&mut self, line: &str) {
        self.emit("STDOUT", line.trim_end_matches('\n'));
    }

    fn on_stderr(&mut self, line: &str) {
        self.emit("STDERR", line.trim_end_matches('\n'));
    }

    fn on_exit(&mut self, code: i32) {
        self.emit("EXIT CODE", &code.to_string());
    }
}

/// Appends each stream to a per-target file, one file per stream kind,
/// flushing per line for crash-safety:
/// `<dir>/<name>.stdout`, `<dir>/<name>.stderr`, `<dir>/<name>.exitcode`.
///
/// Files contain the raw captured stream text.
pub struct FileSink {
    stdout: File,
    stderr: File,
    exitcode_path: PathBuf,
}

impl FileSink {
    pub fn create(dir: &Path, name: &str) -> std::io::Result<Self> {
        std::fs::create_dir_all(dir)?;
        Ok(Self {
            stdout: File::create(dir.join(format!("{name}.stdout")))?,
            stderr: File::create(dir.join(format!("{name}.stderr")))?,
            exitcode_path: dir.join(format!("{name}.exitcode")),
        })
    }

    fn append(file: &mut File, line: &str) {
        let _ = file.write_all(line.as_bytes());
        let _ = file.flush();
    }
}

impl EventSink for FileSink {
    fn on_stdout(&mut self, line: &str) {
        Self::append(&mut self.stdout, line);
    }

    fn on_stderr(&mut self, line: &str) {
        Self::append(&mut self.stderr, line);
    }

    fn on_exit(&mut self, code: i32) {
        let _ = std::fs::write(&self.exitcode_path, format!("{code}\n"));
    }
}

/// Collects the whole execution in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    stdout: String,
    stderr: String,
    exit_code: Option<i32>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stdout(&self) -> &str {
        &self.stdout
    }

    pub fn stderr(&self) -> &str {
        &self.stderr
    }

    pub fn exit_code(&self) -> Option<i32> {
        self.exit_code
    }

    pub fn into_parts(self) -> (String, String, Option<i32>) {
        (self.stdout, self.stderr, self.exit_code)
    }
}

impl EventSink for MemorySink {
    fn on_stdout(&mut self, line: &str) {
        self.stdout.push_str(line);
    }

    fn on_stderr(&mut self, line: &str) {
        self.stderr.push_str(line);
    }

    fn on_exit(&mut self, code: i32) {
        self.exit_code = Some(code);
    }
}
