// src/exec/launcher.rs

//! Child process launching.
//!
//! A [`LaunchSpec`] pairs a normalized command string with an
//! [`ExecutionContext`] deciding *where* the command runs: under a local
//! `sh -c`, or wrapped in a remote-shell invocation prefix such as
//! `ssh ... user@host --`.
//!
//! The child is started in its own process group so that the whole subtree
//! can be killed atomically on timeout or cancellation.

use std::process::Stdio;

use tokio::io::AsyncWriteExt;
use tokio::process::{Child, Command};
use tracing::debug;

use super::ExecError;

/// Where and how a command string is executed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionContext {
    /// Run the command under the local shell (`sh -c <cmd>`).
    Local,
    /// Prepend a remote-shell invocation prefix and pass the command as the
    /// final argument, e.g. `["ssh", "-o", ..., "user@host", "--"]`.
    Wrapped { prefix: Vec<String> },
}

impl ExecutionContext {
    fn build_command(&self, command: &str) -> Result<Command, ExecError> {
        match self {
            ExecutionContext::Local => {
                let mut cmd = Command::new("sh");
                cmd.arg("-c").arg(command);
                Ok(cmd)
            }
            ExecutionContext::Wrapped { prefix } => {
                let Some((program, rest)) = prefix.split_first() else {
                    return Err(ExecError::Spawn(std::io::Error::new(
                        std::io::ErrorKind::InvalidInput,
                        "empty execution prefix",
                    )));
                };
                let mut cmd = Command::new(program);
                cmd.args(rest).arg(command);
                Ok(cmd)
            }
        }
    }
}

/// One command invocation to be launched.
#[derive(Debug, Clone)]
pub struct LaunchSpec {
    pub context: ExecutionContext,
    pub command: String,
    /// Optional script written to the child's stdin, which is then closed
    /// so script-reading programs see EOF and terminate.
    pub input: Option<String>,
}

/// A spawned child plus the id of its process group.
#[derive(Debug)]
pub struct LaunchedProcess {
    pub child: Child,
    pub pgid: Option<i32>,
}

/// Start the child process described by `spec`.
///
/// Spawn failure (binary not found, permission denied) maps to
/// [`ExecError::Spawn`]; it is never retried here.
pub async fn launch(spec: &LaunchSpec) -> Result<LaunchedProcess, ExecError> {
    let mut cmd = spec.context.build_command(&spec.command)?;

    cmd.stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .stdin(if spec.input.is_some() {
            Stdio::piped()
        } else {
            Stdio::null()
        })
        .kill_on_drop(true);

    // Own process group: a timeout or abort kills the whole subtree, not
    // just the immediate child.
    #[cfg(unix)]
    cmd.process_group(0);

    let mut child = cmd.spawn().map_err(ExecError::Spawn)?;
    let pgid = child.id().map(|id| id as i32);

    if let Some(input) = &spec.input {
        if let Some(mut stdin) = child.stdin.take() {
            if let Err(err) = stdin.write_all(input.as_bytes()).await {
                // The child may legitimately exit before reading stdin.
                debug!(error = %err, "writing input script to child stdin failed");
            }
            // Dropping stdin closes the pipe and signals EOF.
        }
    }

    Ok(LaunchedProcess { child, pgid })
}

/// Kill an entire process group, best effort.
#[cfg(unix)]
pub fn kill_group(pgid: i32) {
    use nix::sys::signal::{Signal, killpg};
    use nix::unistd::Pid;

    if let Err(err) = killpg(Pid::from_raw(pgid), Signal::SIGKILL) {
        debug!(pgid, error = %err, "killpg failed (process group may already be gone)");
    }
}

#[cfg(not(unix))]
pub fn kill_group(_pgid: i32) {}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn spawn_failure_is_reported() {
        let spec = LaunchSpec {
            context: ExecutionContext::Wrapped {
                prefix: vec!["/nonexistent/fleetrun-remote-shell".to_string()],
            },
            command: "echo hi".to_string(),
            input: None,
        };
        let err = launch(&spec).await.err().unwrap();
        assert!(matches!(err, ExecError::Spawn(_)));
    }

    #[tokio::test]
    async fn empty_prefix_is_a_spawn_error() {
        let spec = LaunchSpec {
            context: ExecutionContext::Wrapped { prefix: vec![] },
            command: "echo hi".to_string(),
            input: None,
        };
        assert!(matches!(
            launch(&spec).await,
            Err(ExecError::Spawn(_))
        ));
    }
}
