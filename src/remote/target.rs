// src/remote/target.rs

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use crate::exec::{EventStream, ExecError, ExecResult, ExecutionContext, run, run_stream};

use super::transfer;

/// One addressable endpoint capable of executing commands and transferring
/// files.
///
/// Targets are immutable value objects compared by their identifying
/// fields. Provider-specific metadata (zones, instance ids, ...) does not
/// belong here; keep it in a side table keyed by target name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub name: String,
    pub host: String,
    pub port: u16,
    pub user: String,
    pub ssh_key: Option<PathBuf>,
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}@{})", self.name, self.user, self.host)
    }
}

impl Target {
    /// The remote-shell invocation prefix for this target. Everything after
    /// `--` is the command to execute.
    pub fn ssh_prefix(&self) -> Vec<String> {
        let mut prefix = vec![
            "ssh".to_string(),
            "-o".to_string(),
            "StrictHostKeyChecking=no".to_string(),
        ];
        if let Some(key) = &self.ssh_key {
            prefix.push("-i".to_string());
            prefix.push(key.display().to_string());
        }
        if self.port != 22 {
            prefix.push("-p".to_string());
            prefix.push(self.port.to_string());
        }
        prefix.push(format!("{}@{}", self.user, self.host));
        prefix.push("--".to_string());
        prefix
    }

    /// Execution context wrapping commands in this target's ssh invocation.
    pub fn context(&self) -> ExecutionContext {
        ExecutionContext::Wrapped {
            prefix: self.ssh_prefix(),
        }
    }

    /// Run a command on this target to completion.
    pub async fn run(
        &self,
        command: &str,
        input: Option<String>,
        timeout: Option<Duration>,
    ) -> Result<ExecResult, ExecError> {
        run(&self.context(), command, input, timeout).await
    }

    /// Run a command on this target, streaming its output events.
    pub async fn run_stream(
        &self,
        command: &str,
        input: Option<String>,
    ) -> Result<EventStream, ExecError> {
        run_stream(&self.context(), command, input).await
    }

    /// Start a command in a detached tmux session on the target, piping
    /// its output to a log file there.
    pub async fn run_detached(
        &self,
        command: &str,
        session: &str,
        log: &str,
    ) -> Result<ExecResult, ExecError> {
        self.run(&detached_command(command, session, log), None, None)
            .await
    }

    /// Kill a detached session previously started with [`run_detached`].
    ///
    /// [`run_detached`]: Target::run_detached
    pub async fn kill_detached(&self, session: &str) -> Result<ExecResult, ExecError> {
        self.run(&format!("tmux kill-session -t {session}"), None, None)
            .await
    }

    /// Upload a local path to the target via `scp -r`.
    pub async fn upload(
        &self,
        local_path: &str,
        remote_path: &str,
    ) -> Result<(), transfer::TransferError> {
        transfer::upload(self, local_path, remote_path).await
    }

    /// Download a remote path from the target via `scp -r`.
    pub async fn download(
        &self,
        remote_path: &str,
        local_path: &str,
    ) -> Result<(), transfer::TransferError> {
        transfer::download(self, remote_path, local_path).await
    }
}

fn detached_command(command: &str, session: &str, log: &str) -> String {
    format!("tmux new -s {session} -d '{command}' \\; pipe-pane 'cat > {log}'")
}
