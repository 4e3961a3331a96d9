// src/remote/transfer.rs

//! File transfer to and from targets via one-shot `scp` invocations.

use thiserror::Error;

use crate::exec::{ExecError, ExecutionContext, command, run};

use super::target::Target;

#[derive(Error, Debug)]
pub enum TransferError {
    #[error("upload failed: {0}")]
    Upload(String),

    #[error("download failed: {0}")]
    Download(String),

    #[error(transparent)]
    Exec(#[from] ExecError),
}

/// Copy a local path to the target.
pub async fn upload(
    target: &Target,
    local_path: &str,
    remote_path: &str,
) -> Result<(), TransferError> {
    let args = scp_args(target, local_path, &remote_ref(target, remote_path));
    let result = run(&ExecutionContext::Local, &command::normalize(&args), None, None).await?;
    if result.success() {
        Ok(())
    } else {
        Err(TransferError::Upload(result.stderr))
    }
}

/// Copy a remote path from the target to the local machine.
pub async fn download(
    target: &Target,
    remote_path: &str,
    local_path: &str,
) -> Result<(), TransferError> {
    let args = scp_args(target, &remote_ref(target, remote_path), local_path);
    let result = run(&ExecutionContext::Local, &command::normalize(&args), None, None).await?;
    if result.success() {
        Ok(())
    } else {
        Err(TransferError::Download(result.stderr))
    }
}

fn remote_ref(target: &Target, path: &str) -> String {
    format!("{}@{}:{}", target.user, target.host, path)
}

fn scp_args(target: &Target, from: &str, to: &str) -> Vec<String> {
    let mut args = vec![
        "scp".to_string(),
        "-o".to_string(),
        "StrictHostKeyChecking=no".to_string(),
    ];
    if let Some(key) = &target.ssh_key {
        args.push("-i".to_string());
        args.push(key.display().to_string());
    }
    if target.port != 22 {
        args.push("-P".to_string());
        args.push(target.port.to_string());
    }
    args.push("-r".to_string());
    args.push(from.to_string());
    args.push(to.to_string());
    args
}
