// src/lib.rs

pub mod cli;
pub mod config;
pub mod errors;
pub mod exec;
pub mod fleet;
pub mod logging;
pub mod remote;

use std::path::PathBuf;
use std::time::Duration;

use tracing::{debug, info};

use crate::cli::{CliArgs, CliCommand, RunArgs};
use crate::errors::{FleetrunError, Result};
use crate::exec::command::command_from_args;
use crate::fleet::{ErrorPolicy, ExecTarget, FleetExecutor, FleetOptions, summarize};

/// High-level entry point used by `main.rs`.
///
/// Dispatches the parsed CLI command and returns the process exit code:
/// 0 on success, 1 when any target failed or the run was aborted.
/// (Group-not-found is surfaced as an error and mapped to exit code 2 by
/// `main`.)
pub async fn run(args: CliArgs) -> Result<i32> {
    match args.command {
        CliCommand::Run(run_args) => run_fleet(run_args).await,
        CliCommand::Ls => {
            for name in config::loader::list_groups()? {
                println!("{name}");
            }
            Ok(0)
        }
        CliCommand::Cat { group } => {
            let path = config::loader::group_path(&group);
            if !path.is_file() {
                return Err(FleetrunError::GroupNotFound(group));
            }
            print!("{}", std::fs::read_to_string(path)?);
            Ok(0)
        }
        CliCommand::Rm { group } => {
            let path = config::loader::group_path(&group);
            if !path.is_file() {
                return Err(FleetrunError::GroupNotFound(group));
            }
            std::fs::remove_file(path)?;
            Ok(0)
        }
    }
}

async fn run_fleet(args: RunArgs) -> Result<i32> {
    let group = config::loader::load_group(&args.group)?;
    let targets = config::validate::resolve_targets(&group, &args.targets)?;

    let command = command_from_args(&args.command);
    let input = match &args.script {
        Some(path) => Some(std::fs::read_to_string(path)?),
        None => None,
    };

    let output_dir = args
        .output_dir
        .clone()
        .unwrap_or_else(|| default_output_dir(&args.group));
    std::fs::create_dir_all(&output_dir)?;

    let options = FleetOptions {
        timeout: Duration::from_secs(args.timeout),
        concurrency: args.concurrency,
        on_error: if args.fail_fast {
            ErrorPolicy::AbortAll
        } else {
            ErrorPolicy::Continue
        },
        output_dir: Some(output_dir),
    };

    info!(
        group = %args.group,
        targets = targets.len(),
        command = %command,
        "starting fleet run"
    );
    debug!(?options, "fleet options");

    let exec_targets: Vec<ExecTarget> = targets
        .iter()
        .map(|t| ExecTarget {
            name: t.name.clone(),
            context: t.context(),
        })
        .collect();

    let executor = FleetExecutor::new(options);
    let result = executor
        .execute(&exec_targets, &command, input.as_deref())
        .await;

    let (overall, report) = summarize(&result);
    println!("{report}");

    Ok(if overall { 0 } else { 1 })
}

/// Default persistence location for a group's output files.
fn default_output_dir(group: &str) -> PathBuf {
    std::env::temp_dir().join("fleetrun").join(group)
}
