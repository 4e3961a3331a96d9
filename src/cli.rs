// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Command-line arguments for `fleetrun`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "fleetrun",
    version,
    about = "Run commands across a fleet of remote machines.",
    long_about = None
)]
pub struct CliArgs {
    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `FLEETRUN_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL", global = true)]
    pub log_level: Option<LogLevel>,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Clone, Subcommand)]
pub enum CliCommand {
    /// Run a command on every target of a group.
    Run(RunArgs),

    /// List configured groups.
    Ls,

    /// Print a group file.
    Cat {
        /// Group name.
        group: String,
    },

    /// Delete a group file.
    Rm {
        /// Group name.
        group: String,
    },
}

#[derive(Debug, Clone, Args)]
pub struct RunArgs {
    /// Group to run against (a file under the groups directory).
    pub group: String,

    /// Narrow the group to targets whose name contains this substring.
    ///
    /// May be given multiple times; each selector must match exactly one
    /// target.
    #[arg(short = 't', long = "target", value_name = "NAME")]
    pub targets: Vec<String>,

    /// Per-target timeout in seconds.
    #[arg(long, value_name = "SECS", default_value_t = 60)]
    pub timeout: u64,

    /// Maximum number of targets executing at once.
    ///
    /// Defaults to the size of the target set (fully parallel).
    #[arg(long, value_name = "N")]
    pub concurrency: Option<usize>,

    /// Abort all still-running targets as soon as one target fails.
    #[arg(long)]
    pub fail_fast: bool,

    /// Directory for per-target output files
    /// (`<name>.stdout`, `<name>.stderr`, `<name>.exitcode`).
    #[arg(long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// File whose contents are written to each command's stdin.
    #[arg(long, value_name = "FILE")]
    pub script: Option<PathBuf>,

    /// Command to execute, after `--`.
    ///
    /// A single argument is used verbatim; multiple arguments are joined
    /// into one shell-safe command string.
    #[arg(required = true, last = true, value_name = "CMD")]
    pub command: Vec<String>,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
