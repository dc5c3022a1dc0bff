// src/cli.rs

//! CLI argument parsing using `clap`.

use clap::{Parser, ValueEnum};

use crate::types::StepId;

/// Command-line arguments for `questgate`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "questgate",
    version,
    about = "Run project quality gates and track your progress.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the config file (TOML).
    ///
    /// Default: `Questgate.toml` in the current working directory. A
    /// missing file is fine; the built-in pipeline is used instead.
    #[arg(long, value_name = "PATH", default_value = "Questgate.toml")]
    pub config: String,

    /// Project root to run the steps in.
    ///
    /// Overrides `[config].project_root`. When neither is set, questgate
    /// walks up from the current directory looking for `package.json`.
    #[arg(long, value_name = "PATH")]
    pub project_root: Option<String>,

    /// Run only the given step(s), in the given order. Repeatable.
    ///
    /// Without this flag the full pipeline runs: deps (pre-flight), lint,
    /// typecheck, build.
    #[arg(long, value_enum, value_name = "STEP")]
    pub step: Vec<StepId>,

    /// Disable the score ledger for this run.
    #[arg(long)]
    pub no_score: bool,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `QUESTGATE_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Print the resolved step plan without executing anything.
    #[arg(long)]
    pub dry_run: bool,
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
