// src/types.rs

//! Shared value types: step identities, specs, and reports.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use chrono::{DateTime, Utc};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Identity of a pipeline step. The set is closed: the pipeline always
/// consists of the dependency pre-flight plus the three validation gates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, ValueEnum)]
pub enum StepId {
    /// Dependency installation pre-flight. Critical by default.
    Deps,
    Lint,
    #[value(name = "typecheck")]
    TypeCheck,
    Build,
}

impl StepId {
    /// All steps in pipeline order.
    pub const ALL: [StepId; 4] = [StepId::Deps, StepId::Lint, StepId::TypeCheck, StepId::Build];

    /// Stable key used in config tables and logs.
    pub fn key(self) -> &'static str {
        match self {
            StepId::Deps => "deps",
            StepId::Lint => "lint",
            StepId::TypeCheck => "typecheck",
            StepId::Build => "build",
        }
    }

    /// Human-readable name, also used as the mission name in the ledger.
    pub fn label(self) -> &'static str {
        match self {
            StepId::Deps => "Dependency Install",
            StepId::Lint => "Lint Check",
            StepId::TypeCheck => "Type Check",
            StepId::Build => "Build Check",
        }
    }
}

impl fmt::Display for StepId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for StepId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "deps" => Ok(StepId::Deps),
            "lint" => Ok(StepId::Lint),
            "typecheck" => Ok(StepId::TypeCheck),
            "build" => Ok(StepId::Build),
            other => Err(format!(
                "unknown step '{other}' (expected \"deps\", \"lint\", \"typecheck\" or \"build\")"
            )),
        }
    }
}

/// Outcome classification of a step execution.
///
/// The runner only ever produces `Success` or `Failure`; `Warning` is part
/// of the reporting vocabulary for presentation sinks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepStatus {
    Success,
    Failure,
    Warning,
}

impl StepStatus {
    pub fn is_success(self) -> bool {
        matches!(self, StepStatus::Success)
    }
}

/// Everything the executor needs to run one step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepSpec {
    pub id: StepId,
    /// Opaque shell command string; the core never interprets it.
    pub cmd: String,
    pub timeout: Duration,
    /// A critical step halts the remaining queue on failure.
    pub critical: bool,
    /// XP recorded in the ledger when the step succeeds. Zero means the
    /// step never records a mission (the deps pre-flight).
    pub xp: u64,
}

/// Immutable record of one step execution.
#[derive(Debug, Clone, PartialEq)]
pub struct StepReport {
    pub id: StepId,
    pub status: StepStatus,
    /// Wall-clock seconds from dispatch to completion or timeout expiry.
    pub duration_secs: f64,
    pub stdout: String,
    /// Captured stderr for failed commands; for timeouts and spawn errors
    /// this carries the synthetic error text instead.
    pub stderr: String,
    pub timestamp: DateTime<Utc>,
}

impl StepReport {
    pub fn new(
        id: StepId,
        status: StepStatus,
        duration_secs: f64,
        stdout: String,
        stderr: String,
    ) -> Self {
        Self {
            id,
            status,
            duration_secs,
            stdout,
            stderr,
            timestamp: Utc::now(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }
}
