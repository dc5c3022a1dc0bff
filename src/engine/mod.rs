// src/engine/mod.rs

//! Orchestration engine for questgate.
//!
//! This module ties together:
//! - the FIFO step queue
//! - the phase machine deciding what runs next and when a run halts
//! - the main runtime event loop that reacts to:
//!   - run requests (single step or the whole pipeline)
//!   - step completion reports from the executor
//!   - shutdown signals
//!
//! The pure core state machine lives in [`core`]; the async/IO shell is
//! implemented in [`runtime`].

use crate::types::{StepId, StepReport, StepSpec};

/// Phase of the current run.
///
/// `Halted` (a critical step failed; the rest of the queue was dropped) and
/// `Completed` are terminal for a run; a new `StepsRequested` event starts a
/// fresh run from either.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPhase {
    Idle,
    Running(StepId),
    Halted,
    Completed,
}

/// Runtime options used by both the core and the async shell.
#[derive(Debug, Clone, Copy)]
pub struct RuntimeOptions {
    /// If true, exit the runtime once the run completes or halts (batch
    /// mode). Embedding hosts leave this false and keep sending requests.
    pub exit_when_idle: bool,
}

/// Events flowing into the runtime from the CLI, executor and signals.
#[derive(Debug, Clone)]
pub enum RuntimeEvent {
    /// Run the given steps in order. A single id is the on-demand
    /// `run_one` form; the full pipeline is `run_all`.
    StepsRequested { steps: Vec<StepId> },
    /// The executor finished one step, successfully or not.
    StepCompleted { report: StepReport },
    /// Graceful shutdown requested (e.g. Ctrl-C).
    ShutdownRequested,
}

/// Command produced by the pure core, to be executed by the outer IO shell.
#[derive(Debug, Clone)]
pub enum CoreCommand {
    /// Send this step to the executor.
    DispatchStep(StepSpec),
    /// Record a completed mission on the score ledger.
    RecordMission {
        xp: u64,
        mission: String,
        details: String,
    },
    /// Request that the process exits (batch mode, run finished).
    RequestExit,
}

/// Decision returned by the core after handling a single `RuntimeEvent`.
#[derive(Debug, Clone)]
pub struct CoreStep {
    /// Commands the IO shell should execute.
    pub commands: Vec<CoreCommand>,
    /// Whether the outer runtime loop should keep running.
    pub keep_running: bool,
}

pub mod core;
pub mod queue;
pub mod runtime;

pub use self::core::CoreRuntime;
pub use self::queue::StepQueue;
pub use self::runtime::{RunSummary, Runtime};
