// src/engine/core.rs

//! Pure core runtime state machine.
//!
//! This module contains a synchronous, deterministic core that consumes
//! [`RuntimeEvent`]s and produces:
//! - an updated core state
//! - a list of "commands" describing what the IO shell should do next
//!
//! The async/IO-heavy shell (`engine::runtime::Runtime`) is responsible for:
//! - reading events from channels
//! - sending steps to the executor
//! - mutating the score ledger and notifying sinks
//! - handling Ctrl+C / shutdown
//!
//! The core is intended to be extensively unit tested without any Tokio,
//! channels, filesystem, or processes.

use std::collections::BTreeMap;

use tracing::{debug, warn};

use crate::engine::queue::StepQueue;
use crate::engine::{CoreCommand, CoreStep, RunPhase, RuntimeEvent, RuntimeOptions};
use crate::types::{StepId, StepReport, StepSpec};

/// Pure core runtime state.
///
/// This owns:
/// - the catalog of resolved step specs
/// - the FIFO queue of the current run
/// - the run phase and all collected reports
///
/// It has **no** channels, no Tokio types, and does not perform any IO.
#[derive(Debug)]
pub struct CoreRuntime {
    specs: BTreeMap<StepId, StepSpec>,
    queue: StepQueue,
    phase: RunPhase,
    reports: Vec<StepReport>,
    options: RuntimeOptions,
}

impl CoreRuntime {
    pub fn new(specs: BTreeMap<StepId, StepSpec>, options: RuntimeOptions) -> Self {
        Self {
            specs,
            queue: StepQueue::new(),
            phase: RunPhase::Idle,
            reports: Vec::new(),
            options,
        }
    }

    pub fn phase(&self) -> RunPhase {
        self.phase
    }

    pub fn reports(&self) -> &[StepReport] {
        &self.reports
    }

    /// Logical AND over all collected reports. This is the only aggregate
    /// external automation should rely on.
    pub fn aggregate_success(&self) -> bool {
        self.reports.iter().all(StepReport::is_success)
    }

    /// Expose queue emptiness (for tests).
    pub fn queue_is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Handle a single runtime event, updating core state and returning the
    /// resulting commands for the IO shell.
    pub fn step(&mut self, event: RuntimeEvent) -> CoreStep {
        match event {
            RuntimeEvent::StepsRequested { steps } => self.handle_request(steps),
            RuntimeEvent::StepCompleted { report } => self.handle_completion(report),
            RuntimeEvent::ShutdownRequested => CoreStep {
                commands: Vec::new(),
                keep_running: false,
            },
        }
    }

    /// Start a new run from the requested step ids.
    ///
    /// A request while a run is active is dropped: callers are expected not
    /// to re-trigger a step that is already in flight, and the engine only
    /// warns about it rather than queuing a second run.
    fn handle_request(&mut self, steps: Vec<StepId>) -> CoreStep {
        if let RunPhase::Running(current) = self.phase {
            warn!(%current, requested = ?steps, "run already active; ignoring request");
            return CoreStep {
                commands: Vec::new(),
                keep_running: true,
            };
        }

        for id in steps {
            match self.specs.get(&id) {
                Some(spec) => self.queue.enqueue(spec.clone()),
                None => warn!(step = %id, "no spec for requested step; skipping"),
            }
        }

        let mut commands = Vec::new();
        match self.queue.pop_next() {
            Some(spec) => {
                self.phase = RunPhase::Running(spec.id);
                commands.push(CoreCommand::DispatchStep(spec));
            }
            None => {
                self.phase = RunPhase::Completed;
                if self.options.exit_when_idle {
                    commands.push(CoreCommand::RequestExit);
                    return CoreStep {
                        commands,
                        keep_running: false,
                    };
                }
            }
        }

        CoreStep {
            commands,
            keep_running: true,
        }
    }

    /// Record a completed step and decide what happens next:
    ///
    /// - success with xp > 0 records a mission on the ledger;
    /// - failure of a critical step clears the queue and halts the run;
    /// - otherwise the next queued step is dispatched, and the run completes
    ///   when the queue drains.
    fn handle_completion(&mut self, report: StepReport) -> CoreStep {
        let mut commands = Vec::new();

        // A completion from an abandoned worker (e.g. after a halt) must not
        // restart the queue or overwrite a terminal phase.
        if !matches!(self.phase, RunPhase::Running(_)) {
            warn!(step = %report.id, phase = ?self.phase, "completion outside an active run");
            self.reports.push(report);
            return CoreStep {
                commands,
                keep_running: true,
            };
        }

        let spec = match self.specs.get(&report.id) {
            Some(spec) => spec.clone(),
            None => {
                // Completion for an unknown step; record it but treat it as
                // non-critical with no mission.
                warn!(step = %report.id, "completion for step with no spec");
                self.reports.push(report);
                return CoreStep {
                    commands,
                    keep_running: true,
                };
            }
        };

        debug!(
            step = %report.id,
            status = ?report.status,
            duration_secs = report.duration_secs,
            "step completed"
        );

        let success = report.is_success();
        let duration_secs = report.duration_secs;
        self.reports.push(report);

        if success && spec.xp > 0 {
            commands.push(CoreCommand::RecordMission {
                xp: spec.xp,
                mission: spec.id.label().to_string(),
                details: format!("{} passed in {:.2}s", spec.id.label(), duration_secs),
            });
        }

        if !success && spec.critical {
            warn!(step = %spec.id, "critical step failed; halting run");
            self.queue.clear();
            self.phase = RunPhase::Halted;
            return self.finish_run(commands);
        }

        match self.queue.pop_next() {
            Some(next) => {
                self.phase = RunPhase::Running(next.id);
                commands.push(CoreCommand::DispatchStep(next));
                CoreStep {
                    commands,
                    keep_running: true,
                }
            }
            None => {
                self.phase = RunPhase::Completed;
                self.finish_run(commands)
            }
        }
    }

    /// Common tail for a run reaching a terminal phase.
    fn finish_run(&mut self, mut commands: Vec<CoreCommand>) -> CoreStep {
        if self.options.exit_when_idle {
            commands.push(CoreCommand::RequestExit);
            CoreStep {
                commands,
                keep_running: false,
            }
        } else {
            CoreStep {
                commands,
                keep_running: true,
            }
        }
    }
}
