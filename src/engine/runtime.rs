// src/engine/runtime.rs

use std::fmt;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::errors::Result;
use crate::exec::ExecutorBackend;
use crate::report::ResultSink;
use crate::score::ScoreLedger;
use crate::types::StepReport;

use super::core::CoreRuntime;
use super::{CoreCommand, RunPhase, RuntimeEvent};

/// Outcome of a runtime session, as seen by the caller.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub reports: Vec<StepReport>,
    /// Logical AND over all collected reports' success.
    pub success: bool,
    /// True when a critical step failure cut the run short.
    pub halted: bool,
}

/// Drives the step pipeline in response to `RuntimeEvent`s and delegates
/// actual command execution to an `ExecutorBackend`.
///
/// This is a pure IO shell around `CoreRuntime`, which contains all the
/// orchestration semantics. The shell owns the score ledger and the
/// presentation sink, so every piece of shared state is mutated from this
/// single event loop; executor workers only ever send events back.
pub struct Runtime<E: ExecutorBackend> {
    core: CoreRuntime,
    event_rx: mpsc::Receiver<RuntimeEvent>,
    executor: E,
    ledger: Option<ScoreLedger>,
    sink: Box<dyn ResultSink>,
}

impl<E: ExecutorBackend> fmt::Debug for Runtime<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Runtime")
            .field("core", &self.core)
            .finish_non_exhaustive()
    }
}

impl<E: ExecutorBackend> Runtime<E> {
    pub fn new(
        core: CoreRuntime,
        event_rx: mpsc::Receiver<RuntimeEvent>,
        executor: E,
        ledger: Option<ScoreLedger>,
        sink: Box<dyn ResultSink>,
    ) -> Self {
        Self {
            core,
            event_rx,
            executor,
            ledger,
            sink,
        }
    }

    /// Main event loop.
    ///
    /// - Consumes `RuntimeEvent`s from `event_rx`.
    /// - Feeds them into the core runtime.
    /// - Executes commands returned by the core (dispatch step, record
    ///   mission, exit).
    pub async fn run(mut self) -> Result<RunSummary> {
        info!("questgate runtime started");

        loop {
            let event = match self.event_rx.recv().await {
                Some(e) => e,
                None => {
                    info!("runtime event channel closed; exiting");
                    break;
                }
            };

            debug!(?event, "runtime received event");

            if let RuntimeEvent::StepCompleted { report } = &event {
                self.sink.step_finished(report);
            }

            // Feed the event into the pure core and get commands back.
            let step = self.core.step(event);

            // Execute the commands.
            for command in step.commands {
                self.execute_command(command).await?;
            }

            // If the core says to stop, break out of the loop.
            if !step.keep_running {
                info!("core requested exit; stopping runtime");
                break;
            }
        }

        let summary = RunSummary {
            reports: self.core.reports().to_vec(),
            success: self.core.aggregate_success(),
            halted: self.core.phase() == RunPhase::Halted,
        };
        self.sink.run_finished(&summary);

        info!(success = summary.success, halted = summary.halted, "runtime exiting");
        Ok(summary)
    }

    /// Execute a single command from the core.
    async fn execute_command(&mut self, command: CoreCommand) -> Result<()> {
        match command {
            CoreCommand::DispatchStep(spec) => {
                debug!(step = %spec.id, cmd = %spec.cmd, "dispatching step");
                self.sink.step_started(&spec);
                self.executor.dispatch(spec).await?;
            }
            CoreCommand::RecordMission { xp, mission, details } => {
                self.record_mission(xp, &mission, &details);
            }
            CoreCommand::RequestExit => {
                // The core already returns keep_running=false in this case,
                // so this command is informational.
                info!("core issued RequestExit command");
            }
        }
        Ok(())
    }

    fn record_mission(&mut self, xp: u64, mission: &str, details: &str) {
        let Some(ledger) = self.ledger.as_mut() else {
            debug!(mission, "scoring disabled; mission not recorded");
            return;
        };

        let outcome = ledger.record_mission(xp, mission, details);
        for event in &outcome.events {
            self.sink.ledger_event(event);
        }
        if let Some(err) = outcome.persist_error {
            // Non-fatal: the in-memory state keeps the mutation and the
            // process continues with it.
            warn!(error = %err, "failed to persist score state");
        }
    }
}
