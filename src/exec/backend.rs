// src/exec/backend.rs

//! Pluggable executor backend abstraction.
//!
//! The runtime talks to an `ExecutorBackend` instead of a raw mpsc sender.
//! This makes it easy to swap in a fake executor in tests while keeping the
//! production executor implementation in [`runner`].
//!
//! - `RealExecutorBackend` is the default implementation. It wraps the
//!   executor loop from [`spawn_executor`] and forwards dispatched steps
//!   over an mpsc channel.
//! - Tests can provide their own `ExecutorBackend` that records which steps
//!   were dispatched and directly emits `StepCompleted` events.

use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;

use tokio::sync::mpsc;

use crate::engine::RuntimeEvent;
use crate::errors::{Error, Result};
use crate::types::StepSpec;

use super::runner::spawn_executor;

/// Trait abstracting how dispatched steps are executed.
///
/// Production code uses [`RealExecutorBackend`]; tests can provide their own
/// implementation that doesn't spawn real processes.
pub trait ExecutorBackend: Send {
    /// Dispatch one step for execution.
    ///
    /// The implementation is free to:
    /// - spawn an OS process (production)
    /// - simulate completion and emit `RuntimeEvent`s (tests)
    fn dispatch(
        &mut self,
        spec: StepSpec,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>>;
}

/// Real executor backend used in production.
///
/// Internally, this wraps the executor loop in [`spawn_executor`]. The
/// runtime calls `dispatch`, which forwards the spec to the background loop
/// via an mpsc channel; the loop runs one process at a time.
pub struct RealExecutorBackend {
    tx: mpsc::Sender<StepSpec>,
}

impl RealExecutorBackend {
    /// Create a new real executor backend, wiring it to the given runtime
    /// event sender. Steps execute with the working directory set to
    /// `project_root`.
    ///
    /// This spawns the background executor loop immediately.
    pub fn new(runtime_tx: mpsc::Sender<RuntimeEvent>, project_root: PathBuf) -> Self {
        let tx = spawn_executor(runtime_tx, project_root);
        Self { tx }
    }
}

impl ExecutorBackend for RealExecutorBackend {
    fn dispatch(
        &mut self,
        spec: StepSpec,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        // Clone the sender so the future doesn't borrow `self` across `await`.
        let tx = self.tx.clone();

        Box::pin(async move {
            tx.send(spec).await.map_err(Error::from)?;
            Ok(())
        })
    }
}
