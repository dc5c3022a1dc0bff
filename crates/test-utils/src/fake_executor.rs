use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use tokio::sync::mpsc;

use questgate::engine::RuntimeEvent;
use questgate::errors::Result;
use questgate::exec::ExecutorBackend;
use questgate::types::{StepId, StepReport, StepSpec, StepStatus};

/// A fake executor that:
/// - records which steps were "run"
/// - immediately reports a canned `StepCompleted` for each dispatched step
///   (Success unless an outcome override says otherwise).
pub struct FakeExecutor {
    runtime_tx: mpsc::Sender<RuntimeEvent>,
    executed: Arc<Mutex<Vec<StepId>>>,
    outcomes: HashMap<StepId, StepStatus>,
}

impl FakeExecutor {
    pub fn new(
        runtime_tx: mpsc::Sender<RuntimeEvent>,
        executed: Arc<Mutex<Vec<StepId>>>,
    ) -> Self {
        Self {
            runtime_tx,
            executed,
            outcomes: HashMap::new(),
        }
    }

    /// Make the given step report the given status instead of Success.
    pub fn with_outcome(mut self, id: StepId, status: StepStatus) -> Self {
        self.outcomes.insert(id, status);
        self
    }
}

impl ExecutorBackend for FakeExecutor {
    fn dispatch(
        &mut self,
        spec: StepSpec,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        let tx = self.runtime_tx.clone();
        let executed = Arc::clone(&self.executed);
        let status = self
            .outcomes
            .get(&spec.id)
            .copied()
            .unwrap_or(StepStatus::Success);

        Box::pin(async move {
            {
                let mut guard = executed.lock().unwrap();
                guard.push(spec.id);
            }

            let stderr = if status.is_success() {
                String::new()
            } else {
                format!("{} failed", spec.id)
            };
            let report = StepReport::new(spec.id, status, 0.01, String::new(), stderr);

            tx.send(RuntimeEvent::StepCompleted { report })
                .await
                .map_err(anyhow::Error::from)?;
            Ok(())
        })
    }
}
