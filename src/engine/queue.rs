// src/engine/queue.rs

use std::collections::VecDeque;

use tracing::debug;

use crate::types::StepSpec;

/// FIFO queue of step specifications awaiting execution.
///
/// Mutated only by the core runtime: the shell never touches queue state.
/// There is no priority or coalescing; steps run strictly in the order they
/// were enqueued, one at a time.
#[derive(Debug, Default)]
pub struct StepQueue {
    specs: VecDeque<StepSpec>,
}

impl StepQueue {
    pub fn new() -> Self {
        Self {
            specs: VecDeque::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn enqueue(&mut self, spec: StepSpec) {
        debug!(step = %spec.id, "enqueued step");
        self.specs.push_back(spec);
    }

    /// Dequeue the next step to run.
    pub fn pop_next(&mut self) -> Option<StepSpec> {
        self.specs.pop_front()
    }

    /// Drop all pending steps (critical failure halted the run).
    pub fn clear(&mut self) {
        if !self.specs.is_empty() {
            debug!(dropped = self.specs.len(), "cleared pending steps");
        }
        self.specs.clear();
    }
}
