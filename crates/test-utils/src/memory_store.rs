use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use anyhow::{Result, anyhow};

use questgate::score::{ScoreState, ScoreStore};

/// In-memory score store for ledger tests.
///
/// Saves can be made to fail on demand, to exercise the non-fatal
/// persistence-failure path.
#[derive(Debug, Clone, Default)]
pub struct MemoryScoreStore {
    saved: Arc<Mutex<Option<ScoreState>>>,
    fail_saves: Arc<AtomicBool>,
}

impl MemoryScoreStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-seed the store with existing state.
    pub fn with_state(state: ScoreState) -> Self {
        let store = Self::default();
        *store.saved.lock().unwrap() = Some(state);
        store
    }

    /// All subsequent `save` calls fail while set.
    pub fn set_fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }

    /// Last successfully saved state, if any.
    pub fn saved(&self) -> Option<ScoreState> {
        self.saved.lock().unwrap().clone()
    }
}

impl ScoreStore for MemoryScoreStore {
    fn load(&self) -> Result<Option<ScoreState>> {
        Ok(self.saved.lock().unwrap().clone())
    }

    fn save(&self, state: &ScoreState) -> Result<()> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(anyhow!("simulated persistence failure"));
        }
        *self.saved.lock().unwrap() = Some(state.clone());
        Ok(())
    }
}
