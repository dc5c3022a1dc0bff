// src/score/store.rs

use std::fmt::Debug;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::warn;

use crate::score::state::ScoreState;

/// Abstract backing store for the score state.
///
/// `load` returns `None` when no state has been persisted yet; `save`
/// rewrites the full state in place.
pub trait ScoreStore: Send + Debug {
    fn load(&self) -> Result<Option<ScoreState>>;
    fn save(&self, state: &ScoreState) -> Result<()>;
}

/// JSON file store: one UTF-8 JSON object, rewritten in full on every save.
///
/// The write goes through a sibling temp file plus rename, so a crash
/// mid-save leaves the previous state intact.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ScoreStore for JsonFileStore {
    fn load(&self) -> Result<Option<ScoreState>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let contents = fs::read_to_string(&self.path)
            .with_context(|| format!("reading score file {:?}", self.path))?;

        match serde_json::from_str(&contents) {
            Ok(state) => Ok(Some(state)),
            Err(err) => {
                // An unreadable score file starts the ledger fresh; the next
                // save overwrites it.
                warn!(
                    path = %self.path.display(),
                    error = %err,
                    "score file is not valid JSON; starting fresh"
                );
                Ok(None)
            }
        }
    }

    fn save(&self, state: &ScoreState) -> Result<()> {
        let contents = serde_json::to_string_pretty(state).context("serializing score state")?;

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).with_context(|| format!("creating dir {:?}", parent))?;
        }

        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, contents).with_context(|| format!("writing score file {:?}", tmp))?;
        fs::rename(&tmp, &self.path)
            .with_context(|| format!("replacing score file {:?}", self.path))?;
        Ok(())
    }
}
