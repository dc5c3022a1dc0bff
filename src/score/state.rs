// src/score/state.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Level derived from total XP: one level per 1000 XP, starting at 1.
pub fn level_for_xp(total_xp: u64) -> u64 {
    total_xp / 1000 + 1
}

/// One recorded mission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub timestamp: DateTime<Utc>,
    pub mission: String,
    pub xp_earned: u64,
    pub details: String,
}

/// Persistent progression state.
///
/// Invariants (upheld by `ScoreLedger`, checked in tests):
/// - `level == level_for_xp(total_xp)` after every mutation
/// - `missions_completed == history.len()`
/// - `achievements` holds unique ids in unlock order and only ever grows
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreState {
    pub total_xp: u64,
    pub missions_completed: u64,
    pub level: u64,
    pub achievements: Vec<String>,
    pub history: Vec<HistoryEntry>,
}

impl ScoreState {
    pub fn has_achievement(&self, id: &str) -> bool {
        self.achievements.iter().any(|a| a == id)
    }
}

impl Default for ScoreState {
    fn default() -> Self {
        Self {
            total_xp: 0,
            missions_completed: 0,
            level: 1,
            achievements: Vec::new(),
            history: Vec::new(),
        }
    }
}
