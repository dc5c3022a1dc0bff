// src/score/ledger.rs

use chrono::Utc;
use tracing::{debug, info};

use crate::score::achievements::CATALOG;
use crate::score::state::{HistoryEntry, ScoreState, level_for_xp};
use crate::score::store::ScoreStore;

/// Informational event emitted by a mission record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LedgerEvent {
    LevelUp { level: u64 },
    AchievementUnlocked { id: String, reward: u64 },
}

/// Result of one `record_mission` call.
///
/// A persistence error does not roll anything back: the in-memory state
/// keeps the mutation and the process continues with it. The error is
/// surfaced here for the caller to log.
#[derive(Debug)]
pub struct MissionOutcome {
    pub events: Vec<LedgerEvent>,
    pub persist_error: Option<anyhow::Error>,
}

/// Persistent state machine mapping completed missions to XP, level and
/// achievements.
///
/// The backing store is injected, so the mutation logic here is pure and
/// testable without a filesystem. The store is a single object with no
/// multi-writer coordination; concurrent writers must be serialized by the
/// caller.
#[derive(Debug)]
pub struct ScoreLedger {
    state: ScoreState,
    store: Box<dyn ScoreStore>,
}

impl ScoreLedger {
    /// Load existing state from the store, or start fresh if there is none.
    pub fn open(store: Box<dyn ScoreStore>) -> anyhow::Result<Self> {
        let state = store.load()?.unwrap_or_default();
        debug!(
            total_xp = state.total_xp,
            level = state.level,
            missions = state.missions_completed,
            "score ledger opened"
        );
        Ok(Self { state, store })
    }

    pub fn state(&self) -> &ScoreState {
        &self.state
    }

    /// Record one completed mission.
    ///
    /// 1. Credit the XP, bump the mission count, append the history entry.
    /// 2. Recompute the level; an increase emits a `LevelUp` event.
    /// 3. Scan the achievement catalog in order; every newly satisfied
    ///    entry is added (id + XP reward) and emits `AchievementUnlocked`.
    ///    Rewards granted here are visible to later predicates in the same
    ///    scan but do NOT re-enter the level computation of step 2 — a
    ///    reward crossing a level boundary shows up in `level` on the next
    ///    call.
    /// 4. Persist the full state (overwrite). A save failure is non-fatal
    ///    and reported via `MissionOutcome::persist_error`.
    pub fn record_mission(&mut self, xp: u64, mission: &str, details: &str) -> MissionOutcome {
        let mut events = Vec::new();

        self.state.total_xp += xp;
        self.state.missions_completed += 1;
        self.state.history.push(HistoryEntry {
            timestamp: Utc::now(),
            mission: mission.to_string(),
            xp_earned: xp,
            details: details.to_string(),
        });

        let new_level = level_for_xp(self.state.total_xp);
        if new_level > self.state.level {
            info!(level = new_level, "level up");
            events.push(LedgerEvent::LevelUp { level: new_level });
        }
        self.state.level = new_level;

        for achievement in CATALOG.iter() {
            if self.state.has_achievement(achievement.id) {
                continue;
            }
            if achievement.unlocked_by(&self.state) {
                info!(id = achievement.id, reward = achievement.reward, "achievement unlocked");
                self.state.achievements.push(achievement.id.to_string());
                self.state.total_xp += achievement.reward;
                events.push(LedgerEvent::AchievementUnlocked {
                    id: achievement.id.to_string(),
                    reward: achievement.reward,
                });
            }
        }

        let persist_error = self.store.save(&self.state).err();

        MissionOutcome {
            events,
            persist_error,
        }
    }
}
