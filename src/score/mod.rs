// src/score/mod.rs

//! Gamified progression ledger.
//!
//! Completed validations become missions; missions earn XP; XP derives a
//! level; cumulative progress unlocks one-time achievements. The mutation
//! logic lives in [`ledger`] and is pure over an injected [`store`], so it
//! tests without a filesystem.

pub mod achievements;
pub mod ledger;
pub mod state;
pub mod store;

pub use achievements::{Achievement, CATALOG};
pub use ledger::{LedgerEvent, MissionOutcome, ScoreLedger};
pub use state::{HistoryEntry, ScoreState, level_for_xp};
pub use store::{JsonFileStore, ScoreStore};
