// tests/store_roundtrip.rs

use std::fs;
use std::io::Write;

use chrono::{TimeZone, Utc};
use tempfile::TempDir;

use questgate::score::{HistoryEntry, JsonFileStore, ScoreState, ScoreStore};

fn sample_state() -> ScoreState {
    ScoreState {
        total_xp: 1300,
        missions_completed: 5,
        level: 2,
        achievements: vec![
            "First Mission".to_string(),
            "Code Quality Master".to_string(),
        ],
        history: vec![
            HistoryEntry {
                timestamp: Utc.with_ymd_and_hms(2026, 8, 1, 12, 0, 0).unwrap(),
                mission: "Lint Check".to_string(),
                xp_earned: 100,
                details: "Code quality check passed".to_string(),
            },
            HistoryEntry {
                timestamp: Utc.with_ymd_and_hms(2026, 8, 1, 12, 5, 0).unwrap(),
                mission: "Build Check".to_string(),
                xp_earned: 200,
                details: "Production build successful".to_string(),
            },
        ],
    }
}

#[test]
fn save_then_load_yields_equal_state() {
    let dir = TempDir::new().unwrap();
    let store = JsonFileStore::new(dir.path().join("game-scores.json"));

    let state = sample_state();
    store.save(&state).unwrap();

    let loaded = store.load().unwrap().expect("state present");
    assert_eq!(loaded, state);

    // Field-level checks the equality above could mask if derives change.
    assert_eq!(loaded.achievements, state.achievements);
    assert_eq!(loaded.history, state.history);
}

#[test]
fn missing_file_loads_as_none() {
    let dir = TempDir::new().unwrap();
    let store = JsonFileStore::new(dir.path().join("game-scores.json"));

    assert!(store.load().unwrap().is_none());
}

#[test]
fn corrupt_file_starts_fresh_instead_of_erroring() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("game-scores.json");
    let mut file = fs::File::create(&path).unwrap();
    write!(file, "{{ not json").unwrap();

    let store = JsonFileStore::new(&path);
    assert!(store.load().unwrap().is_none());
}

#[test]
fn save_overwrites_previous_state_in_full() {
    let dir = TempDir::new().unwrap();
    let store = JsonFileStore::new(dir.path().join("game-scores.json"));

    store.save(&sample_state()).unwrap();

    let mut second = sample_state();
    second.total_xp = 9999;
    second.history.clear();
    second.missions_completed = 0;
    store.save(&second).unwrap();

    let loaded = store.load().unwrap().unwrap();
    assert_eq!(loaded, second);

    // No temp file left behind from the atomic write.
    let leftovers: Vec<_> = fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name())
        .collect();
    assert_eq!(leftovers, vec![std::ffi::OsString::from("game-scores.json")]);
}

#[test]
fn persisted_document_uses_the_documented_field_names() {
    let dir = TempDir::new().unwrap();
    let store = JsonFileStore::new(dir.path().join("game-scores.json"));
    store.save(&sample_state()).unwrap();

    let text = fs::read_to_string(store.path()).unwrap();
    let doc: serde_json::Value = serde_json::from_str(&text).unwrap();

    assert_eq!(doc["total_xp"], 1300);
    assert_eq!(doc["missions_completed"], 5);
    assert_eq!(doc["level"], 2);
    assert_eq!(doc["achievements"][0], "First Mission");
    assert_eq!(doc["history"][0]["mission"], "Lint Check");
    assert_eq!(doc["history"][0]["xp_earned"], 100);
    // Timestamps serialize as ISO-8601 / RFC 3339.
    let ts = doc["history"][0]["timestamp"].as_str().unwrap();
    assert!(ts.starts_with("2026-08-01T12:00:00"));
}
