//! Browser tests for the `localStorage` store and the JS facade.
#![cfg(target_arch = "wasm32")]

use footle_game::{DailySession, GameMode, GameStore, KeyValueStore, ProgressStatus};
use footle_web::{FootleApp, LocalStore, dom};
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

fn clear_storage() {
    dom::local_storage().expect("localStorage").clear().expect("clear");
}

#[wasm_bindgen_test]
fn local_store_round_trips() {
    clear_storage();
    let store = LocalStore;
    store.set_item("footle:lastDate", "2025-05-01").expect("write");
    store.set_item("other:key", "x").expect("write");
    assert_eq!(store.get_item("footle:lastDate").as_deref(), Some("2025-05-01"));
    let mut keys = store.keys();
    keys.sort();
    assert_eq!(keys, vec!["footle:lastDate".to_string(), "other:key".to_string()]);
    store.remove_item("other:key");
    assert_eq!(store.get_item("other:key"), None);
}

#[wasm_bindgen_test]
fn progress_survives_a_reopen() {
    clear_storage();
    let now = chrono::Utc::now();
    let mut daily = DailySession::open(GameStore::new(LocalStore, "footle"), now);
    daily.set_progress(GameMode::Pixel, ProgressStatus::Solved);

    let reopened = DailySession::open(GameStore::new(LocalStore, "footle"), now);
    assert_eq!(reopened.status(GameMode::Pixel), ProgressStatus::Solved);
    assert_eq!(reopened.completion_percent(), 33);
}

#[wasm_bindgen_test]
fn facade_reports_progress_and_rejects_unknown_modes() {
    clear_storage();
    let app = FootleApp::open();
    assert!(app.progress().is_ok());
    assert!(app.rows("emoji".to_string()).is_err());
    assert!(app.reveal_hint("silhouette".to_string(), "shirt".to_string()).is_err());
    assert_eq!(app.share("classic".to_string()).ok().flatten(), None);
    assert!(app.emergency_reset() >= 1);
}
