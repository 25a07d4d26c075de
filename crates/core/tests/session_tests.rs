//! Session lifecycle against an isolated session file.

use modelhub_core::{Config, SessionStore};
use tempfile::TempDir;

fn store(dir: &TempDir) -> SessionStore {
    SessionStore::new(dir.path().join("session.json"))
}

#[test]
fn open_get_close_round_trip() {
    let dir = TempDir::new().unwrap();
    let store = store(&dir);

    let opened = store.open("eos1ax2").unwrap();
    let loaded = store.get().unwrap().unwrap();
    assert_eq!(loaded.model_id, "eos1ax2");
    assert_eq!(loaded, opened);
    assert_eq!(store.current_model_id().unwrap().as_deref(), Some("eos1ax2"));

    store.close().unwrap();
    assert!(store.get().unwrap().is_none());
    assert!(!store.path().exists());
}

#[test]
fn never_opened_has_no_current_model() {
    let dir = TempDir::new().unwrap();
    assert_eq!(store(&dir).current_model_id().unwrap(), None);
}

#[test]
fn closed_session_has_no_current_model() {
    let dir = TempDir::new().unwrap();
    let store = store(&dir);
    store.open("eos3b5e").unwrap();
    store.close().unwrap();
    assert_eq!(store.current_model_id().unwrap(), None);
}

#[test]
fn second_open_replaces_first() {
    let dir = TempDir::new().unwrap();
    let store = store(&dir);

    store.open("eos1ax2").unwrap();
    let first = store.get().unwrap().unwrap();
    store.open("eos3b5e").unwrap();
    let second = store.get().unwrap().unwrap();

    assert_eq!(second.model_id, "eos3b5e");
    assert_ne!(first.identifier, second.identifier);
}

#[test]
fn session_survives_a_new_store_instance() {
    let dir = TempDir::new().unwrap();
    store(&dir).open("eos1ax2").unwrap();

    let reopened = store(&dir);
    assert_eq!(reopened.current_model_id().unwrap().as_deref(), Some("eos1ax2"));
}

#[test]
fn store_path_comes_from_config() {
    let dir = TempDir::new().unwrap();
    let mut config = Config::default();
    config.session.path = dir.path().join("state").join("active.json");

    let store = SessionStore::from_config(&config);
    store.open("eos9zzz").unwrap();
    assert!(dir.path().join("state").join("active.json").exists());
}
