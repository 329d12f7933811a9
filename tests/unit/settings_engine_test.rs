//! Unit tests for the Settings Engine.

use std::fs;

use eternal_history::services::settings_engine::{SettingsEngine, SettingsEngineTrait};
use eternal_history::types::errors::SettingsError;
use eternal_history::types::settings::{
    HistorySettings, SearchSettings, DEFAULT_MAX_RECENT_DAYS, DEFAULT_ROOT_FOLDER_NAME,
};
use serde_json::json;
use tempfile::TempDir;

fn setup() -> (TempDir, SettingsEngine) {
    let dir = TempDir::new().unwrap();
    let engine = SettingsEngine::new(Some(dir.path().join("settings.json")));
    (dir, engine)
}

#[test]
fn test_defaults() {
    let settings = HistorySettings::default();
    assert_eq!(settings.storage.root_folder_name, DEFAULT_ROOT_FOLDER_NAME);
    assert_eq!(settings.search.recent_days, 3);
    assert_eq!(settings.search.max_results, 500);
    assert_eq!(settings.search.max_recent_days, DEFAULT_MAX_RECENT_DAYS);
    assert!(settings.ingestion.recording_enabled);
}

#[test]
fn test_load_missing_file_gives_defaults() {
    let (_dir, mut engine) = setup();
    let settings = engine.load().unwrap();
    assert_eq!(settings, HistorySettings::default());
    assert!(!engine.get_config_path().exists());
}

#[test]
fn test_save_then_load() {
    let (dir, mut engine) = setup();
    engine.set_value("search.recent_days", json!(7)).unwrap();

    let mut reloaded = SettingsEngine::new(Some(dir.path().join("settings.json")));
    let settings = reloaded.load().unwrap();
    assert_eq!(settings.search.recent_days, 7);
}

#[test]
fn test_save_creates_parent_directories() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("deeper").join("settings.json");
    let engine = SettingsEngine::new(Some(path.clone()));
    engine.save().unwrap();
    assert!(path.exists());
}

#[test]
fn test_set_value_updates_each_section() {
    let (_dir, mut engine) = setup();
    engine.set_value("storage.root_folder_name", json!("Archive")).unwrap();
    engine.set_value("search.max_results", json!(50)).unwrap();
    engine.set_value("ingestion.recording_enabled", json!(false)).unwrap();

    let settings = engine.get_settings();
    assert_eq!(settings.storage.root_folder_name, "Archive");
    assert_eq!(settings.search.max_results, 50);
    assert!(!settings.ingestion.recording_enabled);
}

#[test]
fn test_set_value_unknown_key() {
    let (_dir, mut engine) = setup();
    let result = engine.set_value("search.colour", json!("red"));
    assert!(matches!(result, Err(SettingsError::InvalidKey(_))));

    let result = engine.set_value("nonsense", json!(1));
    assert!(matches!(result, Err(SettingsError::InvalidKey(_))));
}

#[test]
fn test_set_value_wrong_type_keeps_settings() {
    let (_dir, mut engine) = setup();
    let result = engine.set_value("search.recent_days", json!("three"));
    assert!(matches!(result, Err(SettingsError::InvalidValue(_))));

    let result = engine.set_value("search.recent_days", json!(-1));
    assert!(matches!(result, Err(SettingsError::InvalidValue(_))));

    assert_eq!(engine.get_settings().search.recent_days, 3);
}

#[test]
fn test_load_malformed_file_is_serialization_error() {
    let (_dir, mut engine) = setup();
    fs::write(engine.get_config_path(), "{ not json").unwrap();
    assert!(matches!(engine.load(), Err(SettingsError::SerializationError(_))));
}

#[test]
fn test_reset_restores_defaults() {
    let (dir, mut engine) = setup();
    engine.set_value("search.recent_days", json!(30)).unwrap();
    engine.reset().unwrap();
    assert_eq!(engine.get_settings(), &HistorySettings::default());

    let mut reloaded = SettingsEngine::new(Some(dir.path().join("settings.json")));
    assert_eq!(reloaded.load().unwrap(), HistorySettings::default());
}

#[test]
fn test_recent_window_is_clamped() {
    let search = SearchSettings {
        max_recent_days: 30,
        ..SearchSettings::default()
    };
    assert_eq!(search.recent_window(7), 7);
    assert_eq!(search.recent_window(u32::MAX), 30);
}

#[test]
fn test_load_fills_missing_max_recent_days() {
    let (_dir, mut engine) = setup();
    fs::write(
        engine.get_config_path(),
        r#"{
            "storage": {"root_folder_name": "Eternal History"},
            "search": {"recent_days": 5, "max_results": 10},
            "ingestion": {"recording_enabled": true}
        }"#,
    )
    .unwrap();

    let settings = engine.load().unwrap();
    assert_eq!(settings.search.recent_days, 5);
    assert_eq!(settings.search.max_recent_days, DEFAULT_MAX_RECENT_DAYS);
}
