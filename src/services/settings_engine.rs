// Eternal History Settings Engine
// Loads, saves, updates and resets the store settings.
// Settings are stored as a JSON file at the platform-specific config path.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{debug, warn};

use crate::platform;
use crate::types::errors::SettingsError;
use crate::types::settings::HistorySettings;

/// Trait defining the settings engine interface.
pub trait SettingsEngineTrait {
    fn load(&mut self) -> Result<HistorySettings, SettingsError>;
    fn save(&self) -> Result<(), SettingsError>;
    fn get_settings(&self) -> &HistorySettings;
    fn set_value(&mut self, key: &str, value: Value) -> Result<(), SettingsError>;
    fn reset(&mut self) -> Result<(), SettingsError>;
    fn get_config_path(&self) -> &Path;
}

/// Settings engine that persists settings as pretty-printed JSON on disk.
pub struct SettingsEngine {
    config_path: PathBuf,
    settings: HistorySettings,
}

impl SettingsEngine {
    /// Creates a SettingsEngine holding default settings.
    ///
    /// `path_override` replaces the platform config path (`<config dir>/settings.json`).
    pub fn new(path_override: Option<PathBuf>) -> Self {
        let config_path =
            path_override.unwrap_or_else(|| platform::get_config_dir().join("settings.json"));
        Self {
            config_path,
            settings: HistorySettings::default(),
        }
    }

    /// Loads settings, falling back to defaults when the file is unreadable.
    ///
    /// Used at startup, where a broken config must not keep history from loading.
    pub fn load_or_default(&mut self) -> HistorySettings {
        match self.load() {
            Ok(settings) => settings,
            Err(e) => {
                warn!(path = %self.config_path.display(), error = %e, "using default settings");
                self.settings = HistorySettings::default();
                self.settings.clone()
            }
        }
    }
}

/// `"search.recent_days"` → `"/search/recent_days"`.
fn to_pointer(key: &str) -> Result<String, SettingsError> {
    if key.is_empty() || key.split('.').any(str::is_empty) {
        return Err(SettingsError::InvalidKey(format!("Malformed key '{}'", key)));
    }
    Ok(format!("/{}", key.replace('.', "/")))
}

impl SettingsEngineTrait for SettingsEngine {
    /// Loads settings from the JSON config file.
    ///
    /// A missing file yields defaults; a malformed one is a serialization error.
    fn load(&mut self) -> Result<HistorySettings, SettingsError> {
        if !self.config_path.exists() {
            debug!(path = %self.config_path.display(), "no settings file, using defaults");
            self.settings = HistorySettings::default();
            return Ok(self.settings.clone());
        }

        let content = fs::read_to_string(&self.config_path)
            .map_err(|e| SettingsError::IoError(format!("Failed to read config file: {}", e)))?;

        self.settings = serde_json::from_str(&content).map_err(|e| {
            SettingsError::SerializationError(format!("Failed to parse config file: {}", e))
        })?;
        Ok(self.settings.clone())
    }

    /// Writes the current settings, creating parent directories as needed.
    fn save(&self) -> Result<(), SettingsError> {
        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                SettingsError::IoError(format!("Failed to create config directory: {}", e))
            })?;
        }

        let json = serde_json::to_string_pretty(&self.settings).map_err(|e| {
            SettingsError::SerializationError(format!("Failed to serialize settings: {}", e))
        })?;

        fs::write(&self.config_path, json)
            .map_err(|e| SettingsError::IoError(format!("Failed to write config file: {}", e)))
    }

    fn get_settings(&self) -> &HistorySettings {
        &self.settings
    }

    /// Updates one setting by dot-notation key and saves.
    ///
    /// The key must name an existing field, and the value must deserialize
    /// into that field's type.
    ///
    /// # Examples
    /// - `"search.recent_days"` → `settings.search.recent_days`
    /// - `"ingestion.recording_enabled"` → `settings.ingestion.recording_enabled`
    fn set_value(&mut self, key: &str, value: Value) -> Result<(), SettingsError> {
        let pointer = to_pointer(key)?;

        let mut tree = serde_json::to_value(&self.settings).map_err(|e| {
            SettingsError::SerializationError(format!("Failed to serialize settings: {}", e))
        })?;

        let slot = tree
            .pointer_mut(&pointer)
            .ok_or_else(|| SettingsError::InvalidKey(format!("Key '{}' not found in settings", key)))?;
        if slot.is_object() {
            return Err(SettingsError::InvalidKey(format!(
                "Key '{}' names a section, not a value",
                key
            )));
        }
        *slot = value;

        self.settings = serde_json::from_value(tree).map_err(|e| {
            SettingsError::InvalidValue(format!("Invalid value for key '{}': {}", key, e))
        })?;

        self.save()
    }

    /// Restores defaults and saves.
    fn reset(&mut self) -> Result<(), SettingsError> {
        self.settings = HistorySettings::default();
        self.save()
    }

    fn get_config_path(&self) -> &Path {
        &self.config_path
    }
}
