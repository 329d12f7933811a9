use serde::{Deserialize, Serialize};

/// Name of the top-level folder that owns every stored record.
pub const DEFAULT_ROOT_FOLDER_NAME: &str = "Eternal History";

/// Top-level settings container.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct HistorySettings {
    pub storage: StorageSettings,
    pub search: SearchSettings,
    pub ingestion: IngestionSettings,
}

/// Where records live in the folder tree.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StorageSettings {
    pub root_folder_name: String,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            root_folder_name: DEFAULT_ROOT_FOLDER_NAME.to_string(),
        }
    }
}

/// Read-path tuning.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchSettings {
    /// Number of day buckets returned by a recent-history lookup.
    pub recent_days: u32,
    /// Cap on search results; 0 means unlimited.
    pub max_results: usize,
    /// Largest recent-history window honored, in days.
    #[serde(default = "default_max_recent_days")]
    pub max_recent_days: u32,
}

/// Ten years of day buckets.
pub const DEFAULT_MAX_RECENT_DAYS: u32 = 3650;

fn default_max_recent_days() -> u32 {
    DEFAULT_MAX_RECENT_DAYS
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            recent_days: 3,
            max_results: 500,
            max_recent_days: DEFAULT_MAX_RECENT_DAYS,
        }
    }
}

impl SearchSettings {
    /// `days` clamped to `max_recent_days`.
    pub fn recent_window(&self, days: u32) -> u32 {
        days.min(self.max_recent_days)
    }
}

/// Write-path switches.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IngestionSettings {
    pub recording_enabled: bool,
}

impl Default for IngestionSettings {
    fn default() -> Self {
        Self {
            recording_enabled: true,
        }
    }
}
