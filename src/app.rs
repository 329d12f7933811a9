//! App Core for Eternal History.
//!
//! Holds the database, the bookmark-tree history store, saved queries and
//! settings, and runs the startup sequence.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::info;

use crate::database::connection::Database;
use crate::managers::record_store::HistoryStore;
use crate::managers::saved_query_manager::SavedQueryManager;
use crate::services::settings_engine::{SettingsEngine, SettingsEngineTrait};
use crate::tree_store::SqliteTreeStore;
use crate::types::errors::HistoryError;

/// Central application struct.
pub struct App {
    pub db: Arc<Database>,
    pub history: HistoryStore<SqliteTreeStore>,
    pub saved_queries: SavedQueryManager,
    pub settings_engine: SettingsEngine,
}

impl App {
    /// Opens the database at `db_path` and loads settings from `settings_path`
    /// (platform default when `None`).
    ///
    /// The history store is created with the configured root folder name but
    /// is not initialized until [`App::startup`].
    pub fn new(
        db_path: &Path,
        settings_path: Option<PathBuf>,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let db = Arc::new(Database::open(db_path)?);
        Ok(Self::with_database(db, SettingsEngine::new(settings_path)))
    }

    /// Builds an App over an already-open database.
    pub fn with_database(db: Arc<Database>, mut settings_engine: SettingsEngine) -> Self {
        let settings = settings_engine.load_or_default();

        let tree = Arc::new(SqliteTreeStore::new(db.clone()));
        let mut history = HistoryStore::with_root_folder(tree, &settings.storage.root_folder_name);
        history.set_search_settings(settings.search.clone());

        Self {
            saved_queries: SavedQueryManager::new(db.clone()),
            db,
            history,
            settings_engine,
        }
    }

    /// Startup sequence: resolve the root folder so reads and writes can run.
    pub async fn startup(&self) -> Result<(), HistoryError> {
        let root_id = self.history.initialize().await?;
        info!(%root_id, "startup complete");
        Ok(())
    }

    /// Pushes the current search settings into the history store.
    ///
    /// The root folder name only takes effect on the next start.
    pub fn apply_settings(&mut self) {
        let search = self.settings_engine.get_settings().search.clone();
        self.history.set_search_settings(search);
    }

    pub fn recording_enabled(&self) -> bool {
        self.settings_engine.get_settings().ingestion.recording_enabled
    }
}
