//! Record Store for Eternal History.
//!
//! Stores each history record as a leaf under `root / YYYY / MM / DD / HH`,
//! keyed by URL within its hour folder. Re-inserting a URL rewrites the
//! existing leaf's title (last write wins) instead of adding a sibling.
//!
//! The store starts uninitialized. `initialize()` resolves the root folder
//! once; until then `insert` fails with `NotInitialized` and the read paths
//! in `services::query_engine` return nothing.
//!
//! Inserts for the same URL are not atomic: two interleaved calls can both
//! miss the existing leaf and create two, or overwrite each other.

use std::sync::{Arc, RwLock};

use tracing::{debug, info};

use crate::services::folder_index::FolderIndex;
use crate::services::title_codec;
use crate::tree_store::TreeStore;
use crate::types::errors::HistoryError;
use crate::types::history::HistoryRecord;
use crate::types::node::{CreateDetails, NodeChanges};
use crate::types::settings::{SearchSettings, DEFAULT_ROOT_FOLDER_NAME};

/// Whether an insert created a leaf or rewrote one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InsertOutcome {
    Created(String),
    Updated(String),
}

impl InsertOutcome {
    /// Id of the affected leaf.
    pub fn id(&self) -> &str {
        match self {
            InsertOutcome::Created(id) | InsertOutcome::Updated(id) => id,
        }
    }
}

/// History store over any [`TreeStore`].
pub struct HistoryStore<S: TreeStore> {
    pub(crate) tree: Arc<S>,
    pub(crate) folders: FolderIndex<S>,
    root_folder_name: String,
    root_id: RwLock<Option<String>>,
    pub(crate) search_settings: SearchSettings,
}

impl<S: TreeStore> HistoryStore<S> {
    /// Creates an uninitialized store using the default root folder name.
    pub fn new(tree: Arc<S>) -> Self {
        Self::with_root_folder(tree, DEFAULT_ROOT_FOLDER_NAME)
    }

    /// Creates an uninitialized store whose records live under `root_folder_name`.
    pub fn with_root_folder(tree: Arc<S>, root_folder_name: &str) -> Self {
        Self {
            folders: FolderIndex::new(tree.clone()),
            tree,
            root_folder_name: root_folder_name.to_string(),
            root_id: RwLock::new(None),
            search_settings: SearchSettings::default(),
        }
    }

    /// Replaces the read-path tuning (recent window, result cap).
    pub fn set_search_settings(&mut self, settings: SearchSettings) {
        self.search_settings = settings;
    }

    pub fn search_settings(&self) -> &SearchSettings {
        &self.search_settings
    }

    pub fn root_folder_name(&self) -> &str {
        &self.root_folder_name
    }

    /// The backing tree store.
    pub fn tree(&self) -> &Arc<S> {
        &self.tree
    }

    /// Resolved root folder id, or `None` before `initialize()`.
    pub fn root_id(&self) -> Option<String> {
        self.root_id
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn is_initialized(&self) -> bool {
        self.root_id().is_some()
    }

    /// Resolves (or creates) the root folder and marks the store initialized.
    ///
    /// Safe to call again; it re-resolves the same folder.
    pub async fn initialize(&self) -> Result<String, HistoryError> {
        let id = self.folders.ensure_root_folder(&self.root_folder_name).await?;
        *self
            .root_id
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(id.clone());
        info!(root_id = %id, name = %self.root_folder_name, "history store initialized");
        Ok(id)
    }

    /// Returns the store to the uninitialized state and drops the folder cache.
    ///
    /// Teardown hook for tests and embedders that swap the backing tree.
    pub fn reset(&self) {
        *self
            .root_id
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = None;
        self.folders.forget();
    }

    /// Stores `record`, rewriting the leaf with the same URL in its hour folder if any.
    ///
    /// `visit_count` and `last_visit_time` replace the stored values.
    pub async fn insert(&self, record: &HistoryRecord) -> Result<InsertOutcome, HistoryError> {
        let root_id = self.root_id().ok_or(HistoryError::NotInitialized)?;
        let hour_id = self
            .folders
            .resolve_path(&root_id, record.last_visit_time)
            .await?;

        let title = title_codec::encode(&record.title, record.last_visit_time, record.visit_count);
        let children = self.tree.get_children(&hour_id).await?;

        let existing = children
            .iter()
            .find(|c| c.url.as_deref() == Some(record.url.as_str()));

        match existing {
            Some(leaf) => {
                let leaf_id = leaf.id.clone();
                self.tree
                    .update(
                        &leaf_id,
                        NodeChanges {
                            title: Some(title),
                            url: None,
                        },
                    )
                    .await?;
                debug!(id = %leaf_id, url = %record.url, "updated history leaf");
                Ok(InsertOutcome::Updated(leaf_id))
            }
            None => {
                let created = self
                    .tree
                    .create(CreateDetails::leaf(&hour_id, &title, &record.url))
                    .await?;
                debug!(id = %created.id, url = %record.url, "created history leaf");
                Ok(InsertOutcome::Created(created.id))
            }
        }
    }

    /// Inserts records one by one, in order.
    ///
    /// Stops at the first failure and returns it; earlier inserts stay.
    /// On success returns how many records were written.
    pub async fn insert_many(&self, records: &[HistoryRecord]) -> Result<usize, HistoryError> {
        for record in records {
            self.insert(record).await?;
        }
        Ok(records.len())
    }
}
