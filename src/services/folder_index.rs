//! Folder Index: maps a timestamp to `root / YYYY / MM / DD / HH` containers.
//!
//! Lookups are search-then-create without a lock. Two concurrent callers can
//! both miss and both create the same segment; later lookups take the first
//! matching child, so a duplicate sibling is harmless but never cleaned up.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Datelike, Local, NaiveDate, TimeZone, Timelike};
use tracing::debug;

use crate::tree_store::TreeStore;
use crate::types::errors::TreeStoreError;
use crate::types::node::{CreateDetails, SearchQuery, TreeNode};

/// The four folder names under the root for one point in time.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FolderPath {
    pub year: String,
    pub month: String,
    pub day: String,
    pub hour: String,
}

impl FolderPath {
    /// Zero-padded segments for `at`, in `at`'s own time zone.
    pub fn from_datetime<Tz: TimeZone>(at: &DateTime<Tz>) -> Self {
        let [year, month, day] = day_segments(at.date_naive());
        Self {
            year,
            month,
            day,
            hour: format!("{:02}", at.hour()),
        }
    }

    /// Segments in root-to-leaf order.
    pub fn segments(&self) -> [&str; 4] {
        [&self.year, &self.month, &self.day, &self.hour]
    }
}

/// Year, month and day folder names for a calendar date.
pub fn day_segments(date: NaiveDate) -> [String; 3] {
    [
        format!("{:04}", date.year()),
        format!("{:02}", date.month()),
        format!("{:02}", date.day()),
    ]
}

/// Converts epoch milliseconds to local time. Out-of-range values clamp to the epoch.
pub fn local_time(timestamp_ms: i64) -> DateTime<Local> {
    Local
        .timestamp_millis_opt(timestamp_ms)
        .earliest()
        .unwrap_or_else(|| DateTime::<chrono::Utc>::default().with_timezone(&Local))
}

/// Folder path for a timestamp, using the local calendar and a 24-hour clock.
pub fn path_for(timestamp_ms: i64) -> FolderPath {
    FolderPath::from_datetime(&local_time(timestamp_ms))
}

/// First child of `parent` that is a container titled `title`.
pub(crate) fn first_container<'a>(children: &'a [TreeNode], title: &str) -> Option<&'a TreeNode> {
    children.iter().find(|c| c.is_container() && c.title == title)
}

/// Resolves and lazily creates the date folders under the root.
pub struct FolderIndex<S: TreeStore> {
    tree: Arc<S>,
    /// `(parent_id, title) -> container id`, one entry per resolved segment.
    cache: Mutex<HashMap<(String, String), String>>,
}

impl<S: TreeStore> FolderIndex<S> {
    pub fn new(tree: Arc<S>) -> Self {
        Self {
            tree,
            cache: Mutex::new(HashMap::new()),
        }
    }

    fn cache(&self) -> MutexGuard<'_, HashMap<(String, String), String>> {
        self.cache.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Drops every memoized segment.
    pub fn forget(&self) {
        self.cache().clear();
    }

    /// Finds the top-level container named `name`, creating it when absent.
    pub async fn ensure_root_folder(&self, name: &str) -> Result<String, TreeStoreError> {
        let matches = self.tree.search(SearchQuery::Title(name.to_string())).await?;
        if let Some(existing) = matches
            .iter()
            .find(|n| n.is_container() && n.title == name && n.parent_id.is_none())
        {
            return Ok(existing.id.clone());
        }

        let created = self.tree.create(CreateDetails::container(None, name)).await?;
        debug!(id = %created.id, name, "created root folder");
        Ok(created.id)
    }

    /// Finds the child container `title` under `parent_id`, creating it when absent.
    pub async fn ensure_child_folder(
        &self,
        parent_id: &str,
        title: &str,
    ) -> Result<String, TreeStoreError> {
        let key = (parent_id.to_string(), title.to_string());
        let cached = self.cache().get(&key).cloned();
        if let Some(id) = cached {
            return Ok(id);
        }

        let children = self.tree.get_children(parent_id).await?;
        let id = match first_container(&children, title) {
            Some(existing) => existing.id.clone(),
            None => {
                let created = self
                    .tree
                    .create(CreateDetails::container(Some(parent_id), title))
                    .await?;
                debug!(id = %created.id, parent_id, title, "created folder");
                created.id
            }
        };

        self.cache().insert(key, id.clone());
        Ok(id)
    }

    /// Walks year, month, day and hour under `root_id` and returns the hour folder.
    pub async fn resolve_path(
        &self,
        root_id: &str,
        timestamp_ms: i64,
    ) -> Result<String, TreeStoreError> {
        let path = path_for(timestamp_ms);
        let mut current = root_id.to_string();
        for segment in path.segments() {
            current = self.ensure_child_folder(&current, segment).await?;
        }
        Ok(current)
    }

    /// Read-only walk from `parent_id` through `titles`; `None` when any level is missing.
    ///
    /// Never creates folders. Backing-store failures count as missing.
    pub async fn find_path(&self, parent_id: &str, titles: &[&str]) -> Option<String> {
        let mut current = parent_id.to_string();
        for title in titles {
            let key = (current.clone(), title.to_string());
            let cached = self.cache().get(&key).cloned();
            current = match cached {
                Some(id) => id,
                None => {
                    let children = match self.tree.get_children(&current).await {
                        Ok(children) => children,
                        Err(e) => {
                            debug!(parent_id = %current, error = %e, "folder lookup failed");
                            return None;
                        }
                    };
                    first_container(&children, title)?.id.clone()
                }
            };
        }
        Some(current)
    }
}
