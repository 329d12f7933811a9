use serde::{Deserialize, Serialize};

/// A node in the bookmark-style tree store.
///
/// Containers have no `url`; leaves carry a `url` and an encoded title.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeNode {
    pub id: String,
    pub title: String,
    pub url: Option<String>,
    pub parent_id: Option<String>,
    pub date_added: Option<i64>,
}

impl TreeNode {
    /// Returns true for grouping nodes (no `url`).
    pub fn is_container(&self) -> bool {
        self.url.is_none()
    }
}

/// Arguments for creating a node. `url: None` creates a container.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateDetails {
    pub parent_id: Option<String>,
    pub title: String,
    pub url: Option<String>,
}

impl CreateDetails {
    pub fn container(parent_id: Option<&str>, title: &str) -> Self {
        Self {
            parent_id: parent_id.map(str::to_string),
            title: title.to_string(),
            url: None,
        }
    }

    pub fn leaf(parent_id: &str, title: &str, url: &str) -> Self {
        Self {
            parent_id: Some(parent_id.to_string()),
            title: title.to_string(),
            url: Some(url.to_string()),
        }
    }
}

/// Fields to change on an existing node; `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeChanges {
    pub title: Option<String>,
    pub url: Option<String>,
}

/// Store-wide search, not scoped to any subtree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchQuery {
    /// Exact title match.
    Title(String),
    /// Every whitespace-separated word must occur in the title or url,
    /// ignoring case.
    Text(String),
}
