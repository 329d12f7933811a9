//! Hierarchical node store consumed by the history core.
//!
//! [`TreeStore`] is the bookmark-API contract: containers and leaves,
//! addressed by opaque string ids. Two providers ship with the crate:
//! [`MemoryTreeStore`] (an arena, used by tests and embedders) and
//! [`SqliteTreeStore`] (persistent, used by the RPC server).

use async_trait::async_trait;

use crate::types::errors::TreeStoreError;
use crate::types::node::{CreateDetails, NodeChanges, SearchQuery, TreeNode};

pub mod memory;
pub mod sqlite;

pub use memory::MemoryTreeStore;
pub use sqlite::SqliteTreeStore;

/// Trait defining the tree store operations.
#[async_trait]
pub trait TreeStore: Send + Sync {
    /// Creates a leaf (with `url`) or container (without) and returns it.
    async fn create(&self, details: CreateDetails) -> Result<TreeNode, TreeStoreError>;

    /// Direct children of `id`, in position order.
    async fn get_children(&self, id: &str) -> Result<Vec<TreeNode>, TreeStoreError>;

    /// Single-node lookup. A missing id is `NotFound`.
    async fn get(&self, id: &str) -> Result<Vec<TreeNode>, TreeStoreError>;

    /// Store-wide search; never scoped to a subtree.
    async fn search(&self, query: SearchQuery) -> Result<Vec<TreeNode>, TreeStoreError>;

    async fn update(&self, id: &str, changes: NodeChanges) -> Result<TreeNode, TreeStoreError>;

    /// Removes a node together with everything below it.
    async fn remove(&self, id: &str) -> Result<(), TreeStoreError>;
}

/// Lower-cased whitespace-separated words of a free-text query.
pub(crate) fn search_words(text: &str) -> Vec<String> {
    text.split_whitespace().map(str::to_lowercase).collect()
}

/// Free-text match used by backends that filter in Rust.
pub(crate) fn matches_words(node: &TreeNode, words: &[String]) -> bool {
    if words.is_empty() {
        return false;
    }
    let title = node.title.to_lowercase();
    let url = node.url.as_deref().unwrap_or_default().to_lowercase();
    words
        .iter()
        .all(|w| title.contains(w.as_str()) || url.contains(w.as_str()))
}
