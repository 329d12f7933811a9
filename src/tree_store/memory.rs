//! In-memory tree store.
//!
//! Nodes live in an arena keyed by id; each slot keeps its children's ids in
//! insertion order. All walks are iterative.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use super::{matches_words, search_words, TreeStore};
use crate::types::errors::TreeStoreError;
use crate::types::node::{CreateDetails, NodeChanges, SearchQuery, TreeNode};

struct Slot {
    node: TreeNode,
    children: Vec<String>,
}

#[derive(Default)]
struct Arena {
    slots: HashMap<String, Slot>,
    /// Every id, in creation order, so search is deterministic.
    order: Vec<String>,
    next_id: u64,
}

/// Tree store kept entirely in process memory.
#[derive(Default)]
pub struct MemoryTreeStore {
    arena: Mutex<Arena>,
}

impl MemoryTreeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of nodes currently stored.
    pub fn len(&self) -> usize {
        self.lock().slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> MutexGuard<'_, Arena> {
        self.arena.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl TreeStore for MemoryTreeStore {
    async fn create(&self, details: CreateDetails) -> Result<TreeNode, TreeStoreError> {
        let mut arena = self.lock();

        if let Some(pid) = details.parent_id.as_deref() {
            match arena.slots.get(pid) {
                Some(parent) if parent.node.is_container() => {}
                _ => return Err(TreeStoreError::InvalidParent(pid.to_string())),
            }
        }

        arena.next_id += 1;
        let id = arena.next_id.to_string();
        let node = TreeNode {
            id: id.clone(),
            title: details.title,
            url: details.url,
            parent_id: details.parent_id,
            date_added: Some(chrono::Utc::now().timestamp_millis()),
        };

        if let Some(parent) = node.parent_id.as_deref().and_then(|pid| arena.slots.get_mut(pid)) {
            parent.children.push(id.clone());
        }
        arena.order.push(id.clone());
        arena.slots.insert(
            id,
            Slot {
                node: node.clone(),
                children: Vec::new(),
            },
        );
        Ok(node)
    }

    async fn get_children(&self, id: &str) -> Result<Vec<TreeNode>, TreeStoreError> {
        let arena = self.lock();
        let slot = arena
            .slots
            .get(id)
            .ok_or_else(|| TreeStoreError::NotFound(id.to_string()))?;
        Ok(slot
            .children
            .iter()
            .filter_map(|cid| arena.slots.get(cid).map(|s| s.node.clone()))
            .collect())
    }

    async fn get(&self, id: &str) -> Result<Vec<TreeNode>, TreeStoreError> {
        let arena = self.lock();
        arena
            .slots
            .get(id)
            .map(|slot| vec![slot.node.clone()])
            .ok_or_else(|| TreeStoreError::NotFound(id.to_string()))
    }

    async fn search(&self, query: SearchQuery) -> Result<Vec<TreeNode>, TreeStoreError> {
        let arena = self.lock();
        let nodes = arena.order.iter().filter_map(|id| arena.slots.get(id)).map(|s| &s.node);
        let found = match query {
            SearchQuery::Title(title) => nodes.filter(|n| n.title == title).cloned().collect(),
            SearchQuery::Text(text) => {
                let words = search_words(&text);
                nodes.filter(|n| matches_words(n, &words)).cloned().collect()
            }
        };
        Ok(found)
    }

    async fn update(&self, id: &str, changes: NodeChanges) -> Result<TreeNode, TreeStoreError> {
        let mut arena = self.lock();
        let slot = arena
            .slots
            .get_mut(id)
            .ok_or_else(|| TreeStoreError::NotFound(id.to_string()))?;
        if let Some(title) = changes.title {
            slot.node.title = title;
        }
        // A container stays a container.
        if let (Some(url), false) = (changes.url, slot.node.is_container()) {
            slot.node.url = Some(url);
        }
        Ok(slot.node.clone())
    }

    async fn remove(&self, id: &str) -> Result<(), TreeStoreError> {
        let mut arena = self.lock();
        let parent_id = match arena.slots.get(id) {
            Some(slot) => slot.node.parent_id.clone(),
            None => return Err(TreeStoreError::NotFound(id.to_string())),
        };

        if let Some(parent) = parent_id.as_deref().and_then(|pid| arena.slots.get_mut(pid)) {
            parent.children.retain(|c| c != id);
        }

        let mut doomed = Vec::new();
        let mut stack = vec![id.to_string()];
        while let Some(current) = stack.pop() {
            if let Some(slot) = arena.slots.remove(&current) {
                stack.extend(slot.children);
                doomed.push(current);
            }
        }
        arena.order.retain(|o| !doomed.contains(o));
        Ok(())
    }
}
