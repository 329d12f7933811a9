//! SQLite-backed tree store.
//!
//! Nodes are rows of the `nodes` table; `url IS NULL` marks a container.
//! Children are ordered by `position`, assigned as `MAX(position) + 1` under
//! the parent at creation time.

use std::sync::Arc;

use async_trait::async_trait;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension};
use uuid::Uuid;

use super::{search_words, TreeStore};
use crate::database::connection::{Database, FOLD_CASE_FN};
use crate::types::errors::TreeStoreError;
use crate::types::node::{CreateDetails, NodeChanges, SearchQuery, TreeNode};

const NODE_COLUMNS: &str = "id, title, url, parent_id, date_added";

/// Tree store persisted in the crate's SQLite database.
pub struct SqliteTreeStore {
    db: Arc<Database>,
}

impl SqliteTreeStore {
    /// Creates a store over an already-migrated database.
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    fn row_to_node(row: &rusqlite::Row) -> rusqlite::Result<TreeNode> {
        Ok(TreeNode {
            id: row.get(0)?,
            title: row.get(1)?,
            url: row.get(2)?,
            parent_id: row.get(3)?,
            date_added: row.get(4)?,
        })
    }

    fn find(conn: &Connection, id: &str) -> Result<Option<TreeNode>, TreeStoreError> {
        let node = conn
            .query_row(
                &format!("SELECT {} FROM nodes WHERE id = ?1", NODE_COLUMNS),
                params![id],
                Self::row_to_node,
            )
            .optional()?;
        Ok(node)
    }

    fn next_position(conn: &Connection, parent_id: Option<&str>) -> Result<i64, TreeStoreError> {
        let pos: i64 = match parent_id {
            Some(pid) => conn.query_row(
                "SELECT COALESCE(MAX(position), -1) + 1 FROM nodes WHERE parent_id = ?1",
                params![pid],
                |row| row.get(0),
            ),
            None => conn.query_row(
                "SELECT COALESCE(MAX(position), -1) + 1 FROM nodes WHERE parent_id IS NULL",
                [],
                |row| row.get(0),
            ),
        }?;
        Ok(pos)
    }

    fn collect(
        conn: &Connection,
        sql: &str,
        args: &[String],
    ) -> Result<Vec<TreeNode>, TreeStoreError> {
        let mut stmt = conn.prepare(sql)?;
        let rows = stmt.query_map(params_from_iter(args.iter()), Self::row_to_node)?;
        let mut results = Vec::new();
        for row in rows {
            results.push(row?);
        }
        Ok(results)
    }
}

/// Escapes `LIKE` wildcards so user text matches literally.
fn like_pattern(word: &str) -> String {
    let escaped = word
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

#[async_trait]
impl TreeStore for SqliteTreeStore {
    async fn create(&self, details: CreateDetails) -> Result<TreeNode, TreeStoreError> {
        let conn = self.db.connection();

        if let Some(pid) = details.parent_id.as_deref() {
            match Self::find(&conn, pid)? {
                Some(parent) if parent.is_container() => {}
                _ => return Err(TreeStoreError::InvalidParent(pid.to_string())),
            }
        }

        let id = Uuid::new_v4().to_string();
        let now = chrono::Utc::now().timestamp_millis();
        let position = Self::next_position(&conn, details.parent_id.as_deref())?;

        conn.execute(
            "INSERT INTO nodes (id, parent_id, title, url, position, date_added) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![id, details.parent_id, details.title, details.url, position, now],
        )?;

        Ok(TreeNode {
            id,
            title: details.title,
            url: details.url,
            parent_id: details.parent_id,
            date_added: Some(now),
        })
    }

    async fn get_children(&self, id: &str) -> Result<Vec<TreeNode>, TreeStoreError> {
        let conn = self.db.connection();
        if Self::find(&conn, id)?.is_none() {
            return Err(TreeStoreError::NotFound(id.to_string()));
        }
        Self::collect(
            &conn,
            &format!(
                "SELECT {} FROM nodes WHERE parent_id = ?1 ORDER BY position, rowid",
                NODE_COLUMNS
            ),
            &[id.to_string()],
        )
    }

    async fn get(&self, id: &str) -> Result<Vec<TreeNode>, TreeStoreError> {
        let conn = self.db.connection();
        Self::find(&conn, id)?
            .map(|node| vec![node])
            .ok_or_else(|| TreeStoreError::NotFound(id.to_string()))
    }

    async fn search(&self, query: SearchQuery) -> Result<Vec<TreeNode>, TreeStoreError> {
        let conn = self.db.connection();
        match query {
            SearchQuery::Title(title) => Self::collect(
                &conn,
                &format!("SELECT {} FROM nodes WHERE title = ?1 ORDER BY rowid", NODE_COLUMNS),
                &[title],
            ),
            SearchQuery::Text(text) => {
                let words = search_words(&text);
                if words.is_empty() {
                    return Ok(Vec::new());
                }
                // One clause per word; the pattern is bound once and reused by both columns.
                let clauses: Vec<String> = (1..=words.len())
                    .map(|i| {
                        format!(
                            "({f}(title) LIKE ?{i} ESCAPE '\\' OR {f}(COALESCE(url, '')) LIKE ?{i} ESCAPE '\\')",
                            f = FOLD_CASE_FN
                        )
                    })
                    .collect();
                let patterns: Vec<String> = words.iter().map(|w| like_pattern(w)).collect();
                Self::collect(
                    &conn,
                    &format!(
                        "SELECT {} FROM nodes WHERE {} ORDER BY rowid",
                        NODE_COLUMNS,
                        clauses.join(" AND ")
                    ),
                    &patterns,
                )
            }
        }
    }

    async fn update(&self, id: &str, changes: NodeChanges) -> Result<TreeNode, TreeStoreError> {
        let conn = self.db.connection();
        let mut node =
            Self::find(&conn, id)?.ok_or_else(|| TreeStoreError::NotFound(id.to_string()))?;

        if let Some(title) = changes.title {
            node.title = title;
        }
        // A container stays a container.
        if let (Some(url), false) = (changes.url, node.is_container()) {
            node.url = Some(url);
        }

        conn.execute(
            "UPDATE nodes SET title = ?1, url = ?2 WHERE id = ?3",
            params![node.title, node.url, id],
        )?;
        Ok(node)
    }

    async fn remove(&self, id: &str) -> Result<(), TreeStoreError> {
        let conn = self.db.connection();
        // Descendants go through the ON DELETE CASCADE foreign key.
        let affected = conn.execute("DELETE FROM nodes WHERE id = ?1", params![id])?;
        if affected == 0 {
            return Err(TreeStoreError::NotFound(id.to_string()));
        }
        Ok(())
    }
}
