//! Saved Query Manager for Eternal History.
//!
//! Implements `SavedQueryManagerTrait`: keeping, listing and deleting search
//! queries the user wants to rerun, backed by SQLite via `rusqlite`.

use std::sync::Arc;

use rusqlite::{params, OptionalExtension};
use uuid::Uuid;

use crate::database::connection::Database;
use crate::types::errors::SavedQueryError;
use crate::types::query::SavedQuery;

/// Trait defining saved query operations.
pub trait SavedQueryManagerTrait {
    fn save_query(&self, query: &str) -> Result<SavedQuery, SavedQueryError>;
    fn list_queries(&self) -> Result<Vec<SavedQuery>, SavedQueryError>;
    fn delete_query(&self, id: &str) -> Result<(), SavedQueryError>;
}

/// Saved query manager backed by the shared SQLite database.
pub struct SavedQueryManager {
    db: Arc<Database>,
}

impl SavedQueryManager {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    fn row_to_query(row: &rusqlite::Row) -> rusqlite::Result<SavedQuery> {
        Ok(SavedQuery {
            id: row.get(0)?,
            query: row.get(1)?,
            created_at: row.get(2)?,
        })
    }
}

fn db_err(e: rusqlite::Error) -> SavedQueryError {
    SavedQueryError::DatabaseError(e.to_string())
}

impl SavedQueryManagerTrait for SavedQueryManager {
    /// Stores a trimmed query. An identical query already saved is returned as is.
    fn save_query(&self, query: &str) -> Result<SavedQuery, SavedQueryError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(SavedQueryError::EmptyQuery);
        }

        let conn = self.db.connection();
        let existing = conn
            .query_row(
                "SELECT id, query, created_at FROM saved_queries WHERE query = ?1",
                params![query],
                Self::row_to_query,
            )
            .optional()
            .map_err(db_err)?;
        if let Some(saved) = existing {
            return Ok(saved);
        }

        let saved = SavedQuery {
            id: Uuid::new_v4().to_string(),
            query: query.to_string(),
            created_at: chrono::Utc::now().timestamp_millis(),
        };
        conn.execute(
            "INSERT INTO saved_queries (id, query, created_at) VALUES (?1, ?2, ?3)",
            params![saved.id, saved.query, saved.created_at],
        )
        .map_err(db_err)?;
        Ok(saved)
    }

    /// Lists saved queries, newest first.
    fn list_queries(&self) -> Result<Vec<SavedQuery>, SavedQueryError> {
        let conn = self.db.connection();
        let mut stmt = conn
            .prepare(
                "SELECT id, query, created_at FROM saved_queries \
                 ORDER BY created_at DESC, rowid DESC",
            )
            .map_err(db_err)?;

        let rows = stmt.query_map([], Self::row_to_query).map_err(db_err)?;

        let mut results = Vec::new();
        for row in rows {
            results.push(row.map_err(db_err)?);
        }
        Ok(results)
    }

    fn delete_query(&self, id: &str) -> Result<(), SavedQueryError> {
        let affected = self
            .db
            .connection()
            .execute("DELETE FROM saved_queries WHERE id = ?1", params![id])
            .map_err(db_err)?;

        if affected == 0 {
            return Err(SavedQueryError::NotFound(id.to_string()));
        }
        Ok(())
    }
}
