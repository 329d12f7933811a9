use thiserror::Error;

// === TreeStoreError ===

/// Errors raised by a tree store backend.
#[derive(Debug, Error)]
pub enum TreeStoreError {
    /// Node with the given ID was not found.
    #[error("Tree node not found: {0}")]
    NotFound(String),
    /// The requested parent is missing or cannot hold children.
    #[error("Invalid parent node: {0}")]
    InvalidParent(String),
    /// Database operation failed.
    #[error("Tree store database error: {0}")]
    DatabaseError(String),
}

impl From<rusqlite::Error> for TreeStoreError {
    fn from(err: rusqlite::Error) -> Self {
        TreeStoreError::DatabaseError(err.to_string())
    }
}

// === HistoryError ===

/// Errors related to storing browsing history in the folder tree.
#[derive(Debug, Error)]
pub enum HistoryError {
    /// An operation that needs the root folder ran before `initialize()`.
    #[error("History store not initialized")]
    NotInitialized,
    /// Ingestion is switched off in the settings.
    #[error("History recording is disabled")]
    RecordingDisabled,
    /// The backing tree store failed during a write.
    #[error("History backing store failure: {0}")]
    BackingStoreFailure(#[from] TreeStoreError),
}

// === SavedQueryError ===

/// Errors related to saved search queries.
#[derive(Debug, Error)]
pub enum SavedQueryError {
    /// Saved query with the given ID was not found.
    #[error("Saved query not found: {0}")]
    NotFound(String),
    /// Blank queries are not stored.
    #[error("Saved query cannot be empty")]
    EmptyQuery,
    /// Database operation failed.
    #[error("Saved query database error: {0}")]
    DatabaseError(String),
}

// === SettingsError ===

/// Errors related to settings management.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// An I/O error occurred while reading or writing settings.
    #[error("Settings I/O error: {0}")]
    IoError(String),
    /// Failed to serialize or deserialize settings.
    #[error("Settings serialization error: {0}")]
    SerializationError(String),
    /// The provided settings key is invalid.
    #[error("Invalid settings key: {0}")]
    InvalidKey(String),
    /// The provided settings value is invalid.
    #[error("Invalid settings value: {0}")]
    InvalidValue(String),
}
