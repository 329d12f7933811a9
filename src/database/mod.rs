//! Eternal History database layer.
//!
//! Provides SQLite connection management and schema migrations. The
//! database backs both the folder tree (`nodes`) and saved queries.
//!
//! # Usage
//!
//! ```no_run
//! use eternal_history::database::Database;
//!
//! // Open a persistent database
//! let db = Database::open("eternal-history.db").expect("failed to open database");
//!
//! // Or use an in-memory database for testing
//! let db = Database::open_in_memory().expect("failed to open in-memory database");
//!
//! // Lock the underlying connection for queries
//! let conn = db.connection();
//! ```

pub mod connection;
pub mod migrations;

pub use connection::Database;
