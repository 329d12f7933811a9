//! Unit tests for the Saved Query Manager.

use std::sync::Arc;

use eternal_history::database::Database;
use eternal_history::managers::saved_query_manager::{SavedQueryManager, SavedQueryManagerTrait};
use eternal_history::types::errors::SavedQueryError;

fn setup() -> SavedQueryManager {
    let db = Database::open_in_memory().expect("Failed to open in-memory database");
    SavedQueryManager::new(Arc::new(db))
}

#[test]
fn test_save_query_trims_and_stores() {
    let manager = setup();
    let saved = manager.save_query("  rust site:docs.rs  ").unwrap();
    assert_eq!(saved.query, "rust site:docs.rs");
    assert!(!saved.id.is_empty());
    assert!(saved.created_at > 0);

    let all = manager.list_queries().unwrap();
    assert_eq!(all, vec![saved]);
}

#[test]
fn test_save_query_rejects_blank() {
    let manager = setup();
    assert!(matches!(manager.save_query(""), Err(SavedQueryError::EmptyQuery)));
    assert!(matches!(manager.save_query("   "), Err(SavedQueryError::EmptyQuery)));
    assert!(manager.list_queries().unwrap().is_empty());
}

#[test]
fn test_save_query_returns_existing_duplicate() {
    let manager = setup();
    let first = manager.save_query("tokio").unwrap();
    let second = manager.save_query(" tokio ").unwrap();
    assert_eq!(first, second);
    assert_eq!(manager.list_queries().unwrap().len(), 1);
}

#[test]
fn test_list_queries_newest_first() {
    let manager = setup();
    let a = manager.save_query("alpha").unwrap();
    let b = manager.save_query("beta").unwrap();
    let c = manager.save_query("gamma").unwrap();

    let ids: Vec<String> = manager.list_queries().unwrap().into_iter().map(|q| q.id).collect();
    assert_eq!(ids, vec![c.id, b.id, a.id]);
}

#[test]
fn test_delete_query() {
    let manager = setup();
    let keep = manager.save_query("keep").unwrap();
    let drop = manager.save_query("drop").unwrap();

    manager.delete_query(&drop.id).unwrap();
    assert_eq!(manager.list_queries().unwrap(), vec![keep]);
}

#[test]
fn test_delete_missing_query_is_not_found() {
    let manager = setup();
    let result = manager.delete_query("nonexistent");
    assert!(matches!(result, Err(SavedQueryError::NotFound(id)) if id == "nonexistent"));
}
