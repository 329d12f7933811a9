//! Unit tests for the date folder index.

use std::sync::Arc;

use chrono::{Local, TimeZone};
use eternal_history::services::folder_index::{local_time, path_for, FolderIndex, FolderPath};
use eternal_history::tree_store::{MemoryTreeStore, TreeStore};
use eternal_history::types::node::CreateDetails;

const TS: i64 = 1_700_000_000_000;

fn setup() -> (Arc<MemoryTreeStore>, FolderIndex<MemoryTreeStore>) {
    let tree = Arc::new(MemoryTreeStore::new());
    let index = FolderIndex::new(tree.clone());
    (tree, index)
}

#[test]
fn test_path_for_matches_local_calendar() {
    let expected = FolderPath::from_datetime(&local_time(TS));
    assert_eq!(path_for(TS), expected);
    assert_eq!(path_for(TS), path_for(TS));
}

#[test]
fn test_path_for_segments_are_padded() {
    let at = Local.with_ymd_and_hms(2024, 2, 3, 4, 30, 0).single().unwrap();
    let path = path_for(at.timestamp_millis());
    assert_eq!(path.segments(), ["2024", "02", "03", "04"]);
}

#[test]
fn test_same_hour_shares_path() {
    let at = Local.with_ymd_and_hms(2024, 6, 1, 10, 0, 0).single().unwrap();
    let start = at.timestamp_millis();
    assert_eq!(path_for(start), path_for(start + 59 * 60 * 1000));
    assert_ne!(path_for(start), path_for(start + 60 * 60 * 1000));
}

#[tokio::test]
async fn test_ensure_root_folder_is_idempotent() {
    let (tree, index) = setup();
    let first = index.ensure_root_folder("Eternal History").await.unwrap();
    let second = index.ensure_root_folder("Eternal History").await.unwrap();
    assert_eq!(first, second);
    assert_eq!(tree.len(), 1);
}

#[tokio::test]
async fn test_ensure_root_folder_ignores_nested_namesake() {
    let (tree, index) = setup();
    let other = tree.create(CreateDetails::container(None, "Other")).await.unwrap();
    let nested = tree
        .create(CreateDetails::container(Some(&other.id), "Eternal History"))
        .await
        .unwrap();

    let root = index.ensure_root_folder("Eternal History").await.unwrap();
    assert_ne!(root, nested.id);
    let node = tree.get(&root).await.unwrap();
    assert!(node[0].parent_id.is_none());
}

#[tokio::test]
async fn test_resolve_path_builds_four_levels() {
    let (tree, index) = setup();
    let root = index.ensure_root_folder("Eternal History").await.unwrap();
    let hour = index.resolve_path(&root, TS).await.unwrap();

    let path = path_for(TS);
    let mut current = root.clone();
    for segment in path.segments() {
        let children = tree.get_children(&current).await.unwrap();
        assert_eq!(children.len(), 1);
        assert_eq!(children[0].title, segment);
        assert!(children[0].is_container());
        current = children[0].id.clone();
    }
    assert_eq!(current, hour);
}

#[tokio::test]
async fn test_resolve_path_reuses_existing_folders() {
    let (tree, index) = setup();
    let root = index.ensure_root_folder("Eternal History").await.unwrap();
    let first = index.resolve_path(&root, TS).await.unwrap();
    let count = tree.len();

    let second = index.resolve_path(&root, TS + 1_000).await.unwrap();
    assert_eq!(first, second);
    assert_eq!(tree.len(), count);
}

#[tokio::test]
async fn test_resolve_path_finds_folders_after_forget() {
    let (tree, index) = setup();
    let root = index.ensure_root_folder("Eternal History").await.unwrap();
    let first = index.resolve_path(&root, TS).await.unwrap();
    let count = tree.len();

    index.forget();
    let second = index.resolve_path(&root, TS).await.unwrap();
    assert_eq!(first, second);
    assert_eq!(tree.len(), count);
}

#[tokio::test]
async fn test_find_path_never_creates() {
    let (tree, index) = setup();
    let root = index.ensure_root_folder("Eternal History").await.unwrap();

    assert!(index.find_path(&root, &["2024", "01", "01"]).await.is_none());
    assert_eq!(tree.len(), 1);

    let hour = index.resolve_path(&root, TS).await.unwrap();
    let path = path_for(TS);
    let found = index.find_path(&root, &path.segments()).await;
    assert_eq!(found.as_deref(), Some(hour.as_str()));
}

#[tokio::test]
async fn test_find_path_on_missing_parent_is_none() {
    let (_tree, index) = setup();
    assert!(index.find_path("missing", &["2024"]).await.is_none());
}
