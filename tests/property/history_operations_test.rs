//! Property-based tests for history store operations.
//!
//! These tests verify that recording a visit and then searching for its
//! title always finds it, and that re-recording a URL within the same hour
//! never adds a second leaf, for arbitrary URLs, titles and visit times.

use std::sync::Arc;

use eternal_history::managers::record_store::{HistoryStore, InsertOutcome};
use eternal_history::tree_store::MemoryTreeStore;
use eternal_history::types::history::HistoryRecord;
use proptest::prelude::*;
use tokio::runtime::Runtime;

/// Strategy for generating valid URL strings.
fn arb_url() -> impl Strategy<Value = String> {
    (
        prop_oneof![Just("https"), Just("http")],
        "[a-z][a-z0-9]{2,15}",
        prop_oneof![Just(".com"), Just(".org"), Just(".net"), Just(".io")],
        proptest::option::of("/[a-z0-9]{1,10}"),
    )
        .prop_map(|(scheme, host, tld, path)| {
            format!("{}://{}{}{}", scheme, host, tld, path.unwrap_or_default())
        })
}

/// Strategy for generating titles that start with a searchable word.
fn arb_title() -> impl Strategy<Value = String> {
    "[a-zA-Z][a-zA-Z0-9 ]{1,30}"
}

/// Visit times between 2001 and 2100, in milliseconds.
fn arb_time() -> impl Strategy<Value = i64> {
    1_000_000_000_000i64..4_100_000_000_000i64
}

fn runtime() -> Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("Failed to build runtime")
}

// **Property: Record-then-search**
//
// *For any* valid URL, title and visit time, inserting a record then
// searching for the first word of its title SHALL return that record with
// its metadata intact.
proptest! {
    #![proptest_config(ProptestConfig::with_cases(20))]

    #[test]
    fn history_insert_then_search_returns_record(
        url in arb_url(),
        title in arb_title(),
        time in arb_time(),
        visits in 0u32..10_000,
    ) {
        let found = runtime().block_on(async {
            let store = HistoryStore::new(Arc::new(MemoryTreeStore::new()));
            store.initialize().await.expect("initialize failed");
            store
                .insert(&HistoryRecord::new(&url, &title, time, visits))
                .await
                .expect("insert failed");

            let word = title.split_whitespace().next().unwrap_or_default().to_string();
            store.search(&word).await
        });

        let hit = found.iter().find(|r| r.url == url);
        prop_assert!(hit.is_some(), "Search should find the inserted record");
        let hit = hit.unwrap();
        prop_assert_eq!(&hit.title, &title.trim().to_string());
        prop_assert_eq!(hit.last_visit_time, time);
        prop_assert_eq!(hit.visit_count, visits);
    }
}

// **Property: Same-hour idempotence**
//
// *For any* URL recorded several times within one hour, the store SHALL
// keep one leaf and rewrite it each time.
proptest! {
    #![proptest_config(ProptestConfig::with_cases(20))]

    #[test]
    fn history_reinsert_same_hour_updates_single_leaf(
        url in arb_url(),
        titles in proptest::collection::vec(arb_title(), 2..5),
    ) {
        // Top of an hour, so every offset below stays inside it.
        let base = 1_700_000_000_000i64 / 3_600_000 * 3_600_000;

        let outcomes = runtime().block_on(async {
            let store = HistoryStore::new(Arc::new(MemoryTreeStore::new()));
            store.initialize().await.expect("initialize failed");
            let mut outcomes = Vec::new();
            for (i, title) in titles.iter().enumerate() {
                let record = HistoryRecord::new(&url, title, base + i as i64 * 1_000, 1);
                outcomes.push(store.insert(&record).await.expect("insert failed"));
            }
            outcomes
        });

        prop_assert!(matches!(outcomes[0], InsertOutcome::Created(_)));
        for outcome in &outcomes[1..] {
            prop_assert!(matches!(outcome, InsertOutcome::Updated(_)));
            prop_assert_eq!(outcome.id(), outcomes[0].id());
        }
    }
}
