//! Version-Log Invariant Tests
//!
//! Tests for the core versioning invariants:
//! - N successful mutations from an empty table produce exactly N+1
//!   versions, numbered 1..=N+1, timestamps non-decreasing
//! - update never changes the row count; delete decreases it by exactly
//!   the match count; add increases it by the number of added rows
//! - every successful mutation advances the version by exactly 1, even
//!   when the logical content is unchanged
//! - mutations attempted while pinned fail and leave the log unchanged

use chronodb::storage::Row;
use chronodb::table::TableError;
use chronodb::{connect, CreateTableMode};
use serde_json::json;
use tempfile::TempDir;

// =============================================================================
// Test Utilities
// =============================================================================

fn rows(values: serde_json::Value) -> Vec<Row> {
    values
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_object().unwrap().clone())
        .collect()
}

fn quotes_rows() -> Vec<Row> {
    rows(json!([
        {"id": 1, "author": "Richard", "quote": "Wubba Lubba Dub Dub!"},
        {"id": 2, "author": "Morty", "quote": "Rick, what's going on?"},
        {"id": 3, "author": "Richard", "quote": "I turned myself into a pickle, Morty!"}
    ]))
}

// =============================================================================
// Version Numbering
// =============================================================================

/// N mutations on a fresh table yield versions 1..=N+1, no gaps.
#[test]
fn test_n_mutations_yield_n_plus_one_versions() {
    let dir = TempDir::new().unwrap();
    let db = connect(dir.path()).unwrap();
    let table = db
        .create_table("quotes", quotes_rows(), CreateTableMode::Create)
        .unwrap();

    for i in 0..5 {
        table.add(rows(json!([{"id": 100 + i}]))).unwrap();
    }

    let versions = table.list_versions();
    assert_eq!(versions.len(), 6);

    let numbers: Vec<u64> = versions.iter().map(|s| s.version()).collect();
    assert_eq!(numbers, vec![1, 2, 3, 4, 5, 6]);
}

/// Timestamps along the log never decrease.
#[test]
fn test_timestamps_non_decreasing() {
    let dir = TempDir::new().unwrap();
    let db = connect(dir.path()).unwrap();
    let table = db
        .create_table("quotes", quotes_rows(), CreateTableMode::Create)
        .unwrap();

    for i in 0..4 {
        table.add(rows(json!([{"id": 10 + i}]))).unwrap();
    }

    let versions = table.list_versions();
    for pair in versions.windows(2) {
        assert!(pair[0].timestamp() <= pair[1].timestamp());
    }
}

// =============================================================================
// Row-Count Laws
// =============================================================================

/// update never changes the row count.
#[test]
fn test_update_preserves_row_count() {
    let dir = TempDir::new().unwrap();
    let db = connect(dir.path()).unwrap();
    let table = db
        .create_table("quotes", quotes_rows(), CreateTableMode::Create)
        .unwrap();

    let mut values = chronodb::table::Assignments::new();
    values.insert("author".to_string(), json!("Richard Daniel Sanchez"));
    table.update("author = 'Richard'", &values).unwrap();

    assert_eq!(table.count_rows().unwrap(), 3);
    assert_eq!(table.version(), 2);
}

/// add increases the row count by exactly the number of added rows.
#[test]
fn test_add_increases_row_count_by_len() {
    let dir = TempDir::new().unwrap();
    let db = connect(dir.path()).unwrap();
    let table = db
        .create_table("quotes", quotes_rows(), CreateTableMode::Create)
        .unwrap();

    table
        .add(rows(json!([
            {"id": 4, "author": "Richard Daniel Sanchez", "quote": "That's the way the news goes!"},
            {"id": 5, "author": "Morty", "quote": "Aww geez, Rick!"}
        ])))
        .unwrap();

    assert_eq!(table.count_rows().unwrap(), 5);
}

/// delete decreases the row count by exactly the match count.
#[test]
fn test_delete_decreases_by_match_count() {
    let dir = TempDir::new().unwrap();
    let db = connect(dir.path()).unwrap();
    let table = db
        .create_table("quotes", quotes_rows(), CreateTableMode::Create)
        .unwrap();

    // Two rows match author = 'Richard'
    table.delete("author = 'Richard'").unwrap();
    assert_eq!(table.count_rows().unwrap(), 1);

    // Zero rows match: row count preserved, version still advances
    table.delete("author = 'Nobody'").unwrap();
    assert_eq!(table.count_rows().unwrap(), 1);
    assert_eq!(table.version(), 3);
}

/// An update matching zero rows still commits a new version with
/// identical content.
#[test]
fn test_zero_match_update_still_commits() {
    let dir = TempDir::new().unwrap();
    let db = connect(dir.path()).unwrap();
    let table = db
        .create_table("quotes", quotes_rows(), CreateTableMode::Create)
        .unwrap();

    let before = table.scan().unwrap();

    let mut values = chronodb::table::Assignments::new();
    values.insert("author".to_string(), json!("Ghost"));
    table.update("author = 'Nobody'", &values).unwrap();

    assert_eq!(table.version(), 2);
    assert_eq!(table.scan().unwrap(), before);
}

// =============================================================================
// Read-Only Checkout
// =============================================================================

/// Mutations while pinned fail with ReadOnlyCheckout and leave the log
/// unchanged.
#[test]
fn test_pinned_handle_rejects_mutations() {
    let dir = TempDir::new().unwrap();
    let db = connect(dir.path()).unwrap();
    let mut table = db
        .create_table("quotes", quotes_rows(), CreateTableMode::Create)
        .unwrap();

    table.add(rows(json!([{"id": 4}]))).unwrap();
    table.checkout(1).unwrap();

    let err = table.add(rows(json!([{"id": 5}]))).unwrap_err();
    assert!(matches!(err, TableError::ReadOnlyCheckout { version: 1 }));
    assert_eq!(err.code(), "CHRONO_READ_ONLY_CHECKOUT");

    let mut values = chronodb::table::Assignments::new();
    values.insert("author".to_string(), json!("X"));
    assert!(matches!(
        table.update("id = 1", &values).unwrap_err(),
        TableError::ReadOnlyCheckout { .. }
    ));
    assert!(matches!(
        table.delete("id = 1").unwrap_err(),
        TableError::ReadOnlyCheckout { .. }
    ));

    // Log unchanged by the rejected mutations
    assert_eq!(table.list_versions().len(), 2);

    // Back on latest, mutations are permitted again
    table.checkout_latest();
    table.add(rows(json!([{"id": 5}]))).unwrap();
    assert_eq!(table.list_versions().len(), 3);
}
