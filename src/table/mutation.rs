//! Mutation engine - from logical mutation to committed snapshot
//!
//! Per VERSIONING.md §3, every mutation follows the same shape:
//! read the latest snapshot's rows, compute the new row set, write it
//! under a fresh data reference, and commit with the read version as the
//! optimistic expectation. Every successful mutation advances the
//! version by exactly 1, whether or not the logical content changed;
//! an update matching zero rows still commits.
//!
//! A lost commit race surfaces as `ConcurrentModification`; the engine
//! never retries on its own. The caller re-reads latest and replays the
//! whole logical operation.

use crate::predicate::{Predicate, RowFilter};
use crate::storage::{Row, RowBackend};
use crate::version::{Snapshot, VersionStore};

use super::errors::TableResult;

/// Field assignments applied by an update: field name to new value.
pub type Assignments = serde_json::Map<String, serde_json::Value>;

/// Applies add / update / delete against the latest snapshot.
pub(crate) struct MutationEngine<'a> {
    store: &'a VersionStore,
    backend: &'a RowBackend,
}

impl<'a> MutationEngine<'a> {
    pub(crate) fn new(store: &'a VersionStore, backend: &'a RowBackend) -> Self {
        Self { store, backend }
    }

    /// Appends rows; the new row count is the old count plus `rows.len()`.
    pub(crate) fn add(&self, rows: Vec<Row>) -> TableResult<Snapshot> {
        self.rewrite(|current| current.extend(rows))
    }

    /// Applies `assignments` to every row satisfying `predicate`.
    ///
    /// The row count never changes. Zero matches is not an error.
    pub(crate) fn update(
        &self,
        predicate: &Predicate,
        assignments: &Assignments,
    ) -> TableResult<Snapshot> {
        self.rewrite(|current| {
            for row in current.iter_mut() {
                if RowFilter::matches(row, predicate) {
                    for (field, value) in assignments {
                        row.insert(field.clone(), value.clone());
                    }
                }
            }
        })
    }

    /// Removes every row satisfying `predicate`.
    pub(crate) fn delete(&self, predicate: &Predicate) -> TableResult<Snapshot> {
        self.rewrite(|current| current.retain(|row| !RowFilter::matches(row, predicate)))
    }

    /// The shared read-modify-commit path.
    fn rewrite<F>(&self, apply: F) -> TableResult<Snapshot>
    where
        F: FnOnce(&mut Vec<Row>),
    {
        let base = self.store.latest()?;
        let mut rows = self
            .backend
            .read_rows(base.data_ref(), base.data_checksum())?;

        apply(&mut rows);

        let row_count = rows.len() as u64;
        let (data_ref, checksum) = self.backend.write_rows(&rows)?;
        let snapshot = self
            .store
            .commit(base.version(), data_ref, checksum, row_count)?;
        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn rows(values: serde_json::Value) -> Vec<Row> {
        values
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_object().unwrap().clone())
            .collect()
    }

    fn fixture(dir: &TempDir) -> (VersionStore, RowBackend) {
        let store = VersionStore::open(dir.path(), "quotes").unwrap();
        let backend = RowBackend::open(dir.path()).unwrap();
        let initial = rows(json!([
            {"id": 1, "author": "Richard"},
            {"id": 2, "author": "Morty"},
            {"id": 3, "author": "Richard"}
        ]));
        let (data_ref, checksum) = backend.write_rows(&initial).unwrap();
        store
            .commit(0, data_ref, checksum, initial.len() as u64)
            .unwrap();
        (store, backend)
    }

    #[test]
    fn test_add_increases_row_count_by_len() {
        let dir = TempDir::new().unwrap();
        let (store, backend) = fixture(&dir);
        let engine = MutationEngine::new(&store, &backend);

        let snapshot = engine
            .add(rows(json!([{"id": 4, "author": "Jerry"}, {"id": 5, "author": "Beth"}])))
            .unwrap();

        assert_eq!(snapshot.version(), 2);
        assert_eq!(snapshot.row_count(), 5);
    }

    #[test]
    fn test_update_preserves_row_count() {
        let dir = TempDir::new().unwrap();
        let (store, backend) = fixture(&dir);
        let engine = MutationEngine::new(&store, &backend);

        let predicate = Predicate::eq("author", json!("Richard"));
        let mut assignments = Assignments::new();
        assignments.insert("author".to_string(), json!("Richard Daniel Sanchez"));

        let snapshot = engine.update(&predicate, &assignments).unwrap();
        assert_eq!(snapshot.version(), 2);
        assert_eq!(snapshot.row_count(), 3);

        let updated = backend
            .read_rows(snapshot.data_ref(), snapshot.data_checksum())
            .unwrap();
        let renamed = updated
            .iter()
            .filter(|r| r.get("author") == Some(&json!("Richard Daniel Sanchez")))
            .count();
        assert_eq!(renamed, 2);
    }

    #[test]
    fn test_update_matching_zero_rows_still_commits() {
        let dir = TempDir::new().unwrap();
        let (store, backend) = fixture(&dir);
        let engine = MutationEngine::new(&store, &backend);

        let predicate = Predicate::eq("author", json!("Nobody"));
        let assignments = Assignments::new();

        let snapshot = engine.update(&predicate, &assignments).unwrap();
        // Content identical to the prior version, but the commit happened
        assert_eq!(snapshot.version(), 2);
        assert_eq!(snapshot.row_count(), 3);
    }

    #[test]
    fn test_delete_removes_match_count() {
        let dir = TempDir::new().unwrap();
        let (store, backend) = fixture(&dir);
        let engine = MutationEngine::new(&store, &backend);

        let snapshot = engine
            .delete(&Predicate::eq("author", json!("Richard")))
            .unwrap();
        assert_eq!(snapshot.row_count(), 1);

        let remaining = backend
            .read_rows(snapshot.data_ref(), snapshot.data_checksum())
            .unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].get("author"), Some(&json!("Morty")));
    }

    #[test]
    fn test_every_mutation_advances_version_by_one() {
        let dir = TempDir::new().unwrap();
        let (store, backend) = fixture(&dir);
        let engine = MutationEngine::new(&store, &backend);

        engine.add(rows(json!([{"id": 4}]))).unwrap();
        engine
            .delete(&Predicate::eq("author", json!("Morty")))
            .unwrap();
        engine
            .update(&Predicate::eq("id", json!(1)), &Assignments::new())
            .unwrap();

        assert_eq!(store.latest_version(), 4);
    }
}
