//! Table handle - one session over a shared version store
//!
//! Per TIMETRAVEL.md §2, a handle is mutable session state over an
//! otherwise shared immutable log: it carries the checkout state machine
//! and resolves every read through it. Many handles may share one store;
//! each pins independently.
//!
//! The caller-facing surface: `add`, `update`, `delete`, `count_rows`,
//! `scan`, `version`, `list_versions`, `checkout`, `checkout_latest`,
//! `restore`.

use std::sync::Arc;

use uuid::Uuid;

use crate::observability::Logger;
use crate::predicate::Predicate;
use crate::storage::{Row, RowBackend};
use crate::version::{Snapshot, VersionStore};

use super::checkout::CheckoutState;
use super::errors::{TableError, TableResult};
use super::mutation::{Assignments, MutationEngine};
use super::restore;

/// A handle to a versioned table.
///
/// Cheap to create; holds shared references to the table's authoritative
/// version store and row backend plus this session's checkout state.
#[derive(Debug)]
pub struct Table {
    /// Table identity
    table_id: String,
    /// Session identity, for log correlation only
    session_id: Uuid,
    /// Active-version state of this handle
    state: CheckoutState,
    /// Shared authoritative version log
    store: Arc<VersionStore>,
    /// Shared row backend
    backend: Arc<RowBackend>,
}

impl Table {
    pub(crate) fn new(
        table_id: impl Into<String>,
        store: Arc<VersionStore>,
        backend: Arc<RowBackend>,
    ) -> Self {
        Self {
            table_id: table_id.into(),
            session_id: Uuid::new_v4(),
            state: CheckoutState::Latest,
            store,
            backend,
        }
    }

    /// Returns the table name.
    pub fn name(&self) -> &str {
        &self.table_id
    }

    /// Returns this handle's checkout state.
    pub fn checkout_state(&self) -> CheckoutState {
        self.state
    }

    /// Returns the version this handle currently resolves to.
    ///
    /// `Latest` resolves through the store; a pinned handle returns its
    /// pinned version regardless of later commits.
    pub fn version(&self) -> u64 {
        match self.state {
            CheckoutState::Latest => self.store.latest_version(),
            CheckoutState::Pinned(v) => v,
        }
    }

    /// Returns all snapshots in ascending version order.
    pub fn list_versions(&self) -> Vec<Snapshot> {
        self.store.list_versions()
    }

    /// Pins this handle to a historical version.
    ///
    /// Fails with `VersionNotFound` if the version is not in the log.
    /// Subsequent reads resolve against that snapshot; mutations are
    /// rejected until `checkout_latest`.
    pub fn checkout(&mut self, version: u64) -> TableResult<()> {
        self.store.get(version)?;
        self.state = CheckoutState::Pinned(version);
        Logger::info(
            "CHECKOUT",
            &[
                ("session", &self.session_id.to_string()),
                ("table", &self.table_id),
                ("version", &version.to_string()),
            ],
        );
        Ok(())
    }

    /// Returns this handle to following latest. Always succeeds.
    pub fn checkout_latest(&mut self) {
        self.state = CheckoutState::Latest;
        Logger::info(
            "CHECKOUT_LATEST",
            &[
                ("session", &self.session_id.to_string()),
                ("table", &self.table_id),
            ],
        );
    }

    /// Promotes the pinned version's content to a new latest snapshot,
    /// then returns the handle to `Latest`.
    ///
    /// Fails with `NothingToRestore` if no checkout preceded it in this
    /// session. History is never truncated: the log grows by one.
    pub fn restore(&mut self) -> TableResult<Snapshot> {
        let pinned = match self.state {
            CheckoutState::Latest => return Err(TableError::NothingToRestore),
            CheckoutState::Pinned(v) => v,
        };
        let snapshot = restore::restore_version(&self.store, pinned)?;
        self.state = CheckoutState::Latest;
        Ok(snapshot)
    }

    /// Appends rows as a new version.
    pub fn add(&self, rows: Vec<Row>) -> TableResult<Snapshot> {
        self.require_latest()?;
        MutationEngine::new(&self.store, &self.backend).add(rows)
    }

    /// Updates rows matching a predicate string, e.g.
    /// `table.update("author = 'Richard'", assignments)`.
    pub fn update(&self, where_clause: &str, assignments: &Assignments) -> TableResult<Snapshot> {
        let predicate = Predicate::parse(where_clause)?;
        self.update_where(&predicate, assignments)
    }

    /// Updates rows matching an already-built predicate.
    pub fn update_where(
        &self,
        predicate: &Predicate,
        assignments: &Assignments,
    ) -> TableResult<Snapshot> {
        self.require_latest()?;
        MutationEngine::new(&self.store, &self.backend).update(predicate, assignments)
    }

    /// Deletes rows matching a predicate string.
    pub fn delete(&self, where_clause: &str) -> TableResult<Snapshot> {
        let predicate = Predicate::parse(where_clause)?;
        self.delete_where(&predicate)
    }

    /// Deletes rows matching an already-built predicate.
    pub fn delete_where(&self, predicate: &Predicate) -> TableResult<Snapshot> {
        self.require_latest()?;
        MutationEngine::new(&self.store, &self.backend).delete(predicate)
    }

    /// Returns the row count at this handle's active version.
    pub fn count_rows(&self) -> TableResult<u64> {
        Ok(self.current_snapshot()?.row_count())
    }

    /// Returns the rows at this handle's active version.
    pub fn scan(&self) -> TableResult<Vec<Row>> {
        let snapshot = self.current_snapshot()?;
        let rows = self
            .backend
            .read_rows(snapshot.data_ref(), snapshot.data_checksum())?;
        Ok(rows)
    }

    /// Resolves the snapshot this handle currently reads from.
    pub fn current_snapshot(&self) -> TableResult<Snapshot> {
        let snapshot = match self.state {
            CheckoutState::Latest => self.store.latest()?,
            CheckoutState::Pinned(v) => self.store.get(v)?,
        };
        Ok(snapshot)
    }

    /// Mutations are only permitted against latest.
    fn require_latest(&self) -> TableResult<()> {
        match self.state {
            CheckoutState::Latest => Ok(()),
            CheckoutState::Pinned(version) => Err(TableError::ReadOnlyCheckout { version }),
        }
    }
}
