//! Restore - promote a pinned historical version to a new latest
//!
//! Per TIMETRAVEL.md §4:
//! - Restore never deletes or rewrites history; it commits a NEW
//!   snapshot whose data reference and row count are copied verbatim
//!   from the pinned version
//! - The new snapshot receives `latest + 1`, never the pinned number:
//!   restoring always grows the log by one entry, even when the pinned
//!   version is already the latest ("more versions, not fewer")
//!
//! The data reference is shared, not copied: row files are immutable, so
//! the restored snapshot and its source resolve to the same bytes.

use crate::observability::Logger;
use crate::version::{Snapshot, VersionStore};

use super::errors::TableResult;

/// Commits a new latest snapshot with the content of `pinned_version`.
///
/// A commit race surfaces as `ConcurrentModification`, exactly like a
/// mutation; the log is unchanged in that case.
pub(crate) fn restore_version(store: &VersionStore, pinned_version: u64) -> TableResult<Snapshot> {
    let source = store.get(pinned_version)?;

    let expected = store.latest_version();
    let snapshot = store.commit(
        expected,
        source.data_ref().clone(),
        source.data_checksum(),
        source.row_count(),
    )?;

    Logger::info(
        "VERSION_RESTORED",
        &[
            ("table", store.table_id()),
            ("restored_from", &pinned_version.to_string()),
            ("new_version", &snapshot.version().to_string()),
        ],
    );

    Ok(snapshot)
}
