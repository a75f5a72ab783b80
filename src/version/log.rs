//! VersionLog - Append-only ordered history of snapshots
//!
//! Per VERSIONING.md §2:
//! - Versions are strictly increasing, gap-free, duplicate-free
//! - A new snapshot's version is always `latest + 1`, even when created
//!   by restore (restore never reuses or removes a version number)
//! - Owned exclusively by the VersionStore
//!
//! The container enforces the numbering invariant structurally: an append
//! that would create a gap or duplicate is rejected, never reordered.

use super::errors::{VersionError, VersionResult};
use super::snapshot::Snapshot;

/// Append-only ordered sequence of snapshots, keyed by version number.
#[derive(Debug, Default)]
pub struct VersionLog {
    /// Snapshots in version order; `snapshots[i].version() == i + 1`
    snapshots: Vec<Snapshot>,
}

impl VersionLog {
    /// Creates an empty log.
    pub fn new() -> Self {
        Self {
            snapshots: Vec::new(),
        }
    }

    /// Appends a snapshot.
    ///
    /// The snapshot's version must be exactly `latest + 1`; anything else
    /// means the caller (or a replayed manifest directory) is corrupt.
    pub fn append(&mut self, snapshot: Snapshot) -> VersionResult<()> {
        let expected = self.latest_version() + 1;
        if snapshot.version() != expected {
            return Err(VersionError::log_corrupted(format!(
                "append of version {} but next version is {}",
                snapshot.version(),
                expected
            )));
        }
        self.snapshots.push(snapshot);
        Ok(())
    }

    /// Returns the current maximum version number (0 for an empty log).
    #[inline]
    pub fn latest_version(&self) -> u64 {
        self.snapshots.len() as u64
    }

    /// Returns the latest snapshot, if any.
    pub fn latest(&self) -> Option<&Snapshot> {
        self.snapshots.last()
    }

    /// Looks up a snapshot by version number.
    pub fn get(&self, version: u64) -> Option<&Snapshot> {
        if version == 0 {
            return None;
        }
        self.snapshots.get((version - 1) as usize)
    }

    /// Returns all snapshots in ascending version order.
    #[inline]
    pub fn snapshots(&self) -> &[Snapshot] {
        &self.snapshots
    }

    /// Returns the number of snapshots.
    #[inline]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Returns true if the log holds no snapshots.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}
