//! VersionStore - The sole commit entry point for a table
//!
//! Per VERSIONING.md §3:
//! - One authoritative store per table identity; concurrent handles hold
//!   only an `Arc` to it, never a copy
//! - `commit` is serialized behind the log lock and uses optimistic
//!   concurrency: the caller names the latest version it computed
//!   against, and the commit fails if another commit got there first
//! - A failed commit leaves both the in-memory log and the manifest
//!   directory unchanged
//! - Reads never block writers longer than a log clone takes and always
//!   observe a consistent log as of the call

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::Utc;

use super::errors::{VersionError, VersionResult};
use super::log::VersionLog;
use super::manifest::SnapshotManifest;
use super::snapshot::Snapshot;
use crate::observability::Logger;
use crate::storage::DataRef;

/// Name of the manifest directory inside a table directory.
const VERSIONS_DIR: &str = "_versions";

/// Durable, append-only log of immutable table snapshots.
#[derive(Debug)]
pub struct VersionStore {
    /// Table this store is authoritative for
    table_id: String,
    /// Directory holding one manifest file per version
    versions_dir: PathBuf,
    /// The log itself; the lock serializes commits per table
    log: Mutex<VersionLog>,
}

impl VersionStore {
    /// Opens the version store for a table, replaying any manifests
    /// already on disk.
    ///
    /// Creates the manifest directory if missing (a brand-new table).
    /// Replay feeds manifests through `VersionLog::append`, so a manifest
    /// directory with gaps or duplicates fails loudly here.
    pub fn open(table_dir: &Path, table_id: impl Into<String>) -> VersionResult<Self> {
        let table_id = table_id.into();
        let versions_dir = table_dir.join(VERSIONS_DIR);

        if !versions_dir.exists() {
            std::fs::create_dir_all(&versions_dir).map_err(|e| {
                VersionError::manifest_io(
                    format!(
                        "Failed to create versions directory: {}",
                        versions_dir.display()
                    ),
                    e,
                )
            })?;
        }

        let mut log = VersionLog::new();
        for manifest in SnapshotManifest::load_dir(&versions_dir)? {
            log.append(manifest.into_snapshot())?;
        }

        Ok(Self {
            table_id,
            versions_dir,
            log: Mutex::new(log),
        })
    }

    /// Returns the table identity this store is authoritative for.
    pub fn table_id(&self) -> &str {
        &self.table_id
    }

    /// Commits a new snapshot with version `latest + 1`.
    ///
    /// `expected_version` is the latest version the caller read before
    /// computing its new data state. If another commit advanced the log
    /// in the meantime the commit fails with `ConcurrentModification`
    /// and the caller must re-read latest and retry the whole logical
    /// operation. The store never auto-retries.
    ///
    /// The manifest is written and fsynced before the in-memory log
    /// advances; on any failure the log is unchanged.
    pub fn commit(
        &self,
        expected_version: u64,
        data_ref: DataRef,
        data_checksum: u32,
        row_count: u64,
    ) -> VersionResult<Snapshot> {
        let mut log = self.log.lock().unwrap();

        let actual = log.latest_version();
        if actual != expected_version {
            Logger::warn(
                "COMMIT_CONFLICT",
                &[
                    ("table", &self.table_id),
                    ("expected", &expected_version.to_string()),
                    ("actual", &actual.to_string()),
                ],
            );
            return Err(VersionError::ConcurrentModification {
                expected: expected_version,
                actual,
            });
        }

        let version = actual + 1;

        // Wall clocks can step backwards; timestamps within a log do not.
        let mut timestamp = Utc::now();
        if let Some(latest) = log.latest() {
            if timestamp < latest.timestamp() {
                timestamp = latest.timestamp();
            }
        }

        let snapshot = Snapshot::new(version, timestamp, row_count, data_ref, data_checksum);

        let manifest = SnapshotManifest::from_snapshot(&snapshot);
        let path = self.versions_dir.join(SnapshotManifest::file_name(version));
        manifest.write_to_file(&path)?;

        log.append(snapshot.clone())?;

        Logger::info(
            "VERSION_COMMITTED",
            &[
                ("table", &self.table_id),
                ("version", &version.to_string()),
                ("row_count", &row_count.to_string()),
            ],
        );

        Ok(snapshot)
    }

    /// Looks up a snapshot by version number.
    pub fn get(&self, version: u64) -> VersionResult<Snapshot> {
        let log = self.log.lock().unwrap();
        log.get(version)
            .cloned()
            .ok_or(VersionError::VersionNotFound { version })
    }

    /// Returns all snapshots in ascending version order.
    ///
    /// Recomputed on each call; the result is a point-in-time copy, not a
    /// live cursor.
    pub fn list_versions(&self) -> Vec<Snapshot> {
        let log = self.log.lock().unwrap();
        log.snapshots().to_vec()
    }

    /// Returns the current maximum version number (0 for an empty store).
    pub fn latest_version(&self) -> u64 {
        let log = self.log.lock().unwrap();
        log.latest_version()
    }

    /// Returns the latest snapshot, failing on an empty store.
    pub fn latest(&self) -> VersionResult<Snapshot> {
        let log = self.log.lock().unwrap();
        log.latest()
            .cloned()
            .ok_or(VersionError::VersionNotFound { version: 0 })
    }
}
