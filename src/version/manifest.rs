//! Snapshot manifest structure and serialization
//!
//! Per VERSIONING.md §4:
//! The manifest directory is the durable form of the version log: one
//! JSON file per version under `_versions/`, fsynced before the commit
//! is acknowledged, never rewritten.
//!
//! Format:
//! ```json
//! {
//!   "format_version": 1,
//!   "version": 3,
//!   "created_at": "2026-08-23T11:30:00Z",
//!   "row_count": 5,
//!   "data_ref": "8f14e45fceea167a5a36dedd4bea2543",
//!   "data_checksum": 3735928559
//! }
//! ```

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::errors::{VersionError, VersionResult};
use super::snapshot::Snapshot;
use crate::storage::DataRef;

/// Manifest format version written by this crate.
const FORMAT_VERSION: u8 = 1;

/// The durable JSON descriptor of one snapshot.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SnapshotManifest {
    /// Manifest format version (always 1)
    pub format_version: u8,

    /// Version number of the snapshot
    pub version: u64,

    /// Creation timestamp (UTC, RFC3339)
    pub created_at: DateTime<Utc>,

    /// Row count at this version
    pub row_count: u64,

    /// Opaque row-data reference
    pub data_ref: String,

    /// CRC32 of the row file
    pub data_checksum: u32,
}

impl SnapshotManifest {
    /// Builds the manifest for a snapshot.
    pub fn from_snapshot(snapshot: &Snapshot) -> Self {
        Self {
            format_version: FORMAT_VERSION,
            version: snapshot.version(),
            created_at: snapshot.timestamp(),
            row_count: snapshot.row_count(),
            data_ref: snapshot.data_ref().as_str().to_string(),
            data_checksum: snapshot.data_checksum(),
        }
    }

    /// Reconstructs the in-memory snapshot this manifest describes.
    pub fn into_snapshot(self) -> Snapshot {
        Snapshot::new(
            self.version,
            self.created_at,
            self.row_count,
            DataRef::from_string(self.data_ref),
            self.data_checksum,
        )
    }

    /// File name of the manifest for a version.
    ///
    /// Zero-padded so lexical directory order equals version order.
    pub fn file_name(version: u64) -> String {
        format!("{:010}.json", version)
    }

    /// Serializes the manifest to pretty-printed JSON.
    pub fn to_json(&self) -> VersionResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| {
            VersionError::manifest_format(format!("Failed to serialize manifest: {}", e))
        })
    }

    /// Deserializes a manifest from JSON.
    pub fn from_json(json: &str) -> VersionResult<Self> {
        let manifest: Self = serde_json::from_str(json)
            .map_err(|e| VersionError::manifest_format(format!("Failed to parse manifest: {}", e)))?;
        if manifest.format_version != FORMAT_VERSION {
            return Err(VersionError::manifest_format(format!(
                "Unsupported manifest format version: {}",
                manifest.format_version
            )));
        }
        Ok(manifest)
    }

    /// Writes the manifest to a file with fsync.
    ///
    /// The file and its parent directory are fsynced before returning;
    /// a commit is only acknowledged once its manifest is durable.
    pub fn write_to_file(&self, path: &Path) -> VersionResult<()> {
        let json = self.to_json()?;

        let mut file = File::create(path).map_err(|e| {
            VersionError::manifest_io(
                format!("Failed to create manifest file: {}", path.display()),
                e,
            )
        })?;
        file.write_all(json.as_bytes()).map_err(|e| {
            VersionError::manifest_io(format!("Failed to write manifest: {}", path.display()), e)
        })?;
        file.sync_all().map_err(|e| {
            VersionError::manifest_io(format!("Failed to fsync manifest: {}", path.display()), e)
        })?;

        if let Some(parent) = path.parent() {
            fsync_dir(parent)?;
        }

        Ok(())
    }

    /// Reads a manifest from a file.
    pub fn read_from_file(path: &Path) -> VersionResult<Self> {
        let json = fs::read_to_string(path).map_err(|e| {
            VersionError::manifest_io(format!("Failed to read manifest: {}", path.display()), e)
        })?;
        Self::from_json(&json)
    }

    /// Loads all manifests in a directory, sorted by version.
    ///
    /// Only `*.json` entries are considered; the caller replays the result
    /// into a `VersionLog`, which enforces the gap-free invariant.
    pub fn load_dir(dir: &Path) -> VersionResult<Vec<Self>> {
        let entries = fs::read_dir(dir).map_err(|e| {
            VersionError::manifest_io(
                format!("Failed to read manifest directory: {}", dir.display()),
                e,
            )
        })?;

        let mut manifests = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| {
                VersionError::manifest_io(
                    format!("Failed to read manifest directory: {}", dir.display()),
                    e,
                )
            })?;
            let path: PathBuf = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            manifests.push(Self::read_from_file(&path)?);
        }

        manifests.sort_by_key(|m| m.version);
        Ok(manifests)
    }
}

/// fsync a directory so a newly created manifest entry is durable.
fn fsync_dir(dir: &Path) -> VersionResult<()> {
    let d = OpenOptions::new()
        .read(true)
        .open(dir)
        .map_err(|e| VersionError::manifest_io(format!("Failed to open {}", dir.display()), e))?;
    d.sync_all()
        .map_err(|e| VersionError::manifest_io(format!("Failed to fsync {}", dir.display()), e))
}
