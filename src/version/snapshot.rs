//! Snapshot - Immutable record of table content at one version
//!
//! Per VERSIONING.md §2:
//! - A snapshot is created by a mutation commit or a restore commit
//! - Once created, never changes; never deleted (the log is append-only)
//! - `row_count` and `data_ref` reflect exactly the rows present
//!   immediately after the mutation that produced the snapshot
//!
//! This is a PURE TYPE with no behavior beyond construction and access.
//! All fields are private to enforce immutability.

use chrono::{DateTime, Utc};

use crate::storage::DataRef;

/// Immutable record of table content at one version.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Snapshot {
    /// Version number, >= 1, assigned by the version store
    version: u64,
    /// Wall-clock creation time (UTC)
    timestamp: DateTime<Utc>,
    /// Number of rows at this version
    row_count: u64,
    /// Opaque handle to the row data at this version
    data_ref: DataRef,
    /// CRC32 of the row file, fixed at write time
    data_checksum: u32,
}

impl Snapshot {
    /// Creates a new snapshot.
    ///
    /// After construction, the snapshot cannot be modified.
    pub fn new(
        version: u64,
        timestamp: DateTime<Utc>,
        row_count: u64,
        data_ref: DataRef,
        data_checksum: u32,
    ) -> Self {
        Self {
            version,
            timestamp,
            row_count,
            data_ref,
            data_checksum,
        }
    }

    /// Returns the version number.
    #[inline]
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Returns the creation timestamp.
    #[inline]
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Returns the row count at this version.
    #[inline]
    pub fn row_count(&self) -> u64 {
        self.row_count
    }

    /// Returns the opaque row-data reference.
    #[inline]
    pub fn data_ref(&self) -> &DataRef {
        &self.data_ref
    }

    /// Returns the CRC32 recorded when the row data was written.
    #[inline]
    pub fn data_checksum(&self) -> u32 {
        self.data_checksum
    }
}
