//! Row data backend
//!
//! Per VERSIONING.md §5, the version log treats row data as opaque: a
//! snapshot carries only a `DataRef` and the checksum recorded when the
//! data was written. This module owns the other side of that contract:
//! writing a row set to durable storage and reading it back, verified.
//!
//! Row files are immutable once written. A mutation never rewrites an
//! existing file; it writes a new one under a fresh reference, so every
//! historical snapshot keeps resolving to exactly the rows it committed.

mod backend;
mod checksum;
mod errors;

pub use backend::RowBackend;
pub use checksum::{compute_checksum, verify_checksum};
pub use errors::{Severity, StorageError, StorageErrorCode, StorageResult};

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A table row: a JSON object mapping field names to values.
pub type Row = serde_json::Map<String, serde_json::Value>;

/// Opaque handle to the row data of one snapshot.
///
/// The version log stores and compares these but never looks inside;
/// only the [`RowBackend`] can resolve one to actual rows.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DataRef(String);

impl DataRef {
    /// Mint a fresh reference for a new row file.
    pub(crate) fn generate() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    /// Reconstruct a reference from its persisted form.
    pub(crate) fn from_string(raw: String) -> Self {
        Self(raw)
    }

    /// Returns the reference as a string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DataRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
