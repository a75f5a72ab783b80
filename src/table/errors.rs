//! Table-level error types following ERRORS.md
//!
//! Error codes introduced here:
//! - CHRONO_READ_ONLY_CHECKOUT (mutation attempted while pinned)
//! - CHRONO_NOTHING_TO_RESTORE (restore without a prior checkout)
//!
//! Version-log, storage, and predicate errors pass through unchanged so
//! callers can match on the underlying cause. Every error is scoped to
//! the failing call: the version log is unchanged on any failure.

use std::fmt;

use crate::predicate::PredicateError;
use crate::storage::StorageError;
use crate::version::VersionError;

/// Result type for table operations
pub type TableResult<T> = Result<T, TableError>;

/// Errors from table operations
#[derive(Debug)]
pub enum TableError {
    /// Mutation attempted while the handle is pinned to a historical
    /// version; mutations are only permitted against latest
    ReadOnlyCheckout {
        /// The version the handle is pinned to
        version: u64,
    },

    /// Restore called on a handle that has no pinned version
    NothingToRestore,

    /// Version-log failure (not found, commit conflict, manifest I/O)
    Version(VersionError),

    /// Row backend failure (I/O, corruption)
    Storage(StorageError),

    /// Predicate parse failure
    Predicate(PredicateError),
}

impl TableError {
    /// Returns the stable error code, per ERRORS.md
    pub fn code(&self) -> &'static str {
        match self {
            Self::ReadOnlyCheckout { .. } => "CHRONO_READ_ONLY_CHECKOUT",
            Self::NothingToRestore => "CHRONO_NOTHING_TO_RESTORE",
            Self::Version(e) => e.code(),
            Self::Storage(e) => e.code().code(),
            Self::Predicate(e) => e.code(),
        }
    }

    /// Returns true if the caller can recover by retrying the whole
    /// logical operation against the new latest version
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Version(e) if e.is_retryable())
    }
}

impl fmt::Display for TableError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ReadOnlyCheckout { version } => write!(
                f,
                "[{}] handle is pinned to version {}; mutations require latest",
                self.code(),
                version
            ),
            Self::NothingToRestore => write!(
                f,
                "[{}] restore requires a prior checkout in this session",
                self.code()
            ),
            Self::Version(e) => write!(f, "{}", e),
            Self::Storage(e) => write!(f, "{}", e),
            Self::Predicate(e) => write!(f, "[{}] {}", e.code(), e),
        }
    }
}

impl std::error::Error for TableError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Version(e) => Some(e),
            Self::Storage(e) => Some(e),
            Self::Predicate(e) => Some(e),
            _ => None,
        }
    }
}

impl From<VersionError> for TableError {
    fn from(e: VersionError) -> Self {
        Self::Version(e)
    }
}

impl From<StorageError> for TableError {
    fn from(e: StorageError) -> Self {
        Self::Storage(e)
    }
}

impl From<PredicateError> for TableError {
    fn from(e: PredicateError) -> Self {
        Self::Predicate(e)
    }
}
