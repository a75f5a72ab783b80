//! Connection error types following ERRORS.md
//!
//! Error codes introduced here:
//! - CHRONO_INVALID_TABLE_NAME
//! - CHRONO_TABLE_EXISTS
//! - CHRONO_TABLE_NOT_FOUND
//! - CHRONO_CONNECTION_IO
//!
//! Version-log and storage errors pass through unchanged.

use std::fmt;
use std::io;

use crate::storage::StorageError;
use crate::version::VersionError;

/// Result type for connection operations
pub type ConnectionResult<T> = Result<T, ConnectionError>;

/// Errors from connection and table-registry operations
#[derive(Debug)]
pub enum ConnectionError {
    /// Table name failed validation
    InvalidTableName {
        name: String,
        reason: &'static str,
    },

    /// `create_table` in `Create` mode found an existing table
    TableExists {
        name: String,
    },

    /// `open_table` found no such table
    TableNotFound {
        name: String,
    },

    /// Filesystem failure at the connection level
    Io {
        message: String,
        source: io::Error,
    },

    /// Version-log failure while creating or opening a table
    Version(VersionError),

    /// Row backend failure while creating or opening a table
    Storage(StorageError),
}

impl ConnectionError {
    /// Create a connection I/O error
    pub fn io(message: impl Into<String>, source: io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source,
        }
    }

    /// Returns the stable error code, per ERRORS.md
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidTableName { .. } => "CHRONO_INVALID_TABLE_NAME",
            Self::TableExists { .. } => "CHRONO_TABLE_EXISTS",
            Self::TableNotFound { .. } => "CHRONO_TABLE_NOT_FOUND",
            Self::Io { .. } => "CHRONO_CONNECTION_IO",
            Self::Version(e) => e.code(),
            Self::Storage(e) => e.code().code(),
        }
    }
}

impl fmt::Display for ConnectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidTableName { name, reason } => {
                write!(f, "[{}] invalid table name {:?}: {}", self.code(), name, reason)
            }
            Self::TableExists { name } => {
                write!(f, "[{}] table {:?} already exists", self.code(), name)
            }
            Self::TableNotFound { name } => {
                write!(f, "[{}] table {:?} not found", self.code(), name)
            }
            Self::Io { message, .. } => write!(f, "[{}] {}", self.code(), message),
            Self::Version(e) => write!(f, "{}", e),
            Self::Storage(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for ConnectionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Version(e) => Some(e),
            Self::Storage(e) => Some(e),
            _ => None,
        }
    }
}

impl From<VersionError> for ConnectionError {
    fn from(e: VersionError) -> Self {
        Self::Version(e)
    }
}

impl From<StorageError> for ConnectionError {
    fn from(e: StorageError) -> Self {
        Self::Storage(e)
    }
}
