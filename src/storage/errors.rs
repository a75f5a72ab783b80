//! Storage error types following ERRORS.md
//!
//! Error codes:
//! - CHRONO_STORAGE_IO_ERROR (ERROR severity)
//! - CHRONO_STORAGE_WRITE_FAILED (ERROR severity)
//! - CHRONO_STORAGE_READ_FAILED (ERROR severity)
//! - CHRONO_DATA_CORRUPTION (ERROR severity)
//!
//! No storage error is fatal to the process: each is scoped to the
//! failing call, and a failed write leaves the version log unchanged.

use std::fmt;
use std::io;

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Severity levels for storage errors as defined in ERRORS.md
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Operation fails, the store continues
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "ERROR"),
        }
    }
}

/// Storage-specific error codes as defined in ERRORS.md
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageErrorCode {
    /// Disk I/O failure
    ChronoStorageIoError,
    /// Row file write failed
    ChronoStorageWriteFailed,
    /// Row file read failed
    ChronoStorageReadFailed,
    /// Row file checksum failure
    ChronoDataCorruption,
}

impl StorageErrorCode {
    /// Returns the string code as defined in ERRORS.md
    pub fn code(&self) -> &'static str {
        match self {
            StorageErrorCode::ChronoStorageIoError => "CHRONO_STORAGE_IO_ERROR",
            StorageErrorCode::ChronoStorageWriteFailed => "CHRONO_STORAGE_WRITE_FAILED",
            StorageErrorCode::ChronoStorageReadFailed => "CHRONO_STORAGE_READ_FAILED",
            StorageErrorCode::ChronoDataCorruption => "CHRONO_DATA_CORRUPTION",
        }
    }

    /// Returns the severity level for this error
    pub fn severity(&self) -> Severity {
        Severity::Error
    }
}

impl fmt::Display for StorageErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Storage error type with full context as required by ERRORS.md
#[derive(Debug)]
pub struct StorageError {
    /// Error code
    code: StorageErrorCode,
    /// Human-readable message
    message: String,
    /// Optional details about the error context
    details: Option<String>,
    /// Underlying IO error if applicable
    source: Option<io::Error>,
}

impl StorageError {
    /// Create a new storage I/O error
    pub fn io_error(message: impl Into<String>, source: io::Error) -> Self {
        Self {
            code: StorageErrorCode::ChronoStorageIoError,
            message: message.into(),
            details: None,
            source: Some(source),
        }
    }

    /// Create a new row file write error
    pub fn write_failed(message: impl Into<String>, source: io::Error) -> Self {
        Self {
            code: StorageErrorCode::ChronoStorageWriteFailed,
            message: message.into(),
            details: None,
            source: Some(source),
        }
    }

    /// Create a row file write error without an IO source
    pub fn write_failed_no_source(message: impl Into<String>) -> Self {
        Self {
            code: StorageErrorCode::ChronoStorageWriteFailed,
            message: message.into(),
            details: None,
            source: None,
        }
    }

    /// Create a new row file read error
    pub fn read_failed(message: impl Into<String>, source: io::Error) -> Self {
        Self {
            code: StorageErrorCode::ChronoStorageReadFailed,
            message: message.into(),
            details: None,
            source: Some(source),
        }
    }

    /// Create a data corruption error for a specific row file
    pub fn corruption_for_data_ref(data_ref: &str, reason: impl Into<String>) -> Self {
        Self {
            code: StorageErrorCode::ChronoDataCorruption,
            message: reason.into(),
            details: Some(format!("data_ref: {}", data_ref)),
            source: None,
        }
    }

    /// Returns the error code
    pub fn code(&self) -> StorageErrorCode {
        self.code
    }

    /// Returns the severity level
    pub fn severity(&self) -> Severity {
        self.code.severity()
    }

    /// Returns the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns additional error details
    pub fn details(&self) -> Option<&str> {
        self.details.as_deref()
    }

    /// Returns true if this error reports checksum corruption
    pub fn is_corruption(&self) -> bool {
        self.code == StorageErrorCode::ChronoDataCorruption
    }
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {}: {}",
            self.code.severity(),
            self.code.code(),
            self.message
        )?;
        if let Some(ref details) = self.details {
            write!(f, " ({})", details)?;
        }
        Ok(())
    }
}

impl std::error::Error for StorageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}
