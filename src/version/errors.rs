//! Version-log error types following ERRORS.md
//!
//! Error codes:
//! - CHRONO_VERSION_NOT_FOUND (user error, surfaced immediately)
//! - CHRONO_COMMIT_CONFLICT (recoverable: caller re-reads latest and retries)
//! - CHRONO_MANIFEST_IO / CHRONO_MANIFEST_FORMAT (durability failures)
//! - CHRONO_VERSION_LOG_CORRUPTED (replay found gaps or duplicates)
//!
//! A failed commit leaves the version log unchanged. None of these errors
//! is fatal to the process.

use std::fmt;
use std::io;

/// Result type for version-log operations
pub type VersionResult<T> = Result<T, VersionError>;

/// Errors from version-log operations
#[derive(Debug)]
pub enum VersionError {
    /// Checkout or lookup of a version that does not exist
    VersionNotFound {
        /// The requested version number
        version: u64,
    },

    /// An optimistic commit lost its race: another commit advanced the
    /// log past the expected latest version
    ConcurrentModification {
        /// Latest version the caller expected
        expected: u64,
        /// Latest version actually in the log
        actual: u64,
    },

    /// Manifest write or read failed at the I/O level
    ManifestIo {
        message: String,
        source: io::Error,
    },

    /// Manifest content did not parse or did not validate
    ManifestFormat {
        message: String,
    },

    /// Replayed manifests violate the log invariants (gap, duplicate,
    /// or non-monotonic version numbers)
    LogCorrupted {
        message: String,
    },
}

impl VersionError {
    /// Create a manifest I/O error
    pub fn manifest_io(message: impl Into<String>, source: io::Error) -> Self {
        Self::ManifestIo {
            message: message.into(),
            source,
        }
    }

    /// Create a manifest format error
    pub fn manifest_format(message: impl Into<String>) -> Self {
        Self::ManifestFormat {
            message: message.into(),
        }
    }

    /// Create a log corruption error
    pub fn log_corrupted(message: impl Into<String>) -> Self {
        Self::LogCorrupted {
            message: message.into(),
        }
    }

    /// Returns the stable error code, per ERRORS.md
    pub fn code(&self) -> &'static str {
        match self {
            Self::VersionNotFound { .. } => "CHRONO_VERSION_NOT_FOUND",
            Self::ConcurrentModification { .. } => "CHRONO_COMMIT_CONFLICT",
            Self::ManifestIo { .. } => "CHRONO_MANIFEST_IO",
            Self::ManifestFormat { .. } => "CHRONO_MANIFEST_FORMAT",
            Self::LogCorrupted { .. } => "CHRONO_VERSION_LOG_CORRUPTED",
        }
    }

    /// Returns true if the caller can recover by re-reading latest and
    /// retrying the whole logical operation
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::ConcurrentModification { .. })
    }
}

impl fmt::Display for VersionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::VersionNotFound { version } => {
                write!(f, "[{}] version {} does not exist", self.code(), version)
            }
            Self::ConcurrentModification { expected, actual } => write!(
                f,
                "[{}] commit expected latest version {} but found {}",
                self.code(),
                expected,
                actual
            ),
            Self::ManifestIo { message, .. } => {
                write!(f, "[{}] {}", self.code(), message)
            }
            Self::ManifestFormat { message } => {
                write!(f, "[{}] {}", self.code(), message)
            }
            Self::LogCorrupted { message } => {
                write!(f, "[{}] {}", self.code(), message)
            }
        }
    }
}

impl std::error::Error for VersionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ManifestIo { source, .. } => Some(source),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            VersionError::VersionNotFound { version: 9 }.code(),
            "CHRONO_VERSION_NOT_FOUND"
        );
        assert_eq!(
            VersionError::ConcurrentModification {
                expected: 3,
                actual: 4
            }
            .code(),
            "CHRONO_COMMIT_CONFLICT"
        );
    }

    #[test]
    fn test_only_conflicts_are_retryable() {
        assert!(VersionError::ConcurrentModification {
            expected: 1,
            actual: 2
        }
        .is_retryable());
        assert!(!VersionError::VersionNotFound { version: 1 }.is_retryable());
        assert!(!VersionError::log_corrupted("gap").is_retryable());
    }

    #[test]
    fn test_display_names_both_versions_on_conflict() {
        let err = VersionError::ConcurrentModification {
            expected: 5,
            actual: 7,
        };
        let rendered = err.to_string();
        assert!(rendered.contains('5'));
        assert!(rendered.contains('7'));
        assert!(rendered.contains("CHRONO_COMMIT_CONFLICT"));
    }
}
