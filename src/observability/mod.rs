//! Observability primitives
//!
//! Structured logging for version-store events (commits, checkouts,
//! restores, commit conflicts). One log line = one event.

mod logger;

pub use logger::{Logger, Severity};
