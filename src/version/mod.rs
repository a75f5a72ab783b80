//! Version history domain
//!
//! Per VERSIONING.md:
//! - Defines the version-log vocabulary in code
//! - Encodes the append-only invariants structurally
//!
//! This module provides:
//! - `Snapshot` - Immutable record of table content at one version
//! - `VersionLog` - Append-only, gap-free ordered history of snapshots
//! - `SnapshotManifest` - Durable JSON form of a snapshot
//! - `VersionStore` - The sole commit entry point, with optimistic
//!   concurrency (compare-and-swap on the expected latest version)

mod errors;
mod log;
mod manifest;
mod snapshot;
mod store;

pub use errors::{VersionError, VersionResult};
pub use log::VersionLog;
pub use manifest::SnapshotManifest;
pub use snapshot::Snapshot;
pub use store::VersionStore;
