//! chronodb - A versioned table store with snapshot history and time travel
//!
//! Every mutation commits a new immutable snapshot; history is append-only
//! and never truncated. Handles can pin a historical version (checkout) and
//! promote it back to latest (restore).

pub mod connection;
pub mod observability;
pub mod predicate;
pub mod storage;
pub mod table;
pub mod version;

pub use connection::{connect, Connection, CreateTableMode};
pub use table::Table;
