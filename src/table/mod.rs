//! Versioned table sessions
//!
//! Per TIMETRAVEL.md:
//! - `Table` - a handle over one table's shared version store
//! - `CheckoutState` - the handle's explicit Latest | Pinned state machine
//! - `MutationEngine` (internal) - read-modify-commit for add/update/delete
//! - restore (internal) - promote a pinned version to a new latest

mod checkout;
mod errors;
mod handle;
mod mutation;
mod restore;

pub use checkout::CheckoutState;
pub use errors::{TableError, TableResult};
pub use handle::Table;
pub use mutation::Assignments;
