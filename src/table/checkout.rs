//! Checkout state machine
//!
//! Per TIMETRAVEL.md §2:
//! - States are explicit and enumerable: `Latest` (initial) or
//!   `Pinned(v)` for a historical version v
//! - Transitions are event-driven (checkout, checkout_latest, restore),
//!   never inferred and never time-based
//! - The state lives on the handle, not the log: multiple handles over
//!   one shared store pin independently
//!
//! This is a PURE TYPE; the `Table` handle drives the transitions after
//! validating them against the version store.

/// The active-version state of a table handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckoutState {
    /// The handle follows the store's latest version (initial state).
    Latest,
    /// The handle is pinned to a historical version; reads resolve
    /// against that snapshot and mutations are rejected.
    Pinned(u64),
}

impl CheckoutState {
    /// Returns true if the handle follows latest.
    #[inline]
    pub fn is_latest(&self) -> bool {
        matches!(self, CheckoutState::Latest)
    }

    /// Returns the pinned version, if any.
    #[inline]
    pub fn pinned_version(&self) -> Option<u64> {
        match self {
            CheckoutState::Latest => None,
            CheckoutState::Pinned(v) => Some(*v),
        }
    }
}

impl Default for CheckoutState {
    fn default() -> Self {
        CheckoutState::Latest
    }
}
