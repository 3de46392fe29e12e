//! Observable application state.
//!
//! The binding only needs a small surface from the state it mirrors: an
//! atomic (value, generation) read, a reset, a restore from a parsed object,
//! and change notifications. [`JsonStateTree`] is an in-memory implementation
//! over a JSON object.

mod json_tree;

pub use json_tree::{JsonStateTree, StateValidator};

use crate::error::Result;
use crate::notify::Subscription;
use crate::types::{Generation, TreeSnapshot};
use serde_json::{Map, Value};

/// A mutable, observable tree of JSON-compatible values.
pub trait StateTree: Send + Sync {
    /// Current value and generation, read together.
    fn snapshot(&self) -> TreeSnapshot;

    /// Clear to the empty state.
    fn reset(&self);

    /// Apply a parsed object on top of the current state.
    ///
    /// Fails with [`UrlSyncError::InvalidState`](crate::UrlSyncError::InvalidState)
    /// when the object does not fit the tree's schema.
    fn restore_state(&self, state: &Map<String, Value>) -> Result<()>;

    /// Subscribe to change notifications. Each event carries the new generation.
    fn subscribe(&self, capacity: usize) -> Subscription<Generation>;

    fn unsubscribe(&self, subscription: &Subscription<Generation>);
}
