//! In-memory state tree over a JSON object.

use crate::error::{Result, UrlSyncError};
use crate::notify::{ChangeNotifier, Subscription};
use crate::types::{Generation, TreeSnapshot};
use parking_lot::RwLock;
use serde_json::{Map, Value};

use super::StateTree;

/// Schema check run by [`JsonStateTree::restore_state`] before mutating.
pub type StateValidator =
    Box<dyn Fn(&Map<String, Value>) -> std::result::Result<(), String> + Send + Sync>;

struct Inner {
    value: Map<String, Value>,
    generation: Generation,
}

/// A JSON-object state tree with generation tracking.
///
/// The generation increments exactly when the value changes. Writes that
/// leave the value equal to the current one are no-ops and do not notify.
pub struct JsonStateTree {
    inner: RwLock<Inner>,
    notifier: ChangeNotifier<Generation>,
    validator: Option<StateValidator>,
}

impl JsonStateTree {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner {
                value: Map::new(),
                generation: Generation::default(),
            }),
            notifier: ChangeNotifier::new(),
            validator: None,
        }
    }

    /// Reject restored objects for which `validator` returns an error.
    pub fn with_validator(
        validator: impl Fn(&Map<String, Value>) -> std::result::Result<(), String>
            + Send
            + Sync
            + 'static,
    ) -> Self {
        Self {
            validator: Some(Box::new(validator)),
            ..Self::new()
        }
    }

    pub fn get(&self, key: &str) -> Option<Value> {
        self.inner.read().value.get(key).cloned()
    }

    pub fn value(&self) -> Map<String, Value> {
        self.inner.read().value.clone()
    }

    pub fn generation(&self) -> Generation {
        self.inner.read().generation
    }

    /// Set a top-level key.
    pub fn set(&self, key: &str, value: Value) {
        self.mutate(|map| {
            if map.get(key) == Some(&value) {
                false
            } else {
                map.insert(key.to_string(), value);
                true
            }
        });
    }

    /// Remove a top-level key.
    pub fn remove(&self, key: &str) {
        self.mutate(|map| map.remove(key).is_some());
    }

    /// Apply `f` under the write lock; `f` reports whether it changed anything.
    fn mutate(&self, f: impl FnOnce(&mut Map<String, Value>) -> bool) {
        let generation = {
            let mut inner = self.inner.write();
            if !f(&mut inner.value) {
                return;
            }
            inner.generation = inner.generation.next();
            inner.generation
        };
        // Notify outside the lock so subscribers may read the tree.
        self.notifier.notify(generation);
    }
}

impl Default for JsonStateTree {
    fn default() -> Self {
        Self::new()
    }
}

impl StateTree for JsonStateTree {
    fn snapshot(&self) -> TreeSnapshot {
        let inner = self.inner.read();
        TreeSnapshot {
            value: Value::Object(inner.value.clone()),
            generation: inner.generation,
        }
    }

    fn reset(&self) {
        self.mutate(|map| {
            if map.is_empty() {
                false
            } else {
                map.clear();
                true
            }
        });
    }

    fn restore_state(&self, state: &Map<String, Value>) -> Result<()> {
        if let Some(ref validator) = self.validator {
            validator(state).map_err(UrlSyncError::InvalidState)?;
        }

        self.mutate(|map| {
            let mut changed = false;
            for (key, value) in state {
                if map.get(key) != Some(value) {
                    map.insert(key.clone(), value.clone());
                    changed = true;
                }
            }
            changed
        });
        Ok(())
    }

    fn subscribe(&self, capacity: usize) -> Subscription<Generation> {
        self.notifier.subscribe(capacity)
    }

    fn unsubscribe(&self, subscription: &Subscription<Generation>) {
        self.notifier.unsubscribe(subscription.id);
    }
}
