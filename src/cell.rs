//! Observable holder for the last inbound parse error.

use crate::error::UrlSyncError;
use crate::notify::{ChangeNotifier, Subscription};
use parking_lot::RwLock;

/// Holds the most recent inbound failure, or nothing after a success.
///
/// Subscribers are notified with the new contents whenever they change.
pub struct ErrorCell {
    value: RwLock<Option<UrlSyncError>>,
    notifier: ChangeNotifier<Option<UrlSyncError>>,
}

impl ErrorCell {
    pub fn new() -> Self {
        Self {
            value: RwLock::new(None),
            notifier: ChangeNotifier::new(),
        }
    }

    pub fn get(&self) -> Option<UrlSyncError> {
        self.value.read().clone()
    }

    pub fn is_set(&self) -> bool {
        self.value.read().is_some()
    }

    pub fn set(&self, error: UrlSyncError) {
        self.replace(Some(error));
    }

    pub fn clear(&self) {
        self.replace(None);
    }

    pub fn subscribe(&self, capacity: usize) -> Subscription<Option<UrlSyncError>> {
        self.notifier.subscribe(capacity)
    }

    fn replace(&self, next: Option<UrlSyncError>) {
        {
            let mut value = self.value.write();
            if *value == next {
                return;
            }
            *value = next.clone();
        }
        self.notifier.notify(next);
    }
}

impl Default for ErrorCell {
    fn default() -> Self {
        Self::new()
    }
}
