//! Change notification broadcast.
//!
//! Every observable piece of the binding (state tree, navigation facade,
//! error cell) announces changes through a [`ChangeNotifier`]. Subscribers
//! receive events over bounded channels:
//! - A full buffer keeps the subscriber; the pending event already tells it
//!   that something changed, so notifications coalesce instead of piling up.
//! - A disconnected receiver is removed on the next broadcast.

use crossbeam_channel::{bounded, Receiver, RecvError, RecvTimeoutError, Sender, TryRecvError};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Unique identifier for a subscription.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub u64);

/// Receiving side of a subscription.
pub struct Subscription<E> {
    pub id: SubscriptionId,
    /// Channel to receive events.
    pub receiver: Receiver<E>,
}

impl<E> Subscription<E> {
    /// Receive the next event (blocking).
    pub fn recv(&self) -> Result<E, RecvError> {
        self.receiver.recv()
    }

    /// Try to receive an event (non-blocking).
    pub fn try_recv(&self) -> Result<E, TryRecvError> {
        self.receiver.try_recv()
    }

    /// Receive with timeout.
    pub fn recv_timeout(&self, timeout: Duration) -> Result<E, RecvTimeoutError> {
        self.receiver.recv_timeout(timeout)
    }

    /// Collect every event currently buffered.
    pub fn drain(&self) -> Vec<E> {
        self.receiver.try_iter().collect()
    }
}

/// Broadcasts events of type `E` to all live subscribers.
pub struct ChangeNotifier<E> {
    subscribers: RwLock<HashMap<SubscriptionId, Sender<E>>>,
    next_id: AtomicU64,
}

impl<E: Clone> ChangeNotifier<E> {
    pub fn new() -> Self {
        Self {
            subscribers: RwLock::new(HashMap::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Create a new subscription with the given buffer size.
    pub fn subscribe(&self, capacity: usize) -> Subscription<E> {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::SeqCst));
        let (sender, receiver) = bounded(capacity.max(1));
        self.subscribers.write().insert(id, sender);
        Subscription { id, receiver }
    }

    pub fn unsubscribe(&self, id: SubscriptionId) {
        self.subscribers.write().remove(&id);
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.read().len()
    }

    /// Send `event` to every subscriber. Drops subscribers whose receiver is gone.
    pub fn notify(&self, event: E) {
        let mut to_remove = Vec::new();

        {
            let subs = self.subscribers.read();
            for (id, sender) in subs.iter() {
                match sender.try_send(event.clone()) {
                    Ok(()) => {}
                    // Buffer full: an undelivered event is already pending.
                    Err(crossbeam_channel::TrySendError::Full(_)) => {}
                    Err(crossbeam_channel::TrySendError::Disconnected(_)) => to_remove.push(*id),
                }
            }
        }

        if !to_remove.is_empty() {
            let mut subs = self.subscribers.write();
            for id in to_remove {
                subs.remove(&id);
            }
        }
    }
}

impl<E: Clone> Default for ChangeNotifier<E> {
    fn default() -> Self {
        Self::new()
    }
}
