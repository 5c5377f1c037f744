//! The book's only outward signal: a synchronous `added` notification.
//!
//! `spec.md` §9 models this as "a subscription registry of callbacks
//! invoked synchronously after mutation; never re-entrant." Observers
//! must not call back into `Book::add` with the same batch; the book
//! does not guard against that itself (`spec.md` §4.4).

use crate::address::PeerAddress;

/// A registry of `added` subscribers, fired synchronously by [`crate::Book`]
/// after a batch of addresses is admitted to the store.
pub struct EventBus<K> {
    subscribers: Vec<Box<dyn FnMut(&[PeerAddress<K>])>>,
}

impl<K> EventBus<K> {
    pub fn new() -> Self {
        Self {
            subscribers: Vec::new(),
        }
    }

    /// Registers a callback to be invoked on every `added` emission.
    pub fn subscribe(&mut self, callback: impl FnMut(&[PeerAddress<K>]) + 'static) {
        self.subscribers.push(Box::new(callback));
    }

    /// Fires `added` with `batch`, unless it's empty.
    pub fn fire_added(&mut self, batch: &[PeerAddress<K>]) {
        if batch.is_empty() {
            return;
        }
        tracing::debug!(count = batch.len(), "firing added event");
        for subscriber in &mut self.subscribers {
            subscriber(batch);
        }
    }
}

impl<K> Default for EventBus<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K> std::fmt::Debug for EventBus<K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}
