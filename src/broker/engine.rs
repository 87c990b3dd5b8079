use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tokio::sync::mpsc;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::broker::subscription::{SubscriberHandle, SubscriberId, Subscription};
use crate::log::Message;

/// Map from subscriber id to the sending side of its delivery queue.
pub(crate) type Registry = Mutex<HashMap<SubscriberId, SubscriberHandle>>;

/// Publish/subscribe hub that fans each published message out to every
/// active subscriber.
///
/// Each subscriber owns an independent bounded queue. `publish` only ever
/// enqueues (it never awaits), so delivery to one subscriber cannot be
/// delayed by another. The registry of subscribers is the broker's only
/// mutable state and is guarded by a single mutex; a subscription is active
/// the moment `subscribe` returns, and any publish that starts after that
/// point reaches it.
#[derive(Debug)]
pub struct Broker {
    registry: Arc<Registry>,
    queue_capacity: usize,
}

impl Broker {
    /// Default per-subscriber delivery queue capacity.
    pub const DEFAULT_QUEUE_CAPACITY: usize = 256;

    pub fn new(queue_capacity: usize) -> Self {
        Self {
            registry: Arc::new(Mutex::new(HashMap::new())),
            queue_capacity,
        }
    }

    /// Attaches a new subscriber and returns its receive handle.
    ///
    /// The subscriber is registered before this returns. Dropping the
    /// handle detaches it again, as does `unsubscribe`.
    pub fn subscribe(&self) -> Subscription {
        let id: SubscriberId = format!("sub-{}", Uuid::new_v4());
        let (sender, receiver) = mpsc::channel(self.queue_capacity);
        let handle = SubscriberHandle::new(sender);
        let overflowed = handle.overflowed();

        {
            let mut registry = self.registry.lock().expect("broker registry poisoned");
            registry.insert(id.clone(), handle);
        }
        debug!(subscriber = %id, "subscriber attached");

        Subscription::new(id, receiver, overflowed, Arc::downgrade(&self.registry))
    }

    /// Enqueues `message` for every active subscriber, in publish order.
    ///
    /// A subscriber whose queue is full is disconnected on the spot: its
    /// overflow flag is set and it is dropped from the registry. Whatever
    /// was already enqueued stays drainable through its handle, after which
    /// `recv` reports the overflow. Other subscribers are unaffected.
    pub fn publish(&self, message: Message) {
        let mut registry = self.registry.lock().expect("broker registry poisoned");
        let mut dropped: Vec<SubscriberId> = Vec::new();

        for (id, handle) in registry.iter() {
            match handle.sender.try_send(message.clone()) {
                Ok(()) => {}
                Err(mpsc::error::TrySendError::Full(_)) => {
                    handle.mark_overflowed();
                    warn!(subscriber = %id, "delivery queue full, disconnecting subscriber");
                    dropped.push(id.clone());
                }
                Err(mpsc::error::TrySendError::Closed(_)) => {
                    dropped.push(id.clone());
                }
            }
        }

        for id in dropped {
            registry.remove(&id);
        }
    }

    /// Detaches a subscriber. Safe to call for an id that is already gone.
    pub fn unsubscribe(&self, id: &str) {
        let removed = self
            .registry
            .lock()
            .expect("broker registry poisoned")
            .remove(id);
        if removed.is_some() {
            debug!(subscriber = %id, "subscriber detached");
        }
    }

    /// Number of currently attached subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.registry.lock().expect("broker registry poisoned").len()
    }
}

impl Default for Broker {
    fn default() -> Self {
        Self::new(Self::DEFAULT_QUEUE_CAPACITY)
    }
}
