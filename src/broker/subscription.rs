use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};

use tokio::sync::mpsc;

use crate::broker::engine::Registry;
use crate::log::Message;
use crate::utils::error::SubscriptionError;

/// Identifies one attached listener.
pub type SubscriberId = String;

/// Sending side of one subscriber's delivery queue, held by the broker.
#[derive(Debug)]
pub(crate) struct SubscriberHandle {
    pub(crate) sender: mpsc::Sender<Message>,
    overflowed: Arc<AtomicBool>,
}

impl SubscriberHandle {
    pub(crate) fn new(sender: mpsc::Sender<Message>) -> Self {
        Self {
            sender,
            overflowed: Arc::new(AtomicBool::new(false)),
        }
    }

    pub(crate) fn overflowed(&self) -> Arc<AtomicBool> {
        self.overflowed.clone()
    }

    pub(crate) fn mark_overflowed(&self) {
        self.overflowed.store(true, Ordering::SeqCst);
    }
}

/// Receive handle for one live subscription.
///
/// Yields messages in publish order until the subscription ends. Messages
/// already enqueued stay drainable after a detach; once the queue is empty
/// `recv` reports why the stream ended. Dropping the handle detaches it
/// from the broker.
#[derive(Debug)]
pub struct Subscription {
    id: SubscriberId,
    receiver: mpsc::Receiver<Message>,
    overflowed: Arc<AtomicBool>,
    registry: Weak<Registry>,
}

impl Subscription {
    pub(crate) fn new(
        id: SubscriberId,
        receiver: mpsc::Receiver<Message>,
        overflowed: Arc<AtomicBool>,
        registry: Weak<Registry>,
    ) -> Self {
        Self {
            id,
            receiver,
            overflowed,
            registry,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Waits for the next message.
    ///
    /// Returns `SubscriptionError::Overflowed` once the queue is drained
    /// after an overflow disconnect, and `SubscriptionError::Closed` when
    /// the subscription was detached or the broker is gone.
    pub async fn recv(&mut self) -> Result<Message, SubscriptionError> {
        match self.receiver.recv().await {
            Some(message) => Ok(message),
            None if self.overflowed.load(Ordering::SeqCst) => Err(SubscriptionError::Overflowed),
            None => Err(SubscriptionError::Closed),
        }
    }
}

impl Drop for Subscription {
    // Idempotent with `unsubscribe`; the broker may already have removed
    // this id.
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            registry
                .lock()
                .expect("broker registry poisoned")
                .remove(&self.id);
        }
    }
}
