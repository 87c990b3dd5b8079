use std::sync::RwLock;

use crate::log::message::{Message, MessageId};

/// Append-only ordered store of chat messages.
///
/// The log owns id assignment: `append` picks the next id and pushes the
/// record at the tail under one write lock, so two concurrent appends can
/// never share an id and readers always observe a valid serialization of
/// the calls. Reads take the shared lock and run concurrently with each
/// other.
#[derive(Debug)]
pub struct MessageLog {
    inner: RwLock<LogInner>,
}

#[derive(Debug)]
struct LogInner {
    messages: Vec<Message>,
    next_id: MessageId,
}

impl MessageLog {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(LogInner {
                messages: Vec::new(),
                next_id: 1,
            }),
        }
    }

    /// Assigns the next id, stores the message at the tail, and returns the
    /// stored record.
    ///
    /// Panics if the 64-bit id space is exhausted; wrapping around and
    /// reusing an id would silently corrupt the order, so the log refuses.
    pub fn append(&self, sender: String, payload: String, is_image: bool) -> Message {
        let mut inner = self.inner.write().expect("message log lock poisoned");
        let id = inner.next_id;
        inner.next_id = id.checked_add(1).expect("message id space exhausted");
        let message = Message {
            id,
            sender,
            payload,
            is_image,
        };
        inner.messages.push(message.clone());
        message
    }

    /// Returns a point-in-time copy of the full log in append order.
    ///
    /// The copy is taken under the read lock, so it never contains a
    /// half-applied append and its ids are always the gapless prefix
    /// `1..=len`.
    pub fn list(&self) -> Vec<Message> {
        self.inner
            .read()
            .expect("message log lock poisoned")
            .messages
            .clone()
    }

    pub fn len(&self) -> usize {
        self.inner
            .read()
            .expect("message log lock poisoned")
            .messages
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for MessageLog {
    fn default() -> Self {
        Self::new()
    }
}
