use std::sync::Arc;

use crate::log::{Message, MessageLog};

/// Serves point-in-time reads of the full message history.
#[derive(Debug, Clone)]
pub struct SnapshotService {
    log: Arc<MessageLog>,
}

impl SnapshotService {
    pub fn new(log: Arc<MessageLog>) -> Self {
        Self { log }
    }

    /// The current full history in append order.
    pub fn list(&self) -> Vec<Message> {
        self.log.list()
    }
}
