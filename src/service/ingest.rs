use std::sync::{Arc, Mutex};

use tracing::debug;

use crate::broker::Broker;
use crate::log::{Message, MessageLog};
use crate::utils::error::ValidationError;

/// Accepts new message submissions.
///
/// A submission is validated, appended to the log, published to the
/// broker, and the stored record returned to the submitter. The internal
/// mutex is the system's single ingestion serialization point: holding it
/// across append-then-publish keeps global publish order identical to id
/// order, which the subscribe-then-snapshot join performed by clients
/// depends on. Snapshot reads only contend on the log's own read lock,
/// not on this mutex.
#[derive(Debug)]
pub struct IngestService {
    log: Arc<MessageLog>,
    broker: Arc<Broker>,
    serial: Mutex<()>,
}

impl IngestService {
    pub fn new(log: Arc<MessageLog>, broker: Arc<Broker>) -> Self {
        Self {
            log,
            broker,
            serial: Mutex::new(()),
        }
    }

    /// Validates and ingests one message, returning the authoritative
    /// stored record.
    ///
    /// Rejected submissions leave the log untouched and are never retried
    /// here; retry is the caller's decision.
    pub fn submit(
        &self,
        sender: String,
        payload: String,
        is_image: bool,
    ) -> Result<Message, ValidationError> {
        validate(&payload, is_image)?;

        let _serial = self.serial.lock().expect("ingest lock poisoned");
        let message = self.log.append(sender, payload, is_image);
        self.broker.publish(message.clone());
        debug!(id = message.id, sender = %message.sender, "message ingested");
        Ok(message)
    }
}

fn validate(payload: &str, is_image: bool) -> Result<(), ValidationError> {
    if payload.is_empty() {
        return Err(ValidationError::EmptyPayload);
    }
    // Image payloads are self-contained data URIs; there is no file store
    // to resolve anything else against.
    if is_image && !payload.starts_with("data:") {
        return Err(ValidationError::NotADataUri);
    }
    Ok(())
}
