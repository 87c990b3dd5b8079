//! The `service` module wires the log and the broker into the two
//! operations the transport exposes: submitting a message and reading the
//! history.

pub mod ingest;
pub mod snapshot;

use std::sync::Arc;

use crate::broker::Broker;
use crate::config::BrokerSettings;
use crate::log::MessageLog;

pub use ingest::IngestService;
pub use snapshot::SnapshotService;

/// The assembled core, shared by every connection.
///
/// Owns the single `MessageLog` and `Broker` for the process and the
/// services built on them; injected into the transport instead of living
/// in globals.
#[derive(Debug)]
pub struct Services {
    pub ingest: IngestService,
    pub snapshot: SnapshotService,
    pub broker: Arc<Broker>,
}

impl Services {
    pub fn new(settings: &BrokerSettings) -> Self {
        let log = Arc::new(MessageLog::new());
        let broker = Arc::new(Broker::new(settings.queue_capacity));
        Self {
            ingest: IngestService::new(log.clone(), broker.clone()),
            snapshot: SnapshotService::new(log),
            broker,
        }
    }
}

#[cfg(test)]
mod tests;
