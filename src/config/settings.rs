use serde::Deserialize;

use crate::broker::Broker;

/// Top-level configuration settings for the application.
#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub server: ServerSettings,
    pub broker: BrokerSettings,
}

/// Configuration settings for the WebSocket server.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    /// Upper bound on an incoming frame; image data URIs ride in-band, so
    /// this is effectively the maximum image size.
    pub max_payload_bytes: usize,
}

/// Configuration settings for the broker.
#[derive(Debug, Deserialize, Clone)]
pub struct BrokerSettings {
    /// Per-subscriber delivery queue capacity. A subscriber that falls this
    /// far behind is disconnected.
    pub queue_capacity: usize,
}

/// Partial configuration loaded from files or environment.
///
/// All values are optional; anything missing is filled from defaults.
#[derive(Debug, Deserialize)]
pub struct PartialSettings {
    pub server: Option<PartialServerSettings>,
    pub broker: Option<PartialBrokerSettings>,
}

#[derive(Debug, Deserialize)]
pub struct PartialServerSettings {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub max_payload_bytes: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct PartialBrokerSettings {
    pub queue_capacity: Option<usize>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server: ServerSettings {
                host: "127.0.0.1".to_string(),
                port: 8080,
                max_payload_bytes: 10 * 1024 * 1024,
            },
            broker: BrokerSettings {
                queue_capacity: Broker::DEFAULT_QUEUE_CAPACITY,
            },
        }
    }
}
