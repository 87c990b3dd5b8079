mod settings;

use config::{Config, ConfigError, Environment, File};

use crate::config::settings::PartialSettings;

pub use settings::{BrokerSettings, ServerSettings, Settings};

/// Loads the configuration from the default file and environment variables.
///
/// Values missing from both sources fall back to `Settings::default()`.
pub fn load_config() -> Result<Settings, ConfigError> {
    let builder = Config::builder()
        .add_source(File::with_name("config/default").required(false))
        .add_source(Environment::default().separator("_"));

    let config = builder.build()?;

    let partial: PartialSettings = config.try_deserialize()?;
    let default = Settings::default();

    Ok(Settings {
        server: ServerSettings {
            host: partial
                .server
                .as_ref()
                .and_then(|s| s.host.clone())
                .unwrap_or(default.server.host),
            port: partial
                .server
                .as_ref()
                .and_then(|s| s.port)
                .unwrap_or(default.server.port),
            max_payload_bytes: partial
                .server
                .as_ref()
                .and_then(|s| s.max_payload_bytes)
                .unwrap_or(default.server.max_payload_bytes),
        },
        broker: BrokerSettings {
            queue_capacity: partial
                .broker
                .as_ref()
                .and_then(|b| b.queue_capacity)
                .unwrap_or(default.broker.queue_capacity),
        },
    })
}
