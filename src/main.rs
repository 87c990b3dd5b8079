use std::sync::Arc;

use tracing::{error, info};

use chatsub::config::load_config;
use chatsub::service::Services;
use chatsub::transport::websocket::start_websocket_server;
use chatsub::utils::logging;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    logging::init("info");

    let settings = match load_config() {
        Ok(settings) => settings,
        Err(e) => {
            error!("failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    let services = Arc::new(Services::new(&settings.broker));

    tokio::select! {
        result = start_websocket_server(&addr, services, settings) => match result {
            Ok(()) => error!("WebSocket server exited unexpectedly"),
            Err(e) => error!("WebSocket server failed: {e}"),
        },
        _ = tokio::signal::ctrl_c() => {
            info!("shutdown signal received, exiting");
        }
    }
}
