use std::sync::Arc;

use futures_util::{SinkExt, StreamExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_tungstenite::accept_async_with_config;
use tracing::{debug, error, info, warn};
use tungstenite::protocol::{Message as WsMessage, WebSocketConfig};
use uuid::Uuid;

use crate::config::Settings;
use crate::service::Services;
use crate::transport::message::{ClientFrame, ServerFrame};
use crate::utils::error::SubscriptionError;

/// Binds `addr` and serves WebSocket clients until the accept loop ends.
pub async fn start_websocket_server(
    addr: &str,
    services: Arc<Services>,
    settings: Settings,
) -> std::io::Result<()> {
    let listener = TcpListener::bind(addr).await?;
    info!("listening on ws://{addr}");
    serve(listener, services, settings).await;
    Ok(())
}

/// Accept loop over an already-bound listener.
///
/// Split out from `start_websocket_server` so callers (tests included) can
/// bind port 0 themselves and read the actual address back.
pub async fn serve(listener: TcpListener, services: Arc<Services>, settings: Settings) {
    while let Ok((stream, _)) = listener.accept().await {
        let services = services.clone();
        let max_payload = settings.server.max_payload_bytes;
        tokio::spawn(async move {
            handle_connection(stream, services, max_payload).await;
        });
    }
}

async fn handle_connection(stream: TcpStream, services: Arc<Services>, max_payload: usize) {
    let ws_config = WebSocketConfig::default()
        .max_message_size(Some(max_payload))
        .max_frame_size(Some(max_payload));

    let ws_stream = match accept_async_with_config(stream, Some(ws_config)).await {
        Ok(ws) => ws,
        Err(e) => {
            warn!("WebSocket handshake error: {e}");
            return;
        }
    };

    let conn_id = format!("conn-{}", Uuid::new_v4());
    info!(conn = %conn_id, "client connected");

    let (mut ws_sender, mut ws_receiver) = ws_stream.split();

    // Everything this connection sends funnels through one channel into a
    // dedicated send loop, so the live stream and request replies never
    // interleave mid-frame.
    let (tx, mut rx) = mpsc::unbounded_channel::<WsMessage>();

    {
        let conn_id = conn_id.clone();
        tokio::spawn(async move {
            while let Some(frame) = rx.recv().await {
                if let Err(e) = ws_sender.send(frame).await {
                    debug!(conn = %conn_id, "send loop closed: {e}");
                    break;
                }
            }
        });
    }

    // At most one live stream per connection; the forwarder task owns the
    // Subscription, so aborting the task detaches it from the broker.
    let mut forwarder: Option<JoinHandle<()>> = None;

    while let Some(Ok(frame)) = ws_receiver.next().await {
        if !frame.is_text() {
            continue;
        }
        let text = match frame.to_text() {
            Ok(text) => text,
            Err(_) => continue,
        };

        match serde_json::from_str::<ClientFrame>(text) {
            Ok(ClientFrame::Messages) => {
                let messages = services.snapshot.list();
                send_frame(&tx, &ServerFrame::Messages { messages });
            }
            Ok(ClientFrame::Send {
                sender,
                payload,
                is_image,
            }) => match services.ingest.submit(sender, payload, is_image) {
                Ok(message) => {
                    send_frame(&tx, &ServerFrame::Sent { message });
                }
                Err(e) => {
                    debug!(conn = %conn_id, "submission rejected: {e}");
                    send_frame(
                        &tx,
                        &ServerFrame::Error {
                            message: e.to_string(),
                        },
                    );
                }
            },
            Ok(ClientFrame::Subscribe) => {
                if forwarder.as_ref().is_some_and(|task| !task.is_finished()) {
                    send_frame(
                        &tx,
                        &ServerFrame::Error {
                            message: "already subscribed".to_string(),
                        },
                    );
                    continue;
                }
                let mut subscription = services.broker.subscribe();
                debug!(conn = %conn_id, subscriber = subscription.id(), "subscribed");
                let tx = tx.clone();
                forwarder = Some(tokio::spawn(async move {
                    loop {
                        match subscription.recv().await {
                            Ok(message) => {
                                if !send_frame(&tx, &ServerFrame::Event { message }) {
                                    break;
                                }
                            }
                            Err(e @ SubscriptionError::Overflowed) => {
                                send_frame(
                                    &tx,
                                    &ServerFrame::Error {
                                        message: e.to_string(),
                                    },
                                );
                                break;
                            }
                            Err(SubscriptionError::Closed) => break,
                        }
                    }
                }));
            }
            Ok(ClientFrame::Unsubscribe) => {
                if let Some(task) = forwarder.take() {
                    task.abort();
                    debug!(conn = %conn_id, "unsubscribed");
                }
            }
            Err(e) => {
                debug!(conn = %conn_id, "invalid frame: {e}");
                send_frame(
                    &tx,
                    &ServerFrame::Error {
                        message: format!("invalid frame: {e}"),
                    },
                );
            }
        }
    }

    info!(conn = %conn_id, "client disconnected");
    // Connection loss is an implicit unsubscribe.
    if let Some(task) = forwarder.take() {
        task.abort();
    }
}

/// Queues a frame for the connection's send loop.
///
/// Returns false when the connection is gone and the caller should stop.
fn send_frame(tx: &mpsc::UnboundedSender<WsMessage>, frame: &ServerFrame) -> bool {
    let json = match serde_json::to_string(frame) {
        Ok(json) => json,
        Err(e) => {
            error!("failed to serialize frame: {e}");
            return true;
        }
    };
    tx.send(WsMessage::text(json)).is_ok()
}
