use serde::{Deserialize, Serialize};

use crate::log::Message;

/// Frames sent by clients.
#[derive(Debug, Deserialize, Serialize)]
#[serde(tag = "type")]
pub enum ClientFrame {
    /// Query the full message history.
    #[serde(rename = "messages")]
    Messages,

    /// Submit a new message.
    #[serde(rename = "send")]
    Send {
        sender: String,
        payload: String,
        #[serde(rename = "isImage", default)]
        is_image: bool,
    },

    /// Attach a live message stream to this connection.
    #[serde(rename = "subscribe")]
    Subscribe,

    /// Detach the live stream.
    #[serde(rename = "unsubscribe")]
    Unsubscribe,
}

/// Frames sent by the server.
#[derive(Debug, Deserialize, Serialize)]
#[serde(tag = "type")]
pub enum ServerFrame {
    /// Reply to `messages`: the history snapshot in id order.
    #[serde(rename = "messages")]
    Messages { messages: Vec<Message> },

    /// Reply to `send`: the authoritative stored record.
    #[serde(rename = "sent")]
    Sent {
        #[serde(flatten)]
        message: Message,
    },

    /// One live message pushed to a subscribed connection.
    #[serde(rename = "message")]
    Event {
        #[serde(flatten)]
        message: Message,
    },

    #[serde(rename = "error")]
    Error { message: String },
}
