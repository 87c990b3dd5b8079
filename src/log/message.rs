use serde::{Deserialize, Serialize};

/// Identifier assigned to a message by the log at append time.
///
/// Ids start at 1 and form a strictly increasing, gapless sequence in
/// append order. An id is never reused.
pub type MessageId = u64;

/// A single chat message, as stored in the log and as sent on the wire.
///
/// Messages are immutable once created. `payload` holds plain text, or a
/// self-contained `data:` URI when `is_image` is set; the two forms are
/// mutually exclusive and `is_image` selects the interpretation.
///
/// Serializes with camelCase field names, so the wire shape is
/// `{"id": 1, "sender": "...", "payload": "...", "isImage": false}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: MessageId,
    pub sender: String,
    pub payload: String,
    pub is_image: bool,
}
