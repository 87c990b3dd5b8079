//! The `transport` module is responsible for network communication with
//! clients over WebSockets.
//!
//! It defines the JSON frame protocol and implements the server itself:
//! accepting connections, parsing frames, and driving the snapshot,
//! ingestion, and subscription services on behalf of each client.

pub mod message;
pub mod websocket;
