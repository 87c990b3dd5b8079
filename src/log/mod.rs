//! The `log` module holds the system's record of truth: an append-only,
//! ordered sequence of chat messages.
//!
//! Ids are assigned here, atomically with the append, so readers never see
//! a gap or a duplicate. Everything downstream (fan-out, snapshots) works
//! with the `Message` values this module produces.

pub mod message;
pub mod store;

pub use message::{Message, MessageId};
pub use store::MessageLog;
