//! The `client` module holds the consumer-side view of the chat.
//!
//! `ClientSync` reconciles the three inputs a client sees: the history
//! snapshot, the live subscription stream, and its own optimistic sends.

pub mod sync;

pub use sync::{ClientSync, StageToken};
