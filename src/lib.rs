//! # chatsub
//!
//! `chatsub` is a minimal real-time chat backend: an append-only in-memory
//! message log with live fan-out to WebSocket subscribers and point-in-time
//! snapshot reads.
//!
//! ## Core Modules
//!
//! The library is structured into several modules, each with a distinct responsibility:
//!
//! - `log`: the append-only message log; assigns ids and serves ordered snapshots.
//! - `broker`: publish/subscribe fan-out to per-subscriber bounded queues.
//! - `service`: ingestion (validate, append, publish) and snapshot reads.
//! - `client`: client-side reconciliation of snapshots, live events, and
//!   optimistic sends.
//! - `transport`: the WebSocket server and its JSON frame protocol.
//! - `config`: handles loading and merging server configuration.
//! - `utils`: shared error types and logging setup.

pub mod broker;
pub mod client;
pub mod config;
pub mod log;
pub mod service;
pub mod transport;
pub mod utils;
