//! The `broker` module is the fan-out hub of the system.
//!
//! A published message is cloned into the bounded delivery queue of every
//! active subscriber. Queues are independent, so one stalled consumer never
//! delays the others; a queue that fills up gets its subscriber
//! disconnected instead (see `Broker::publish`). The broker knows nothing
//! about the message log; it only moves `Message` values.

pub mod engine;
pub mod subscription;

pub use engine::Broker;
pub use subscription::{SubscriberId, Subscription};
