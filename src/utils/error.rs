use thiserror::Error;

/// Rejection of a message submission.
///
/// Reported synchronously to the submitter; the log is never touched and
/// nothing is retried internally.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("payload must not be empty")]
    EmptyPayload,
    #[error("image payload must be a data: URI")]
    NotADataUri,
}

/// Why a live subscription stream ended.
///
/// Scoped to one subscriber; neither variant affects the log or any other
/// subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SubscriptionError {
    /// The delivery queue overflowed and the broker disconnected this
    /// subscriber. Already-enqueued messages were still delivered first.
    #[error("subscription dropped after delivery queue overflow")]
    Overflowed,
    /// The subscription was detached, or the broker is gone.
    #[error("subscription closed")]
    Closed,
}
