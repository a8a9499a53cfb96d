//! Error taxonomies for the outbox.
//!
//! Store-layer failures never reach callers directly: they are translated
//! into [`SendError`] or [`DeliveryError`] at the protocol boundary.
//! Transport failures are not errors at all — they steer the
//! release-vs-remove branch of a delivery attempt.

use thiserror::Error;

/// The entry store's only failure kind.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreError {
    /// Underlying infrastructure fault, or an operation on an entry that is
    /// no longer present (e.g. `remove` after a concurrent removal).
    #[error("entry store operation failed")]
    Unknown,
}

/// Producer-facing result of `send_message`.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendError {
    /// Storing the entry failed.
    #[error("failed to persist outbox entry")]
    Persistence,

    /// Reserved for message validation; never produced today.
    #[error("message failed validation")]
    Validation,

    /// Unexpected fault.
    #[error("unknown send failure")]
    Unknown,
}

/// Result of one delivery tick.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryError {
    /// A store operation (acquire, release or remove) failed.
    #[error("entry store failed during delivery")]
    Persistence,

    /// Unexpected fault; reserved.
    #[error("unknown delivery failure")]
    Unknown,
}

impl From<StoreError> for SendError {
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::Unknown => SendError::Persistence,
        }
    }
}

impl From<StoreError> for DeliveryError {
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::Unknown => DeliveryError::Persistence,
        }
    }
}

/// Failure reported by a transport. Absorbed by the delivery protocol; a
/// timeout inside the transport should surface as one of these.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("transport delivery failed: {reason}")]
pub struct TransportError {
    reason: String,
}

impl TransportError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}
