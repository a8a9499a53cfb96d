//! Transport seam: the capability that actually moves a message.

use crate::error::TransportError;
use crate::message::{Payload, Topic};
use async_trait::async_trait;

/// Delivers a payload to a topic on some broker, HTTP endpoint, or other
/// backend. Supplied by the hosting application, never by this crate.
///
/// A failure here is absorbed by the delivery protocol: the entry is
/// released and retried on a later tick. Transports with their own timeout
/// should report a timeout as an ordinary [`TransportError`].
#[async_trait]
pub trait Transport: Send + Sync {
    async fn deliver_to_topic(
        &self,
        topic: &Topic,
        payload: &Payload,
    ) -> Result<(), TransportError>;
}
