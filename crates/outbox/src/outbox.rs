//! The outbox protocol: producer-side `send_message` and the per-tick
//! consumer-side `deliver_message`.

use crate::error::{DeliveryError, SendError};
use crate::message::{Message, MessageEntry};
use crate::propagation::TracingPropagation;
use crate::store::EntryStore;
use crate::transport::Transport;
use std::sync::Arc;
use tracing::{debug, info, warn, Instrument};

/// Orchestrates the entry lifecycle: store → acquire → deliver →
/// release-or-remove.
pub struct Outbox {
    store: Arc<dyn EntryStore>,
    transport: Arc<dyn Transport>,
    propagation: Arc<dyn TracingPropagation>,
}

impl Outbox {
    pub fn new(
        store: Arc<dyn EntryStore>,
        transport: Arc<dyn Transport>,
        propagation: Arc<dyn TracingPropagation>,
    ) -> Self {
        Self {
            store,
            transport,
            propagation,
        }
    }

    /// Record that `message` must be delivered.
    ///
    /// Captures the caller's tracing context, builds an entry with a fresh
    /// id and persists it. A store failure maps to
    /// [`SendError::Persistence`].
    pub async fn send_message(&self, message: Message) -> Result<(), SendError> {
        let tracing_context = self.propagation.capture();
        let entry = MessageEntry::new(message, tracing_context);
        debug!(entry_id = %entry.id, topic = %entry.message.topic, "storing message");
        self.store.store(entry).await?;
        Ok(())
    }

    /// Run one delivery tick: at most one entry is attempted.
    ///
    /// The transport call and its release-or-remove follow-up run inside a
    /// span parented to the entry's captured tracing context. Transport
    /// failures never escape; only store failures surface, as
    /// [`DeliveryError::Persistence`].
    pub async fn deliver_message(&self) -> Result<(), DeliveryError> {
        let Some(entry) = self.store.acquire().await? else {
            return Ok(());
        };

        let span = self.propagation.delivery_span(&entry.tracing_context);
        async {
            debug!(entry_id = %entry.id, topic = %entry.message.topic, "delivering entry");
            match self
                .transport
                .deliver_to_topic(&entry.message.topic, &entry.message.payload)
                .await
            {
                Ok(()) => {
                    self.store.remove(&entry).await?;
                    info!(entry_id = %entry.id, topic = %entry.message.topic, "entry delivered");
                    Ok(())
                }
                Err(error) => {
                    warn!(
                        entry_id = %entry.id,
                        topic = %entry.message.topic,
                        error = %error,
                        "delivery failed, entry stays pending"
                    );
                    self.store.release(&entry).await?;
                    Ok(())
                }
            }
        }
        .instrument(span)
        .await
    }
}
