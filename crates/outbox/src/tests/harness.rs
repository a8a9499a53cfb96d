//! Test harness: a transport with scripted outcomes that records every
//! delivery it sees, plus a helper that wires up a full outbox.

use crate::error::TransportError;
use crate::message::{Payload, Topic};
use crate::outbox::Outbox;
use crate::propagation::NoopPropagation;
use crate::store::InMemoryEntryStore;
use crate::transport::Transport;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// What the mock transport should do with the next delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportOutcome {
    Succeed,
    Fail,
}

/// A delivery observed by the mock transport.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedDelivery {
    pub topic: Topic,
    pub payload: Payload,
}

/// Transport that follows a queued script of outcomes, falling back to a
/// default outcome once the script is exhausted.
pub struct MockTransport {
    script: Mutex<VecDeque<TransportOutcome>>,
    default_outcome: Mutex<TransportOutcome>,
    deliveries: Mutex<Vec<RecordedDelivery>>,
}

impl MockTransport {
    /// A transport that succeeds on every delivery.
    pub fn new() -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            default_outcome: Mutex::new(TransportOutcome::Succeed),
            deliveries: Mutex::new(Vec::new()),
        }
    }

    /// A transport that fails every delivery.
    pub fn always_failing() -> Self {
        let transport = Self::new();
        transport.set_default_outcome(TransportOutcome::Fail);
        transport
    }

    /// Set the outcome used once the script is exhausted.
    pub fn set_default_outcome(&self, outcome: TransportOutcome) {
        *self.default_outcome.lock().unwrap() = outcome;
    }

    /// Queue an outcome for the next delivery.
    pub fn queue_outcome(&self, outcome: TransportOutcome) {
        self.script.lock().unwrap().push_back(outcome);
    }

    /// Every delivery attempt seen so far, in order.
    pub fn deliveries(&self) -> Vec<RecordedDelivery> {
        self.deliveries.lock().unwrap().clone()
    }

    pub fn delivery_count(&self) -> usize {
        self.deliveries.lock().unwrap().len()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn deliver_to_topic(
        &self,
        topic: &Topic,
        payload: &Payload,
    ) -> Result<(), TransportError> {
        self.deliveries.lock().unwrap().push(RecordedDelivery {
            topic: topic.clone(),
            payload: payload.clone(),
        });

        let outcome = self
            .script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(*self.default_outcome.lock().unwrap());

        match outcome {
            TransportOutcome::Succeed => Ok(()),
            TransportOutcome::Fail => Err(TransportError::new("scripted failure")),
        }
    }
}

/// Wire an outbox over a fresh in-memory store and the given transport,
/// with no-op tracing propagation.
pub fn test_outbox(transport: Arc<MockTransport>) -> (Outbox, Arc<InMemoryEntryStore>) {
    let store = Arc::new(InMemoryEntryStore::new());
    let outbox = Outbox::new(store.clone(), transport, Arc::new(NoopPropagation));
    (outbox, store)
}
