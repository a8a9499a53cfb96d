//! Outbox: transactional-outbox message delivery.
//!
//! Producers record a message inside their own flow with
//! [`Outbox::send_message`]; a periodic delivery tick drains the store one
//! entry at a time with [`Outbox::deliver_message`], restoring the
//! producer's distributed tracing context around each attempt.
//!
//! # Core Invariants
//!
//! 1. **At-Least-Once**: an entry exists in the store from the moment
//!    `store` succeeds until `remove` succeeds; a crash mid-delivery leaves
//!    it pending for a later attempt.
//! 2. **Peek-Then-Act**: `acquire` never removes the entry; only an explicit
//!    `remove` after a successful transport call does.
//! 3. **One In-Flight**: a delivery tick processes at most one entry and
//!    runs to completion before the next tick may start.
//! 4. **FIFO**: `acquire` returns the entry that has been pending longest.
//! 5. **Context-Carrying**: the tracing context captured at send time is
//!    restored around the delivery attempt, so spans created by the
//!    transport are parented to the producer's trace.
//!
//! # Architecture
//!
//! ```text
//! producer ──▶ send_message ──▶ Entry Store
//!                                    │ acquire / release / remove
//! tick ──▶ deliver_message ──▶ Transport::deliver_to_topic
//! ```

pub mod config;
pub mod error;
pub mod message;
pub mod outbox;
pub mod propagation;
pub mod scheduler;
pub mod store;
pub mod transport;

#[cfg(test)]
mod tests;

pub use config::OutboxConfig;
pub use error::{DeliveryError, SendError, StoreError, TransportError};
pub use message::{EntryId, Message, MessageEntry, Payload, Topic, TracingContext};
pub use outbox::Outbox;
pub use propagation::{NoopPropagation, TracingPropagation};
pub use scheduler::{DeliveryScheduler, SchedulerHandle};
pub use store::{EntryStore, InMemoryEntryStore};
pub use transport::Transport;
