//! Configuration for the outbox.

use crate::store::DEFAULT_COMMAND_CAPACITY;
use std::time::Duration;

/// Default delivery cadence.
const DEFAULT_DELIVERY_INTERVAL_MS: u64 = 1000;

/// Outbox configuration.
///
/// # Examples
///
/// ```no_run
/// use outbox::{InMemoryEntryStore, OutboxConfig};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let config = OutboxConfig::from_env();
/// let store = InMemoryEntryStore::with_capacity(config.command_capacity);
/// # let _ = store;
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboxConfig {
    /// How often the scheduler fires a delivery tick.
    pub delivery_interval: Duration,

    /// Capacity of the in-memory store's command channel; producers block
    /// on `send_message` once it is full.
    pub command_capacity: usize,
}

impl Default for OutboxConfig {
    fn default() -> Self {
        Self {
            delivery_interval: Duration::from_millis(DEFAULT_DELIVERY_INTERVAL_MS),
            command_capacity: DEFAULT_COMMAND_CAPACITY,
        }
    }
}

impl OutboxConfig {
    /// Build a config from the environment, falling back to defaults:
    /// `OUTBOX_DELIVERY_INTERVAL_MS` and `OUTBOX_COMMAND_CAPACITY`.
    pub fn from_env() -> Self {
        let delivery_interval_ms: u64 = std::env::var("OUTBOX_DELIVERY_INTERVAL_MS")
            .ok()
            .and_then(|value| value.parse().ok())
            .unwrap_or(DEFAULT_DELIVERY_INTERVAL_MS);

        let command_capacity: usize = std::env::var("OUTBOX_COMMAND_CAPACITY")
            .ok()
            .and_then(|value| value.parse().ok())
            .unwrap_or(DEFAULT_COMMAND_CAPACITY);

        Self {
            delivery_interval: Duration::from_millis(delivery_interval_ms),
            command_capacity,
        }
    }
}
