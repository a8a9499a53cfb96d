//! Periodic delivery trigger.
//!
//! Fires `deliver_message` at a fixed cadence. Each tick runs to completion
//! before the next may start, so delivery cycles never overlap; a failed or
//! panicking tick is logged and the next tick is unaffected.

use crate::outbox::Outbox;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, warn};

/// Drives [`Outbox::deliver_message`] once per period.
pub struct DeliveryScheduler {
    outbox: Arc<Outbox>,
    period: Duration,
}

impl DeliveryScheduler {
    pub fn new(outbox: Arc<Outbox>, period: Duration) -> Self {
        Self { outbox, period }
    }

    /// Spawn the tick loop. Stop it with [`SchedulerHandle::stop`].
    pub fn start(self) -> SchedulerHandle {
        let DeliveryScheduler { outbox, period } = self;
        let (shutdown, mut shutdown_signal) = watch::channel(false);

        let task = tokio::spawn(async move {
            let mut ticker = interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        // Each tick runs in its own task: a panic out of a
                        // buggy transport ends that tick, not the trigger.
                        let tick = tokio::spawn({
                            let outbox = outbox.clone();
                            async move { outbox.deliver_message().await }
                        });
                        match tick.await {
                            Ok(Ok(())) => {}
                            Ok(Err(error)) => {
                                warn!(error = %error, "delivery tick failed");
                            }
                            Err(error) => {
                                warn!(error = %error, "delivery tick panicked");
                            }
                        }
                    }
                    _ = shutdown_signal.changed() => break,
                }
            }

            debug!("delivery scheduler stopped");
        });

        SchedulerHandle { shutdown, task }
    }
}

/// Handle to a running scheduler.
pub struct SchedulerHandle {
    shutdown: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl SchedulerHandle {
    /// Signal the loop to stop and wait for it to wind down. A tick in
    /// progress finishes first.
    pub async fn stop(self) {
        let _ = self.shutdown.send(true);
        let _ = self.task.await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TransportError;
    use crate::message::{Message, Payload, Topic};
    use crate::propagation::NoopPropagation;
    use crate::store::{EntryStore, InMemoryEntryStore};
    use crate::tests::harness::MockTransport;
    use crate::transport::Transport;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::atomic::{AtomicBool, Ordering};

    #[tokio::test]
    async fn scheduler_drains_the_store_and_stops_cleanly() {
        let store = Arc::new(InMemoryEntryStore::new());
        let transport = Arc::new(MockTransport::new());
        let outbox = Arc::new(Outbox::new(
            store.clone(),
            transport.clone(),
            Arc::new(NoopPropagation),
        ));

        outbox
            .send_message(Message::new("user.events", json!({"n": 1})))
            .await
            .unwrap();
        outbox
            .send_message(Message::new("user.events", json!({"n": 2})))
            .await
            .unwrap();

        let handle = DeliveryScheduler::new(outbox, Duration::from_millis(10)).start();
        tokio::time::sleep(Duration::from_millis(200)).await;
        handle.stop().await;

        assert_eq!(transport.delivery_count(), 2);
        assert_eq!(store.acquire().await.unwrap(), None);
    }

    /// Transport that panics on its first delivery and succeeds afterwards.
    struct PanicOnceTransport {
        panicked: AtomicBool,
    }

    #[async_trait]
    impl Transport for PanicOnceTransport {
        async fn deliver_to_topic(
            &self,
            _topic: &Topic,
            _payload: &Payload,
        ) -> Result<(), TransportError> {
            if !self.panicked.swap(true, Ordering::SeqCst) {
                panic!("transport blew up");
            }
            Ok(())
        }
    }

    #[tokio::test]
    async fn a_panicking_transport_does_not_kill_the_trigger() {
        let store = Arc::new(InMemoryEntryStore::new());
        let transport = Arc::new(PanicOnceTransport {
            panicked: AtomicBool::new(false),
        });
        let outbox = Arc::new(Outbox::new(
            store.clone(),
            transport,
            Arc::new(NoopPropagation),
        ));

        outbox
            .send_message(Message::new("user.events", json!({"n": 1})))
            .await
            .unwrap();
        outbox
            .send_message(Message::new("user.events", json!({"n": 2})))
            .await
            .unwrap();

        let handle = DeliveryScheduler::new(outbox, Duration::from_millis(10)).start();
        tokio::time::sleep(Duration::from_millis(300)).await;
        handle.stop().await;

        // The panicked attempt left its entry pending (acquire is a peek);
        // later ticks delivered both entries.
        assert_eq!(store.acquire().await.unwrap(), None);
    }
}
