//! Entry store: the holding area for pending outbox entries.
//!
//! [`InMemoryEntryStore`] runs all mutation on a dedicated actor task behind
//! a bounded command channel, so the backing collection has a single writer
//! and store operations never run on the caller's own execution context.

use crate::error::StoreError;
use crate::message::{EntryId, MessageEntry};
use async_trait::async_trait;
use std::collections::VecDeque;
use tokio::sync::{mpsc, oneshot};
use tracing::debug;

/// Default capacity of the store's command channel.
pub(crate) const DEFAULT_COMMAND_CAPACITY: usize = 64;

/// Contract for the holding area of pending entries.
///
/// All operations may suspend; implementations must keep the backing
/// collection consistent under concurrent callers.
#[async_trait]
pub trait EntryStore: Send + Sync {
    /// Append an entry. Once this returns `Ok`, the entry is visible to
    /// subsequent [`acquire`](EntryStore::acquire) calls.
    async fn store(&self, entry: MessageEntry) -> Result<(), StoreError>;

    /// Return the earliest still-pending entry without removing it (a peek,
    /// not a pop), or `None` when the store is empty. The entry stays
    /// stored while in flight and is only cleared by an explicit
    /// [`remove`](EntryStore::remove).
    async fn acquire(&self) -> Result<Option<MessageEntry>, StoreError>;

    /// Mark an in-flight entry as pending again after a failed delivery
    /// attempt. For this store the entry never left, so there is nothing to
    /// put back; a store that leases entries on `acquire` clears the lease
    /// here.
    async fn release(&self, entry: &MessageEntry) -> Result<(), StoreError>;

    /// Delete an entry by id. Fails with [`StoreError::Unknown`] when the
    /// entry is no longer present.
    async fn remove(&self, entry: &MessageEntry) -> Result<(), StoreError>;
}

enum StoreCommand {
    Store {
        entry: MessageEntry,
        reply: oneshot::Sender<Result<(), StoreError>>,
    },
    Acquire {
        reply: oneshot::Sender<Result<Option<MessageEntry>, StoreError>>,
    },
    Release {
        id: EntryId,
        reply: oneshot::Sender<Result<(), StoreError>>,
    },
    Remove {
        id: EntryId,
        reply: oneshot::Sender<Result<(), StoreError>>,
    },
}

/// In-process entry store backed by an insertion-ordered queue.
///
/// A spawned task owns the queue; callers talk to it over a bounded mpsc
/// channel and await a oneshot reply. A closed channel in either direction
/// maps to [`StoreError::Unknown`].
#[derive(Clone)]
pub struct InMemoryEntryStore {
    commands: mpsc::Sender<StoreCommand>,
}

impl InMemoryEntryStore {
    /// Spawn the store task. Must be called within a Tokio runtime.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_COMMAND_CAPACITY)
    }

    /// Spawn the store task with an explicit command-channel capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        let (commands, receiver) = mpsc::channel(capacity);
        tokio::spawn(run_store(receiver));
        Self { commands }
    }

    async fn send(&self, command: StoreCommand) -> Result<(), StoreError> {
        self.commands
            .send(command)
            .await
            .map_err(|_| StoreError::Unknown)
    }
}

impl Default for InMemoryEntryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EntryStore for InMemoryEntryStore {
    async fn store(&self, entry: MessageEntry) -> Result<(), StoreError> {
        let (reply, response) = oneshot::channel();
        self.send(StoreCommand::Store { entry, reply }).await?;
        response.await.map_err(|_| StoreError::Unknown)?
    }

    async fn acquire(&self) -> Result<Option<MessageEntry>, StoreError> {
        let (reply, response) = oneshot::channel();
        self.send(StoreCommand::Acquire { reply }).await?;
        response.await.map_err(|_| StoreError::Unknown)?
    }

    async fn release(&self, entry: &MessageEntry) -> Result<(), StoreError> {
        let (reply, response) = oneshot::channel();
        self.send(StoreCommand::Release {
            id: entry.id,
            reply,
        })
        .await?;
        response.await.map_err(|_| StoreError::Unknown)?
    }

    async fn remove(&self, entry: &MessageEntry) -> Result<(), StoreError> {
        let (reply, response) = oneshot::channel();
        self.send(StoreCommand::Remove {
            id: entry.id,
            reply,
        })
        .await?;
        response.await.map_err(|_| StoreError::Unknown)?
    }
}

/// Store actor loop. Exits when every handle has been dropped.
async fn run_store(mut commands: mpsc::Receiver<StoreCommand>) {
    let mut entries: VecDeque<MessageEntry> = VecDeque::new();

    while let Some(command) = commands.recv().await {
        match command {
            StoreCommand::Store { entry, reply } => {
                debug!(entry_id = %entry.id, topic = %entry.message.topic, "stored entry");
                entries.push_back(entry);
                let _ = reply.send(Ok(()));
            }
            StoreCommand::Acquire { reply } => {
                let front = entries.front().cloned();
                if let Some(entry) = &front {
                    debug!(entry_id = %entry.id, "acquired entry");
                }
                let _ = reply.send(Ok(front));
            }
            StoreCommand::Release { id, reply } => {
                // The entry was never removed by acquire; acknowledging the
                // release is enough to make it eligible for the next tick.
                debug!(entry_id = %id, "released entry");
                let _ = reply.send(Ok(()));
            }
            StoreCommand::Remove { id, reply } => {
                let result = match entries.iter().position(|entry| entry.id == id) {
                    Some(index) => {
                        entries.remove(index);
                        debug!(entry_id = %id, remaining = entries.len(), "removed entry");
                        Ok(())
                    }
                    None => Err(StoreError::Unknown),
                };
                let _ = reply.send(result);
            }
        }
    }

    debug!("entry store task stopped");
}
