//! Data model for outbox entries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use uuid::Uuid;

/// Opaque destination identifier for a message.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Topic(String);

impl Topic {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Topic {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for Topic {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Opaque message body. The outbox never inspects it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Payload(pub serde_json::Value);

impl From<serde_json::Value> for Payload {
    fn from(value: serde_json::Value) -> Self {
        Self(value)
    }
}

/// The logical unit a producer wants delivered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub topic: Topic,
    pub payload: Payload,
}

impl Message {
    pub fn new(topic: impl Into<Topic>, payload: impl Into<Payload>) -> Self {
        Self {
            topic: topic.into(),
            payload: payload.into(),
        }
    }
}

/// Globally unique entry identifier, assigned when the entry is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(Uuid);

impl EntryId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for EntryId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Wire-format-agnostic snapshot of distributed-tracing identifiers.
///
/// The concrete key names (e.g. `traceparent`) belong to whichever
/// propagation backend produced the snapshot; the outbox stores and restores
/// them as opaque key/value pairs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TracingContext {
    fields: HashMap<String, String>,
}

impl TracingContext {
    /// An empty snapshot: no tracing context was active at capture time.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    pub fn fields(&self) -> &HashMap<String, String> {
        &self.fields
    }
}

impl From<HashMap<String, String>> for TracingContext {
    fn from(fields: HashMap<String, String>) -> Self {
        Self { fields }
    }
}

/// The unit of work tracked by the entry store. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageEntry {
    pub id: EntryId,
    pub message: Message,
    pub tracing_context: TracingContext,
    pub created_at: DateTime<Utc>,
}

impl MessageEntry {
    /// Build an entry with a fresh id for a message and its captured
    /// tracing context.
    pub fn new(message: Message, tracing_context: TracingContext) -> Self {
        Self {
            id: EntryId::new(),
            message,
            tracing_context,
            created_at: Utc::now(),
        }
    }
}
