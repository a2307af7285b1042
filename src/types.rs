//! Core types for the view synchronization engine.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::locale::LocaleCode;

/// Opaque identifier for the signed-in principal.
///
/// An identity exists only while a session is valid. Absence
/// (`Option<Identity>` being `None`) is a first-class state, not an error.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Identity(pub String);

impl Identity {
    pub fn new(id: impl Into<String>) -> Self {
        Identity(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Identity({})", self.0)
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a chat message row.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageId(pub String);

impl MessageId {
    pub fn new(id: impl Into<String>) -> Self {
        MessageId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MessageId({})", self.0)
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Microseconds since Unix epoch. Assigned by the remote store; this
/// engine never mints timestamps of its own.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub struct Timestamp(pub i64);

impl fmt::Debug for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Timestamp({})", self.0)
    }
}

/// A single chat message, scoped to its owning identity.
///
/// The materialized list of messages is always sorted by `created_at`
/// descending; ties are unordered.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Unique identifier (assigned by the remote store).
    pub id: MessageId,

    /// When the message was created.
    pub created_at: Timestamp,

    /// Message body.
    pub content: String,

    /// The identity that owns this message.
    pub owner_id: Identity,
}

/// Per-identity profile row. One profile per identity.
///
/// Profiles are mutated externally; this engine only observes mutations.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub id: Identity,

    /// Preferred UI language. May be unset for fresh accounts.
    #[serde(default)]
    pub preferred_language: Option<LocaleCode>,
}

/// Monotonically increasing tag used to discard out-of-order
/// asynchronous results.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Generation(pub u64);

impl fmt::Debug for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Gen({})", self.0)
    }
}
