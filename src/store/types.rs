//! Change-notification types for watched collections.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A watched collection in the remote store.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Collection {
    Profiles,
    ChatMessages,
}

impl Collection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Collection::Profiles => "profiles",
            Collection::ChatMessages => "chat_messages",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of row mutation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    Insert,
    Update,
    Delete,
}

/// Event-kind filter for a subscription.
#[derive(Clone, Debug, Default)]
pub struct WatchFilter {
    /// Kinds to deliver (`None` = all kinds).
    pub kinds: Option<Vec<ChangeKind>>,
}

impl WatchFilter {
    /// Deliver every mutation kind.
    pub fn any() -> Self {
        Self { kinds: None }
    }

    /// Deliver only one mutation kind.
    pub fn only(kind: ChangeKind) -> Self {
        Self {
            kinds: Some(vec![kind]),
        }
    }

    pub fn matches(&self, kind: ChangeKind) -> bool {
        match &self.kinds {
            None => true,
            Some(kinds) => kinds.contains(&kind),
        }
    }
}

/// A change notification delivered on a watched collection.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ChangeEvent {
    pub collection: Collection,
    pub kind: ChangeKind,

    /// The affected row: the new row for inserts and updates, the old
    /// row for deletes. Payload shape is store-defined; watchers decode
    /// what they need.
    pub row: serde_json::Value,
}

/// Unique identifier for a subscription.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub u64);
