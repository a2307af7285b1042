//! In-memory reference backend.
//!
//! [`MemoryStore`] implements [`DataStore`](super::DataStore) against
//! process-local rows, broadcasting a change event for every mutation.
//! It exists for tests and local development, and can defer fetch
//! completion so callers can interleave pushes and in-flight reads
//! deterministically:
//!
//! - immediate mode (`MemoryStore::new`): fetches resolve at issue time;
//! - deferred mode (`MemoryStore::deferred`): fetches snapshot their
//!   result at issue time but deliver only when released, mimicking a
//!   slow transport.
//!
//! Message delivery order is unspecified (insertion order in practice);
//! ordering the displayed list is the synchronizer's job.

use parking_lot::{Mutex, RwLock};
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use crate::error::{Result, SyncError};
use crate::types::{ChatMessage, Identity, MessageId, Profile};

use super::fetch::PendingFetch;
use super::hub::{ChangeHub, WatchHandle};
use super::types::{ChangeEvent, ChangeKind, Collection, WatchFilter};
use super::DataStore;

/// A fetch whose result was computed at issue time but not yet delivered.
struct QueuedFetch {
    deliver: Box<dyn FnOnce() + Send>,
}

struct Inner {
    profiles: RwLock<HashMap<Identity, Profile>>,
    messages: RwLock<Vec<ChatMessage>>,
    hub: ChangeHub,
    deferred: bool,
    queued: Mutex<VecDeque<QueuedFetch>>,
    faults: Mutex<Vec<Collection>>,
}

/// In-memory data store with change notifications.
#[derive(Clone)]
pub struct MemoryStore {
    inner: Arc<Inner>,
}

impl MemoryStore {
    /// Store whose fetches resolve immediately.
    pub fn new() -> Self {
        Self::with_mode(false)
    }

    /// Store whose fetches stay pending until explicitly released.
    pub fn deferred() -> Self {
        Self::with_mode(true)
    }

    fn with_mode(deferred: bool) -> Self {
        Self {
            inner: Arc::new(Inner {
                profiles: RwLock::new(HashMap::new()),
                messages: RwLock::new(Vec::new()),
                hub: ChangeHub::new(),
                deferred,
                queued: Mutex::new(VecDeque::new()),
                faults: Mutex::new(Vec::new()),
            }),
        }
    }

    // --- Mutations (broadcast a change event each) ---

    /// Insert or replace a profile row.
    pub fn upsert_profile(&self, profile: Profile) {
        let kind = {
            let mut profiles = self.inner.profiles.write();
            let kind = if profiles.contains_key(&profile.id) {
                ChangeKind::Update
            } else {
                ChangeKind::Insert
            };
            profiles.insert(profile.id.clone(), profile.clone());
            kind
        };
        self.broadcast(Collection::Profiles, kind, row_json(&profile));
    }

    /// Append a message row.
    pub fn insert_message(&self, message: ChatMessage) {
        self.inner.messages.write().push(message.clone());
        self.broadcast(Collection::ChatMessages, ChangeKind::Insert, row_json(&message));
    }

    /// Replace a message's content. Returns `false` if the row is absent.
    pub fn update_message(&self, id: &MessageId, content: &str) -> bool {
        let updated = {
            let mut messages = self.inner.messages.write();
            match messages.iter_mut().find(|m| &m.id == id) {
                Some(message) => {
                    message.content = content.to_string();
                    Some(message.clone())
                }
                None => None,
            }
        };
        match updated {
            Some(message) => {
                self.broadcast(Collection::ChatMessages, ChangeKind::Update, row_json(&message));
                true
            }
            None => false,
        }
    }

    /// Remove a message row. Returns `false` if the row is absent.
    pub fn delete_message(&self, id: &MessageId) -> bool {
        let removed = {
            let mut messages = self.inner.messages.write();
            match messages.iter().position(|m| &m.id == id) {
                Some(index) => Some(messages.remove(index)),
                None => None,
            }
        };
        match removed {
            Some(message) => {
                self.broadcast(Collection::ChatMessages, ChangeKind::Delete, row_json(&message));
                true
            }
            None => false,
        }
    }

    fn broadcast(&self, collection: Collection, kind: ChangeKind, row: serde_json::Value) {
        self.inner.hub.broadcast(ChangeEvent {
            collection,
            kind,
            row,
        });
    }

    // --- Test controls ---

    /// Make the next fetch on `collection` fail with a transport error.
    pub fn fail_next(&self, collection: Collection) {
        self.inner.faults.lock().push(collection);
    }

    /// Deliver the oldest queued fetch result. Returns `false` if none
    /// is queued. Only meaningful in deferred mode.
    pub fn release_next_fetch(&self) -> bool {
        let queued = self.inner.queued.lock().pop_front();
        match queued {
            Some(fetch) => {
                (fetch.deliver)();
                true
            }
            None => false,
        }
    }

    /// Deliver every queued fetch result, oldest first.
    pub fn release_all_fetches(&self) -> usize {
        let mut released = 0;
        while self.release_next_fetch() {
            released += 1;
        }
        released
    }

    /// Number of queued (undelivered) fetches.
    pub fn pending_fetches(&self) -> usize {
        self.inner.queued.lock().len()
    }

    /// Number of open change subscriptions.
    pub fn watcher_count(&self) -> usize {
        self.inner.hub.subscriber_count()
    }

    // --- Direct reads (test assertions) ---

    /// Messages owned by `owner`, in insertion order.
    pub fn messages_for(&self, owner: &Identity) -> Vec<ChatMessage> {
        self.inner
            .messages
            .read()
            .iter()
            .filter(|m| &m.owner_id == owner)
            .cloned()
            .collect()
    }

    pub fn profile_of(&self, identity: &Identity) -> Option<Profile> {
        self.inner.profiles.read().get(identity).cloned()
    }

    // --- Fetch plumbing ---

    fn take_fault(&self, collection: Collection) -> Option<SyncError> {
        let mut faults = self.inner.faults.lock();
        faults.iter().position(|c| *c == collection).map(|index| {
            faults.remove(index);
            SyncError::Transport("injected transport failure".to_string())
        })
    }

    /// Resolve a fetch either immediately or via the deferred queue. The
    /// result is snapshotted at issue time, so a deferred fetch delivers
    /// what the store contained when the read was issued.
    fn dispatch<T: Send + 'static>(&self, result: Result<T>) -> PendingFetch<Result<T>> {
        if !self.inner.deferred {
            return PendingFetch::ready(result);
        }
        let (completion, fetch) = PendingFetch::channel();
        self.inner.queued.lock().push_back(QueuedFetch {
            deliver: Box::new(move || {
                // The consumer may be gone (view unmounted); that is fine.
                let _ = completion.complete(result);
            }),
        });
        fetch
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl DataStore for MemoryStore {
    fn fetch_profile(&self, identity: &Identity) -> PendingFetch<Result<Profile>> {
        let result = match self.take_fault(Collection::Profiles) {
            Some(error) => Err(error),
            None => self
                .inner
                .profiles
                .read()
                .get(identity)
                .cloned()
                .ok_or_else(|| SyncError::MissingRow {
                    collection: Collection::Profiles,
                    key: identity.to_string(),
                }),
        };
        self.dispatch(result)
    }

    fn fetch_messages(&self, owner: &Identity) -> PendingFetch<Result<Vec<ChatMessage>>> {
        let result = match self.take_fault(Collection::ChatMessages) {
            Some(error) => Err(error),
            None => Ok(self.messages_for(owner)),
        };
        self.dispatch(result)
    }

    fn watch(&self, collection: Collection, filter: WatchFilter) -> WatchHandle {
        self.inner.hub.subscribe(collection, filter)
    }
}

fn row_json<T: serde::Serialize>(row: &T) -> serde_json::Value {
    serde_json::to_value(row).unwrap_or(serde_json::Value::Null)
}
