//! In-process change-notification fan-out.
//!
//! [`ChangeHub`] broadcasts row mutations to subscribers. Each
//! subscription is keyed by collection, filterable by event kind, and
//! delivers events over a bounded buffer; a subscriber that falls too far
//! behind is dropped rather than allowed to stall the publisher.

use crossbeam_channel::{bounded, Receiver, Sender};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use super::types::{ChangeEvent, Collection, SubscriptionId, WatchFilter};

/// Default buffered events per subscriber.
const DEFAULT_BUFFER: usize = 256;

/// Internal subscriber state.
struct Subscriber {
    collection: Collection,
    filter: WatchFilter,
    sender: Sender<ChangeEvent>,
}

impl Subscriber {
    /// Try to send an event. Returns `false` if the buffer is full or the
    /// receiver is gone (subscriber will be dropped).
    fn try_send(&self, event: ChangeEvent) -> bool {
        self.sender.try_send(event).is_ok()
    }

    fn matches(&self, event: &ChangeEvent) -> bool {
        self.collection == event.collection && self.filter.matches(event.kind)
    }
}

struct HubInner {
    subscribers: RwLock<HashMap<SubscriptionId, Subscriber>>,
    next_id: AtomicU64,
}

impl HubInner {
    fn unsubscribe(&self, id: SubscriptionId) {
        self.subscribers.write().remove(&id);
    }
}

/// Broadcasts change events to per-collection subscribers.
#[derive(Clone)]
pub struct ChangeHub {
    inner: Arc<HubInner>,
}

impl ChangeHub {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(HubInner {
                subscribers: RwLock::new(HashMap::new()),
                next_id: AtomicU64::new(1),
            }),
        }
    }

    /// Open a subscription on a collection with the default buffer.
    pub fn subscribe(&self, collection: Collection, filter: WatchFilter) -> WatchHandle {
        self.subscribe_with_buffer(collection, filter, DEFAULT_BUFFER)
    }

    /// Open a subscription with an explicit buffer size.
    pub fn subscribe_with_buffer(
        &self,
        collection: Collection,
        filter: WatchFilter,
        buffer: usize,
    ) -> WatchHandle {
        let id = SubscriptionId(self.inner.next_id.fetch_add(1, Ordering::SeqCst));
        let (sender, receiver) = bounded(buffer);

        self.inner.subscribers.write().insert(
            id,
            Subscriber {
                collection,
                filter,
                sender,
            },
        );

        WatchHandle {
            id,
            collection,
            events: receiver,
            hub: Arc::clone(&self.inner),
            closed: false,
        }
    }

    /// Broadcast a change event to every matching subscriber.
    pub fn broadcast(&self, event: ChangeEvent) {
        let mut to_remove = Vec::new();

        {
            let subscribers = self.inner.subscribers.read();
            for (id, subscriber) in subscribers.iter() {
                if subscriber.matches(&event) && !subscriber.try_send(event.clone()) {
                    to_remove.push(*id);
                }
            }
        }

        if !to_remove.is_empty() {
            let mut subscribers = self.inner.subscribers.write();
            for id in to_remove {
                subscribers.remove(&id);
                tracing::warn!(subscription = id.0, "dropping slow subscriber");
            }
        }
    }

    /// Number of open subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.inner.subscribers.read().len()
    }
}

impl Default for ChangeHub {
    fn default() -> Self {
        Self::new()
    }
}

/// One open change-notification stream.
///
/// Closing is idempotent and terminal; the handle also closes on drop,
/// so an exactly-once open/close pairing is the type-level default.
pub struct WatchHandle {
    id: SubscriptionId,
    collection: Collection,
    events: Receiver<ChangeEvent>,
    hub: Arc<HubInner>,
    closed: bool,
}

impl WatchHandle {
    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    pub fn collection(&self) -> Collection {
        self.collection
    }

    /// A receiver for this handle's events. Receivers are cheap clones of
    /// the same buffered stream.
    pub fn events(&self) -> Receiver<ChangeEvent> {
        self.events.clone()
    }

    /// Close the subscription. No events are delivered after this call;
    /// calling it again is a no-op.
    pub fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        self.hub.unsubscribe(self.id);
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

impl Drop for WatchHandle {
    fn drop(&mut self) {
        self.close();
    }
}
