//! The remote-store seam.
//!
//! The engine consumes a remote data store through the [`DataStore`]
//! trait: point reads that suspend as [`PendingFetch`] values, and
//! change-notification subscriptions keyed by collection.
//!
//! # Example
//!
//! ```ignore
//! let store = MemoryStore::new();
//! let handle = store.watch(Collection::ChatMessages, WatchFilter::any());
//! let events = handle.events();
//!
//! store.insert_message(message);
//! while let Ok(event) = events.try_recv() {
//!     println!("changed: {:?}", event.kind);
//! }
//! ```

mod fetch;
mod hub;
mod memory;
mod types;

pub use fetch::{FetchCompletion, PendingFetch};
pub use hub::{ChangeHub, WatchHandle};
pub use memory::MemoryStore;
pub use types::{ChangeEvent, ChangeKind, Collection, SubscriptionId, WatchFilter};

use crate::error::Result;
use crate::types::{ChatMessage, Identity, Profile};

/// A remote data store with point reads and push notifications.
///
/// Reads return pending results rather than blocking; subscriptions
/// deliver a [`ChangeEvent`] for every mutation on the watched
/// collection, unfiltered by identity.
pub trait DataStore: Send + Sync {
    /// Single-row read of an identity's profile.
    fn fetch_profile(&self, identity: &Identity) -> PendingFetch<Result<Profile>>;

    /// Read all messages owned by `owner`. Delivery order is
    /// store-defined; callers materialize their own ordering.
    fn fetch_messages(&self, owner: &Identity) -> PendingFetch<Result<Vec<ChatMessage>>>;

    /// Open a change-notification subscription on a collection.
    fn watch(&self, collection: Collection, filter: WatchFilter) -> WatchHandle;
}
