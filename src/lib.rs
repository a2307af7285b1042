//! # View Sync
//!
//! A client-side reconciliation engine that keeps user-scoped views
//! consistent with a remote data store supporting point reads and push
//! notifications on row change.
//!
//! ## Core Concepts
//!
//! - **Identity**: the authenticated principal; absence is a state, not
//!   an error
//! - **Watchers**: one-shot reads paired with long-lived change
//!   subscriptions (locale preference, message list)
//! - **Full resync**: any change on a watched collection replaces the
//!   displayed list wholesale with a fresh snapshot
//! - **Generations**: out-of-order results are discarded by monotonic
//!   tag, never applied by arrival order
//! - **Lifecycle**: exactly-once subscribe/unsubscribe pairing; results
//!   arriving after unmount are discarded
//!
//! ## Example
//!
//! ```ignore
//! use viewsync::{FeedView, MemoryAuth, MemoryStore, ViewEnv};
//!
//! let store = MemoryStore::new();
//! let env = ViewEnv {
//!     auth: Arc::new(MemoryAuth::signed_in(identity)),
//!     store: Arc::new(store.clone()),
//!     translator,
//!     notifier,
//!     navigator,
//! };
//!
//! let mut feed = FeedView::mount(env);
//! feed.poll();
//! assert!(!feed.loading());
//!
//! // ... rows change remotely; each notification triggers a resync ...
//! feed.poll();
//!
//! feed.unmount();
//! ```

pub mod error;
pub mod locale;
pub mod providers;
pub mod session;
pub mod store;
pub mod sync;
pub mod types;
pub mod views;

// Re-exports
pub use error::{Result, SyncError};
pub use locale::{Direction, LocaleCode, RenderContext, RTL_LANGUAGES};
pub use providers::{Navigator, Notice, NoticeVariant, Notifier, Translator, ViewEnv};
pub use session::{AuthProvider, MemoryAuth, SessionResolver};
pub use store::{
    ChangeEvent, ChangeHub, ChangeKind, Collection, DataStore, FetchCompletion, MemoryStore,
    PendingFetch, SubscriptionId, WatchFilter, WatchHandle,
};
pub use sync::{GenerationClock, Lifecycle, ProfileWatcher, RecordSync, RecordsPoll, ViewPhase};
pub use types::{ChatMessage, Generation, Identity, MessageId, Profile, Timestamp};
pub use views::{FeedView, IntakeView};
