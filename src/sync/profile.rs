//! Locale preference watcher.
//!
//! One-shot read of the identity's profile plus an optional long-lived
//! update subscription. The store-side subscription is unfiltered by
//! identity; events for other rows are dropped here before they can
//! affect the displayed locale.

use crossbeam_channel::Receiver;

use crate::locale::LocaleCode;
use crate::store::{ChangeEvent, ChangeKind, Collection, DataStore, PendingFetch, WatchFilter};
use crate::types::{Generation, Identity, Profile};

use super::lifecycle::Lifecycle;
use super::{admits, GenerationClock};

/// Watches the preferred-language field of one identity's profile.
pub struct ProfileWatcher {
    identity: Identity,
    clock: GenerationClock,
    applied: Option<Generation>,
    pending: Option<(Generation, PendingFetch<crate::error::Result<Profile>>)>,
    events: Option<Receiver<ChangeEvent>>,
}

impl ProfileWatcher {
    /// Issue the one-shot profile read.
    pub fn start(store: &dyn DataStore, identity: Identity) -> Self {
        let mut clock = GenerationClock::new();
        let generation = clock.tick();
        tracing::debug!(identity = %identity, ?generation, "fetching profile");
        let pending = store.fetch_profile(&identity);
        Self {
            identity,
            clock,
            applied: None,
            pending: Some((generation, pending)),
            events: None,
        }
    }

    /// Open the live update subscription on the profiles collection.
    pub fn watch(&mut self, store: &dyn DataStore, lifecycle: &mut Lifecycle) {
        let handle = store.watch(Collection::Profiles, WatchFilter::only(ChangeKind::Update));
        self.events = Some(lifecycle.adopt(handle));
    }

    /// Whether the one-shot read has resolved (either way).
    pub fn settled(&self) -> bool {
        self.pending.is_none()
    }

    /// Drain the pending read and any subscription events, returning the
    /// newest locale to apply, if one was admitted.
    ///
    /// A read failure is logged and tolerated: the displayed locale keeps
    /// its prior value and no user-visible error is raised.
    pub fn poll(&mut self, lifecycle: &Lifecycle) -> Option<LocaleCode> {
        if !lifecycle.is_live() {
            return None;
        }

        let mut newest: Option<(Generation, LocaleCode)> = None;

        if let Some((generation, mut fetch)) = self.pending.take() {
            match fetch.try_take() {
                None => self.pending = Some((generation, fetch)),
                Some(Ok(profile)) => {
                    if let Some(code) = profile.preferred_language {
                        newest = Some((generation, code));
                    }
                }
                Some(Err(error)) => {
                    tracing::error!(identity = %self.identity, error = %error, "profile read failed");
                }
            }
        }

        if let Some(events) = self.events.clone() {
            while let Ok(event) = events.try_recv() {
                let generation = self.clock.tick();
                match serde_json::from_value::<Profile>(event.row) {
                    Ok(row) if row.id == self.identity => {
                        if let Some(code) = row.preferred_language {
                            newest = Some((generation, code));
                        }
                    }
                    Ok(row) => {
                        tracing::debug!(row = %row.id, "ignoring profile event for other identity");
                    }
                    Err(error) => {
                        tracing::debug!(error = %error, "ignoring undecodable profile event");
                    }
                }
            }
        }

        match newest {
            Some((generation, code)) if admits(self.applied, generation) => {
                tracing::debug!(locale = %code, ?generation, "applying locale");
                self.applied = Some(generation);
                Some(code)
            }
            Some((generation, _)) => {
                tracing::debug!(?generation, "discarding stale locale result");
                None
            }
            None => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn profile(id: &str, code: &str) -> Profile {
        Profile {
            id: Identity::new(id),
            preferred_language: Some(LocaleCode::new(code)),
        }
    }

    #[test]
    fn test_one_shot_read_applies_locale() {
        let store = MemoryStore::new();
        store.upsert_profile(profile("alice", "he"));
        let lifecycle = Lifecycle::new();

        let mut watcher = ProfileWatcher::start(&store, Identity::new("alice"));
        assert_eq!(watcher.poll(&lifecycle), Some(LocaleCode::new("he")));
        assert!(watcher.settled());
    }

    #[test]
    fn test_push_event_applies_locale() {
        let store = MemoryStore::new();
        store.upsert_profile(profile("alice", "en"));
        let mut lifecycle = Lifecycle::new();

        let mut watcher = ProfileWatcher::start(&store, Identity::new("alice"));
        watcher.watch(&store, &mut lifecycle);
        assert_eq!(watcher.poll(&lifecycle), Some(LocaleCode::new("en")));

        store.upsert_profile(profile("alice", "fa"));
        assert_eq!(watcher.poll(&lifecycle), Some(LocaleCode::new("fa")));
    }

    #[test]
    fn test_other_identity_events_ignored() {
        let store = MemoryStore::new();
        store.upsert_profile(profile("alice", "en"));
        store.upsert_profile(profile("bob", "en"));
        let mut lifecycle = Lifecycle::new();

        let mut watcher = ProfileWatcher::start(&store, Identity::new("alice"));
        watcher.watch(&store, &mut lifecycle);
        assert_eq!(watcher.poll(&lifecycle), Some(LocaleCode::new("en")));

        store.upsert_profile(profile("bob", "he"));
        assert_eq!(watcher.poll(&lifecycle), None);
    }

    #[test]
    fn test_slow_fetch_does_not_overwrite_push() {
        let store = MemoryStore::deferred();
        store.upsert_profile(profile("alice", "he"));
        let mut lifecycle = Lifecycle::new();

        // Read issued while the row still says "he"; delivery is delayed.
        let mut watcher = ProfileWatcher::start(&store, Identity::new("alice"));
        watcher.watch(&store, &mut lifecycle);

        // A newer preference is pushed and applied first.
        store.upsert_profile(profile("alice", "fa"));
        assert_eq!(watcher.poll(&lifecycle), Some(LocaleCode::new("fa")));

        // The stale read finally lands and must be discarded.
        assert!(store.release_next_fetch());
        assert_eq!(watcher.poll(&lifecycle), None);
    }

    #[test]
    fn test_read_failure_is_silent() {
        let store = MemoryStore::new();
        store.fail_next(Collection::Profiles);
        let lifecycle = Lifecycle::new();

        let mut watcher = ProfileWatcher::start(&store, Identity::new("alice"));
        assert_eq!(watcher.poll(&lifecycle), None);
        assert!(watcher.settled());
    }

    #[test]
    fn test_unset_preference_is_ignored() {
        let store = MemoryStore::new();
        store.upsert_profile(Profile {
            id: Identity::new("alice"),
            preferred_language: None,
        });
        let lifecycle = Lifecycle::new();

        let mut watcher = ProfileWatcher::start(&store, Identity::new("alice"));
        assert_eq!(watcher.poll(&lifecycle), None);
    }
}
