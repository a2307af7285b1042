//! Record list synchronizer.
//!
//! Full list read plus a long-lived change subscription. Every change
//! notification on the watched collection, regardless of kind, triggers a
//! complete refetch; the displayed list is only ever replaced wholesale
//! with a fresh snapshot. The redundant reads this costs under high
//! mutation rates buy the absence of incremental merge logic: the list is
//! always a complete snapshot as of the last successful fetch.

use std::sync::Arc;

use crossbeam_channel::Receiver;

use crate::error::Result;
use crate::store::{ChangeEvent, Collection, DataStore, PendingFetch, WatchFilter};
use crate::types::{ChatMessage, Generation, Identity};

use super::lifecycle::{Lifecycle, ViewPhase};
use super::{admits, GenerationClock};

/// Outcome of one poll pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RecordsPoll {
    /// The displayed list was replaced with a fresh snapshot.
    pub replaced: bool,

    /// A fetch failed; the caller should surface a notification.
    pub failed: bool,
}

/// Mirrors the identity's message list from the remote store.
pub struct RecordSync {
    owner: Identity,
    store: Arc<dyn DataStore>,
    clock: GenerationClock,
    applied: Option<Generation>,
    pending: Option<(Generation, PendingFetch<Result<Vec<ChatMessage>>>)>,
    events: Option<Receiver<ChangeEvent>>,
    messages: Vec<ChatMessage>,
    loading: bool,
}

impl RecordSync {
    /// Issue the initial full read and open the any-kind subscription.
    pub fn start(store: Arc<dyn DataStore>, owner: Identity, lifecycle: &mut Lifecycle) -> Self {
        let handle = store.watch(Collection::ChatMessages, WatchFilter::any());
        let events = lifecycle.adopt(handle);
        let mut sync = Self {
            owner,
            store,
            clock: GenerationClock::new(),
            applied: None,
            pending: None,
            events: Some(events),
            messages: Vec::new(),
            loading: true,
        };
        sync.issue_fetch();
        sync
    }

    /// The materialized list, sorted by `created_at` descending.
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// `true` until the first fetch resolves (success or failure). Never
    /// reset by later refetches: the last-known list stays on screen
    /// while refreshing.
    pub fn loading(&self) -> bool {
        self.loading
    }

    fn issue_fetch(&mut self) {
        let generation = self.clock.tick();
        tracing::debug!(owner = %self.owner, ?generation, "fetching message list");
        self.pending = Some((generation, self.store.fetch_messages(&self.owner)));
    }

    /// Drain subscription events and the pending fetch.
    ///
    /// Change events coalesce: any number of notifications since the last
    /// poll triggers one refetch, which converges to the same snapshot.
    pub fn poll(&mut self, lifecycle: &mut Lifecycle) -> RecordsPoll {
        let mut outcome = RecordsPoll::default();
        if !lifecycle.is_live() {
            return outcome;
        }

        let mut changes = 0usize;
        if let Some(events) = self.events.clone() {
            while let Ok(event) = events.try_recv() {
                tracing::debug!(kind = ?event.kind, "message collection changed");
                changes += 1;
            }
        }
        if changes > 0 {
            self.issue_fetch();
            if lifecycle.phase() == ViewPhase::Ready {
                lifecycle.transition(ViewPhase::Refetching);
            }
        }

        if let Some((generation, mut fetch)) = self.pending.take() {
            match fetch.try_take() {
                None => self.pending = Some((generation, fetch)),
                Some(result) => {
                    self.loading = false;
                    match result {
                        Ok(mut rows) => {
                            if admits(self.applied, generation) {
                                rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
                                self.messages = rows;
                                self.applied = Some(generation);
                                outcome.replaced = true;
                            } else {
                                tracing::debug!(?generation, "discarding stale message snapshot");
                            }
                        }
                        Err(error) => {
                            tracing::error!(owner = %self.owner, error = %error, "message list read failed");
                            outcome.failed = true;
                        }
                    }
                    if matches!(lifecycle.phase(), ViewPhase::Fetching | ViewPhase::Refetching) {
                        lifecycle.transition(ViewPhase::Ready);
                    }
                }
            }
        }

        outcome
    }
}
