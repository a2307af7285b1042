//! Mount/unmount lifecycle and cancellation tests.

mod common;

use common::*;
use viewsync::{FeedView, IntakeView, MemoryAuth, MemoryStore, ViewPhase};

#[test]
fn test_feed_mounts_and_displays() {
    let store = MemoryStore::new();
    store.insert_message(message("m1", 10, "alice"));
    store.insert_message(message("m2", 20, "alice"));
    let h = harness(store, MemoryAuth::signed_in(alice()));

    let mut feed = FeedView::mount(h.env.clone());
    assert_eq!(feed.phase(), ViewPhase::Mounted);
    assert!(feed.loading());

    feed.poll();
    assert_eq!(feed.phase(), ViewPhase::Ready);
    assert!(!feed.loading());
    assert_eq!(displayed_ids(&feed), vec!["m2", "m1"]);
}

#[test]
fn test_unmount_closes_subscriptions_exactly_once() {
    let store = MemoryStore::new();
    store.insert_message(message("m1", 10, "alice"));
    let h = harness(store, MemoryAuth::signed_in(alice()));

    let mut feed = FeedView::mount(h.env.clone());
    feed.poll();
    assert_eq!(h.store.watcher_count(), 1);

    feed.unmount();
    assert_eq!(feed.phase(), ViewPhase::Unmounted);
    assert_eq!(h.store.watcher_count(), 0);

    // Further mutations must not reach the view.
    h.store.insert_message(message("m2", 20, "alice"));
    feed.poll();
    assert_eq!(displayed_ids(&feed), vec!["m1"]);

    // A second unmount is a no-op.
    feed.unmount();
    assert_eq!(h.store.watcher_count(), 0);
}

#[test]
fn test_teardown_discards_inflight_fetch() {
    let store = MemoryStore::deferred();
    store.insert_message(message("m1", 10, "alice"));
    let h = harness(store, MemoryAuth::signed_in(alice()));

    let mut feed = FeedView::mount(h.env.clone());
    // Identity resolves; profile and message fetches are now in flight.
    feed.poll();
    assert_eq!(feed.phase(), ViewPhase::Fetching);
    assert_eq!(h.store.pending_fetches(), 2);

    feed.unmount();

    // The fetches resolve after teardown; their results must be dropped
    // without mutating state, notifying, or logging an error.
    h.store.release_all_fetches();
    feed.poll();

    assert_eq!(feed.phase(), ViewPhase::Unmounted);
    assert!(displayed_ids(&feed).is_empty());
    assert!(h.notifier.notices.lock().is_empty());
    assert!(h.translator.languages.lock().is_empty());
}

#[test]
fn test_intake_unmount_closes_profile_watch() {
    let store = MemoryStore::new();
    store.upsert_profile(profile("alice", "en"));
    let h = harness(store, MemoryAuth::signed_in(alice()));

    let mut intake = IntakeView::mount(h.env.clone());
    intake.poll();
    assert_eq!(h.store.watcher_count(), 1);

    intake.unmount();
    assert_eq!(h.store.watcher_count(), 0);

    // A locale push after unmount changes nothing.
    h.store.upsert_profile(profile("alice", "he"));
    intake.poll();
    assert_eq!(intake.language(), Some(&viewsync::LocaleCode::new("en")));
}

#[test]
fn test_absent_identity_feed_silently_skips() {
    let store = MemoryStore::deferred();
    let h = harness(store, MemoryAuth::signed_out());

    let mut feed = FeedView::mount(h.env.clone());
    feed.poll();

    assert_eq!(feed.phase(), ViewPhase::Ready);
    assert!(!feed.loading());
    assert!(displayed_ids(&feed).is_empty());
    // No fetches were ever issued, and nothing was surfaced to the user.
    assert_eq!(h.store.pending_fetches(), 0);
    assert!(h.notifier.notices.lock().is_empty());
    assert!(h.navigator.events.lock().is_empty());
}

#[test]
fn test_absent_identity_intake_redirects_once() {
    let store = MemoryStore::new();
    let h = harness(store, MemoryAuth::signed_out());

    let mut intake = IntakeView::mount(h.env.clone());
    intake.poll();
    intake.poll();

    let events = h.navigator.events.lock();
    assert_eq!(*events, vec![NavEvent::Redirect("/login".to_string())]);
}

#[test]
fn test_intake_go_back() {
    let store = MemoryStore::new();
    store.upsert_profile(profile("alice", "en"));
    let h = harness(store, MemoryAuth::signed_in(alice()));

    let mut intake = IntakeView::mount(h.env.clone());
    intake.poll();
    intake.go_back();

    assert_eq!(*h.navigator.events.lock(), vec![NavEvent::Back]);
}

#[test]
fn test_poll_after_unmount_is_inert() {
    let store = MemoryStore::new();
    store.insert_message(message("m1", 10, "alice"));
    let h = harness(store, MemoryAuth::signed_in(alice()));

    let mut feed = FeedView::mount(h.env.clone());
    feed.unmount();

    // Unmounted before the identity ever resolved: polling must not
    // start any work.
    feed.poll();
    assert_eq!(feed.phase(), ViewPhase::Unmounted);
    assert!(displayed_ids(&feed).is_empty());
    assert_eq!(h.store.watcher_count(), 0);
}
