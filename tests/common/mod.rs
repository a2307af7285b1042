//! Shared helpers for integration tests: recording collaborator fakes
//! and a small environment harness.

#![allow(dead_code)]

use parking_lot::Mutex;
use std::sync::Arc;

use viewsync::{
    ChatMessage, FeedView, Identity, LocaleCode, MemoryAuth, MemoryStore, MessageId, Notice,
    Notifier, Navigator, Profile, Timestamp, Translator, ViewEnv,
};

/// Translator that echoes keys and records language changes.
#[derive(Default)]
pub struct RecordingTranslator {
    pub languages: Mutex<Vec<LocaleCode>>,
}

impl Translator for RecordingTranslator {
    fn translate(&self, key: &str) -> String {
        key.to_string()
    }

    fn change_language(&self, code: &LocaleCode) {
        self.languages.lock().push(code.clone());
    }
}

#[derive(Default)]
pub struct RecordingNotifier {
    pub notices: Mutex<Vec<Notice>>,
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notice: Notice) {
        self.notices.lock().push(notice);
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NavEvent {
    Back,
    Redirect(String),
}

#[derive(Default)]
pub struct RecordingNavigator {
    pub events: Mutex<Vec<NavEvent>>,
}

impl Navigator for RecordingNavigator {
    fn go_back(&self) {
        self.events.lock().push(NavEvent::Back);
    }

    fn redirect(&self, path: &str) {
        self.events.lock().push(NavEvent::Redirect(path.to_string()));
    }
}

/// A view environment wired to recording fakes.
pub struct Harness {
    pub store: MemoryStore,
    pub translator: Arc<RecordingTranslator>,
    pub notifier: Arc<RecordingNotifier>,
    pub navigator: Arc<RecordingNavigator>,
    pub env: ViewEnv,
}

pub fn harness(store: MemoryStore, auth: MemoryAuth) -> Harness {
    let translator = Arc::new(RecordingTranslator::default());
    let notifier = Arc::new(RecordingNotifier::default());
    let navigator = Arc::new(RecordingNavigator::default());
    let env = ViewEnv {
        auth: Arc::new(auth),
        store: Arc::new(store.clone()),
        translator: translator.clone(),
        notifier: notifier.clone(),
        navigator: navigator.clone(),
    };
    Harness {
        store,
        translator,
        notifier,
        navigator,
        env,
    }
}

pub fn alice() -> Identity {
    Identity::new("alice")
}

pub fn message(id: &str, at: i64, owner: &str) -> ChatMessage {
    ChatMessage {
        id: MessageId::new(id),
        created_at: Timestamp(at),
        content: format!("message {id}"),
        owner_id: Identity::new(owner),
    }
}

pub fn profile(id: &str, code: &str) -> Profile {
    Profile {
        id: Identity::new(id),
        preferred_language: Some(LocaleCode::new(code)),
    }
}

/// Ids of the messages the feed currently displays, in display order.
pub fn displayed_ids(feed: &FeedView) -> Vec<String> {
    feed.messages()
        .iter()
        .map(|m| m.id.as_str().to_string())
        .collect()
}

/// Ids a fresh full fetch would display for `owner` (newest first).
pub fn fresh_snapshot_ids(store: &MemoryStore, owner: &Identity) -> Vec<String> {
    let mut rows = store.messages_for(owner);
    rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    rows.iter().map(|m| m.id.as_str().to_string()).collect()
}
