//! Read-only chronological message feed.

use crate::locale::{Direction, RenderContext};
use crate::providers::{Notice, NoticeVariant, ViewEnv};
use crate::session::SessionResolver;
use crate::sync::{Lifecycle, ProfileWatcher, RecordSync, ViewPhase};
use crate::types::ChatMessage;

/// The message-feed view.
///
/// Mounting resolves the identity, reads the locale preference once, and
/// starts mirroring the identity's message list. An absent identity is
/// silently tolerated: the view settles empty with no user-visible error.
pub struct FeedView {
    env: ViewEnv,
    lifecycle: Lifecycle,
    render: RenderContext,
    session: Option<SessionResolver>,
    profile: Option<ProfileWatcher>,
    records: Option<RecordSync>,
}

impl FeedView {
    /// Mount the view and issue the identity read.
    pub fn mount(env: ViewEnv) -> Self {
        let session = SessionResolver::resolve(env.auth.as_ref());
        Self {
            env,
            lifecycle: Lifecycle::new(),
            render: RenderContext::new(),
            session: Some(session),
            profile: None,
            records: None,
        }
    }

    /// Advance all pending work as far as possible without blocking.
    pub fn poll(&mut self) {
        if !self.lifecycle.is_live() {
            return;
        }

        if let Some(mut session) = self.session.take() {
            match session.poll() {
                None => self.session = Some(session),
                Some(None) => {
                    // No valid session: skip all fetching, settle empty.
                    self.lifecycle.transition(ViewPhase::Ready);
                }
                Some(Some(identity)) => {
                    // The feed reads the preference once; it does not
                    // watch for live locale changes.
                    self.profile = Some(ProfileWatcher::start(
                        self.env.store.as_ref(),
                        identity.clone(),
                    ));
                    self.records = Some(RecordSync::start(
                        self.env.store.clone(),
                        identity,
                        &mut self.lifecycle,
                    ));
                    self.lifecycle.transition(ViewPhase::Fetching);
                }
            }
        }

        if let Some(profile) = &mut self.profile {
            if let Some(code) = profile.poll(&self.lifecycle) {
                self.env.translator.change_language(&code);
                self.render.set_direction(Direction::of(&code));
            }
        }

        if let Some(records) = &mut self.records {
            let outcome = records.poll(&mut self.lifecycle);
            if outcome.failed {
                self.env.notifier.notify(Notice {
                    title: self.env.translator.translate("chat.errorLoading"),
                    variant: NoticeVariant::Destructive,
                });
            }
        }
    }

    /// Tear down: close subscriptions and discard in-flight work.
    pub fn unmount(&mut self) {
        self.lifecycle.unmount();
    }

    pub fn phase(&self) -> ViewPhase {
        self.lifecycle.phase()
    }

    /// The displayed list, newest first.
    pub fn messages(&self) -> &[ChatMessage] {
        self.records.as_ref().map(RecordSync::messages).unwrap_or(&[])
    }

    /// `true` until the first fetch resolves. When no identity is
    /// present, resolves `false` once the view settles.
    pub fn loading(&self) -> bool {
        match &self.records {
            Some(records) => records.loading(),
            None => self.lifecycle.phase() != ViewPhase::Ready && self.lifecycle.is_live(),
        }
    }

    pub fn direction(&self) -> Direction {
        self.render.direction()
    }

    pub fn render(&self) -> &RenderContext {
        &self.render
    }

    pub fn title(&self) -> String {
        self.env.translator.translate("chat.title")
    }

    pub fn loading_label(&self) -> String {
        self.env.translator.translate("chat.loadingChats")
    }

    pub fn empty_label(&self) -> String {
        self.env.translator.translate("chat.noChats")
    }
}
