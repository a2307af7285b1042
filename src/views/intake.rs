//! Document-intake screen.
//!
//! Keeps its language and layout direction live against profile updates.
//! Upload mechanics are delegated outside this crate; the view owns only
//! the reconciliation and navigation glue.

use crate::locale::{Direction, LocaleCode, RenderContext};
use crate::providers::ViewEnv;
use crate::session::SessionResolver;
use crate::sync::{Lifecycle, ProfileWatcher, ViewPhase};

/// The document-intake view.
pub struct IntakeView {
    env: ViewEnv,
    lifecycle: Lifecycle,
    render: RenderContext,
    session: Option<SessionResolver>,
    profile: Option<ProfileWatcher>,
    language: Option<LocaleCode>,
}

impl IntakeView {
    /// Mount the view and issue the identity read.
    pub fn mount(env: ViewEnv) -> Self {
        let session = SessionResolver::resolve(env.auth.as_ref());
        Self {
            env,
            lifecycle: Lifecycle::new(),
            render: RenderContext::new(),
            session: Some(session),
            profile: None,
            language: None,
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
                    // Intake requires a session; send the user to login.
                    self.env.navigator.redirect("/login");
                    self.lifecycle.transition(ViewPhase::Ready);
                }
                Some(Some(identity)) => {
                    let mut profile =
                        ProfileWatcher::start(self.env.store.as_ref(), identity);
                    profile.watch(self.env.store.as_ref(), &mut self.lifecycle);
                    self.profile = Some(profile);
                    self.lifecycle.transition(ViewPhase::Fetching);
                }
            }
        }

        if let Some(profile) = &mut self.profile {
            if let Some(code) = profile.poll(&self.lifecycle) {
                self.env.translator.change_language(&code);
                self.render.set_direction(Direction::of(&code));
                self.language = Some(code);
            }
            if self.lifecycle.phase() == ViewPhase::Fetching && profile.settled() {
                self.lifecycle.transition(ViewPhase::Ready);
            }
        }
    }

    /// Tear down: close subscriptions and discard in-flight work.
    pub fn unmount(&mut self) {
        self.lifecycle.unmount();
    }

    /// Navigate back to the previous screen.
    pub fn go_back(&self) {
        self.env.navigator.go_back();
    }

    pub fn phase(&self) -> ViewPhase {
        self.lifecycle.phase()
    }

    /// The applied language, once one has been observed.
    pub fn language(&self) -> Option<&LocaleCode> {
        self.language.as_ref()
    }

    pub fn direction(&self) -> Direction {
        self.render.direction()
    }

    pub fn render(&self) -> &RenderContext {
        &self.render
    }

    pub fn title(&self) -> String {
        self.env.translator.translate("upload.title")
    }

    pub fn description(&self) -> String {
        self.env.translator.translate("upload.description")
    }
}
