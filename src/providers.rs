//! External collaborator interfaces consumed by the views.
//!
//! Translation string content, notification rendering, and routing all
//! live outside this crate; the views talk to them through these traits.

use std::sync::Arc;

use crate::locale::LocaleCode;
use crate::session::AuthProvider;
use crate::store::DataStore;

/// Translation provider.
pub trait Translator: Send + Sync {
    /// Localized string for a key.
    fn translate(&self, key: &str) -> String;

    /// Switch the active language. Process-wide by design; layout
    /// direction is NOT derived from this but threaded per view.
    fn change_language(&self, code: &LocaleCode);
}

/// Visual weight of a user-visible notice.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoticeVariant {
    Info,
    Destructive,
}

/// A transient user-visible message.
#[derive(Clone, Debug, PartialEq)]
pub struct Notice {
    pub title: String,
    pub variant: NoticeVariant,
}

/// Notification provider for transient messages.
pub trait Notifier: Send + Sync {
    fn notify(&self, notice: Notice);
}

/// Navigation provider.
pub trait Navigator: Send + Sync {
    fn go_back(&self);
    fn redirect(&self, path: &str);
}

/// Everything a view needs from its environment.
#[derive(Clone)]
pub struct ViewEnv {
    pub auth: Arc<dyn AuthProvider>,
    pub store: Arc<dyn DataStore>,
    pub translator: Arc<dyn Translator>,
    pub notifier: Arc<dyn Notifier>,
    pub navigator: Arc<dyn Navigator>,
}
