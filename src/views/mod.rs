//! View entry points.
//!
//! Two user-scoped screens over the same reconciliation core: a
//! chronological message feed and a document-intake screen. Both are
//! driven by non-blocking `poll()` calls and torn down with `unmount()`.

mod feed;
mod intake;

pub use feed::FeedView;
pub use intake::IntakeView;
