//! View lifecycle and subscription pairing.
//!
//! Each view instance owns one [`Lifecycle`]: a phase machine plus the
//! registry of its open watch handles. Unmounting closes every handle
//! exactly once, synchronously, and makes the instance permanently dead —
//! results that arrive afterwards are discarded by the liveness check,
//! not left to garbage collection.

use crossbeam_channel::Receiver;

use crate::store::{ChangeEvent, WatchHandle};

/// Phase of a mounted view instance.
///
/// `Mounted → Fetching → Ready ⇄ Refetching`, with `Unmounted` reachable
/// from any phase and absorbing. `Mounted → Ready` covers the
/// absent-identity path, where nothing is ever fetched.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewPhase {
    Mounted,
    Fetching,
    Ready,
    Refetching,
    Unmounted,
}

impl ViewPhase {
    /// Whether the machine permits moving from `self` to `next`.
    pub fn permits(self, next: ViewPhase) -> bool {
        use ViewPhase::*;
        if self == Unmounted {
            return false;
        }
        if next == Unmounted {
            return true;
        }
        matches!(
            (self, next),
            (Mounted, Fetching) | (Mounted, Ready) | (Fetching, Ready) | (Ready, Refetching) | (Refetching, Ready)
        )
    }

    pub fn is_live(self) -> bool {
        self != ViewPhase::Unmounted
    }
}

/// Governs subscribe/unsubscribe pairing and liveness for one view.
pub struct Lifecycle {
    phase: ViewPhase,
    handles: Vec<WatchHandle>,
}

impl Lifecycle {
    pub fn new() -> Self {
        Self {
            phase: ViewPhase::Mounted,
            handles: Vec::new(),
        }
    }

    pub fn phase(&self) -> ViewPhase {
        self.phase
    }

    pub fn is_live(&self) -> bool {
        self.phase.is_live()
    }

    /// Attempt a phase transition. Staying in the current phase is a
    /// no-op; illegal transitions are refused and logged. Nothing leaves
    /// `Unmounted`.
    pub fn transition(&mut self, next: ViewPhase) -> bool {
        if !self.phase.is_live() {
            return false;
        }
        if self.phase == next {
            return true;
        }
        if self.phase.permits(next) {
            tracing::debug!(from = ?self.phase, to = ?next, "view phase transition");
            self.phase = next;
            true
        } else {
            tracing::warn!(from = ?self.phase, to = ?next, "refusing illegal phase transition");
            false
        }
    }

    /// Register a watch handle for teardown and return its event stream.
    ///
    /// Watchers open at most one subscription per collection, so pairing
    /// is one open/close per handle by construction.
    pub fn adopt(&mut self, handle: WatchHandle) -> Receiver<ChangeEvent> {
        let events = handle.events();
        self.handles.push(handle);
        events
    }

    /// Number of adopted, not-yet-closed handles.
    pub fn open_handles(&self) -> usize {
        self.handles.iter().filter(|h| !h.is_closed()).count()
    }

    /// Tear the view down: close every handle exactly once and enter the
    /// absorbing `Unmounted` phase. Calling this again is a no-op.
    pub fn unmount(&mut self) {
        if !self.phase.is_live() {
            return;
        }
        self.phase = ViewPhase::Unmounted;
        for handle in &mut self.handles {
            handle.close();
        }
        self.handles.clear();
    }
}

impl Default for Lifecycle {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{ChangeHub, Collection, WatchFilter};

    #[test]
    fn test_permitted_edges() {
        use ViewPhase::*;
        assert!(Mounted.permits(Fetching));
        assert!(Mounted.permits(Ready));
        assert!(Fetching.permits(Ready));
        assert!(Ready.permits(Refetching));
        assert!(Refetching.permits(Ready));
        assert!(Fetching.permits(Unmounted));
    }

    #[test]
    fn test_forbidden_edges() {
        use ViewPhase::*;
        assert!(!Mounted.permits(Refetching));
        assert!(!Fetching.permits(Refetching));
        assert!(!Ready.permits(Fetching));
        assert!(!Unmounted.permits(Mounted));
        assert!(!Unmounted.permits(Ready));
        assert!(!Unmounted.permits(Unmounted));
    }

    #[test]
    fn test_unmounted_is_absorbing() {
        let mut lifecycle = Lifecycle::new();
        lifecycle.unmount();
        assert_eq!(lifecycle.phase(), ViewPhase::Unmounted);

        assert!(!lifecycle.transition(ViewPhase::Ready));
        assert!(!lifecycle.transition(ViewPhase::Mounted));
        assert_eq!(lifecycle.phase(), ViewPhase::Unmounted);
    }

    #[test]
    fn test_same_phase_is_noop() {
        let mut lifecycle = Lifecycle::new();
        assert!(lifecycle.transition(ViewPhase::Fetching));
        assert!(lifecycle.transition(ViewPhase::Fetching));
        assert_eq!(lifecycle.phase(), ViewPhase::Fetching);
    }

    #[test]
    fn test_unmount_closes_adopted_handles() {
        let hub = ChangeHub::new();
        let mut lifecycle = Lifecycle::new();
        let _events = lifecycle.adopt(hub.subscribe(Collection::Profiles, WatchFilter::any()));
        let _more = lifecycle.adopt(hub.subscribe(Collection::ChatMessages, WatchFilter::any()));
        assert_eq!(lifecycle.open_handles(), 2);
        assert_eq!(hub.subscriber_count(), 2);

        lifecycle.unmount();
        assert_eq!(lifecycle.open_handles(), 0);
        assert_eq!(hub.subscriber_count(), 0);

        // Second unmount is a no-op.
        lifecycle.unmount();
        assert_eq!(hub.subscriber_count(), 0);
    }
}
