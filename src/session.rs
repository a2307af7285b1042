//! Identity resolution.
//!
//! Everything in the engine is scoped to the authenticated identity, so
//! resolving it is the leaf dependency of both views. An absent identity
//! is a legitimate terminal state, never an error to surface.

use crate::store::PendingFetch;
use crate::types::Identity;

/// The authentication collaborator.
pub trait AuthProvider: Send + Sync {
    /// Read the current identity, if a session is valid.
    fn current_identity(&self) -> PendingFetch<Option<Identity>>;
}

/// One-shot identity resolution for a mounting view.
pub struct SessionResolver {
    pending: PendingFetch<Option<Identity>>,
}

impl SessionResolver {
    /// Issue the identity read.
    pub fn resolve(auth: &dyn AuthProvider) -> Self {
        Self {
            pending: auth.current_identity(),
        }
    }

    /// Outer `None`: still resolving. Inner `None`: no valid session.
    pub fn poll(&mut self) -> Option<Option<Identity>> {
        self.pending.try_take()
    }
}

/// Fixed-identity auth backend for tests and local development.
pub struct MemoryAuth {
    identity: Option<Identity>,
}

impl MemoryAuth {
    pub fn signed_in(identity: Identity) -> Self {
        Self {
            identity: Some(identity),
        }
    }

    pub fn signed_out() -> Self {
        Self { identity: None }
    }
}

impl AuthProvider for MemoryAuth {
    fn current_identity(&self) -> PendingFetch<Option<Identity>> {
        PendingFetch::ready(self.identity.clone())
    }
}
