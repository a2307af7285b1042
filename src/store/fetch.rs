//! One-shot deferred fetch results.
//!
//! A [`PendingFetch`] is the suspension point of the cooperative
//! concurrency model: issuing a remote read returns immediately with a
//! pending result, and callers poll it with [`PendingFetch::try_take`]
//! without ever blocking the thread.

use crossbeam_channel::{bounded, Receiver, Sender};

/// The consumer half of a one-shot fetch.
pub struct PendingFetch<T> {
    receiver: Receiver<T>,
}

/// The producer half of a one-shot fetch. Completing consumes it.
pub struct FetchCompletion<T> {
    sender: Sender<T>,
}

impl<T> PendingFetch<T> {
    /// Create a fetch that will be completed later.
    pub fn channel() -> (FetchCompletion<T>, PendingFetch<T>) {
        let (sender, receiver) = bounded(1);
        (FetchCompletion { sender }, PendingFetch { receiver })
    }

    /// Create an already-completed fetch.
    pub fn ready(value: T) -> PendingFetch<T> {
        let (sender, receiver) = bounded(1);
        // Capacity 1 and both halves in scope: the send cannot fail.
        let _ = sender.send(value);
        PendingFetch { receiver }
    }

    /// Take the result if it is available. Yields the value at most once.
    pub fn try_take(&mut self) -> Option<T> {
        self.receiver.try_recv().ok()
    }
}

impl<T> FetchCompletion<T> {
    /// Deliver the result. Returns `false` if the consumer half was
    /// dropped (the fetch was abandoned).
    pub fn complete(self, value: T) -> bool {
        self.sender.try_send(value).is_ok()
    }
}
