//! Snapshot publication with request tokens.
//!
//! Every recompute asks for a [`RequestToken`] before it starts. When it
//! finishes, its result is published only if no newer request has been
//! issued in the meantime. Published snapshots are immutable and shared
//! through [`Arc`], so readers never observe a half-built result.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

/// Monotonically increasing identifier of one recompute request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestToken(u64);

impl RequestToken {
    /// Numeric value of the token.
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }
}

/// Holds the latest published snapshot of one overlay.
pub struct OverlayStore<T> {
    issued: AtomicU64,
    current: Mutex<Option<(RequestToken, Arc<T>)>>,
}

impl<T> Default for OverlayStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> OverlayStore<T> {
    /// Creates an empty store.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            issued: AtomicU64::new(0),
            current: Mutex::new(None),
        }
    }

    /// Issues a token for a new recompute, superseding all earlier ones.
    pub fn begin(&self) -> RequestToken {
        RequestToken(self.issued.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Returns `true` if `token` is the most recently issued request.
    pub fn is_current(&self, token: RequestToken) -> bool {
        self.issued.load(Ordering::SeqCst) == token.0
    }

    /// Publishes `value` if `token` is still the most recent request.
    ///
    /// Returns whether the snapshot was stored. A rejected value is
    /// dropped.
    pub fn publish(&self, token: RequestToken, value: T) -> bool {
        let mut current = self.current.lock().unwrap_or_else(PoisonError::into_inner);

        if !self.is_current(token) {
            log::debug!(
                "Discarding superseded snapshot {} (latest request is {})",
                token.0,
                self.issued.load(Ordering::SeqCst)
            );
            return false;
        }

        *current = Some((token, Arc::new(value)));
        true
    }

    /// The latest published snapshot, if any.
    pub fn current(&self) -> Option<Arc<T>> {
        self.current
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(|(_, value)| Arc::clone(value))
    }

    /// Token of the latest published snapshot, if any.
    pub fn published_token(&self) -> Option<RequestToken> {
        self.current
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(|(token, _)| *token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_increase() {
        let store = OverlayStore::<u32>::new();
        let a = store.begin();
        let b = store.begin();
        assert!(b > a);
        assert!(store.is_current(b));
        assert!(!store.is_current(a));
    }

    #[test]
    fn latest_request_is_published() {
        let store = OverlayStore::new();
        let token = store.begin();
        assert!(store.publish(token, vec![1, 2, 3]));
        assert_eq!(*store.current().unwrap(), vec![1, 2, 3]);
        assert_eq!(store.published_token(), Some(token));
    }

    #[test]
    fn superseded_result_is_discarded() {
        let store = OverlayStore::new();
        let old = store.begin();
        let new = store.begin();

        assert!(store.publish(new, "new"));
        assert!(!store.publish(old, "old"));
        assert_eq!(*store.current().unwrap(), "new");
    }

    #[test]
    fn slow_older_result_is_rejected_before_newer_finishes() {
        let store = OverlayStore::new();
        let old = store.begin();
        let _pending = store.begin();

        assert!(!store.publish(old, 1));
        assert!(store.current().is_none());
    }

    #[test]
    fn readers_keep_their_snapshot() {
        let store = OverlayStore::new();
        let first = store.begin();
        store.publish(first, String::from("first"));
        let held = store.current().unwrap();

        let second = store.begin();
        store.publish(second, String::from("second"));

        assert_eq!(*held, "first");
        assert_eq!(*store.current().unwrap(), "second");
    }
}
