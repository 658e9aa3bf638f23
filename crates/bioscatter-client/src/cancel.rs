#![forbid(unsafe_code)]

//! Cooperative cancellation for in-flight fetches.
//!
//! When the user re-selects an algorithm while a fetch is still running,
//! the app cancels the old token and starts a new fetch. The client polls
//! the token around the backend call; a fetch that observes cancellation
//! reports [`FetchError::Cancelled`](crate::FetchError::Cancelled) and
//! writes nothing to the cache.
//!
//! Dropping the source does not cancel outstanding tokens; cancellation
//! is always an explicit call.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Control handle that triggers cancellation.
#[derive(Debug, Default)]
pub struct CancellationSource {
    cancelled: Arc<AtomicBool>,
}

/// Cheap, cloneable view of a source's cancelled flag.
#[derive(Debug, Clone)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationSource {
    /// Create a fresh, uncancelled source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Obtain a token observing this source.
    pub fn token(&self) -> CancellationToken {
        CancellationToken {
            cancelled: Arc::clone(&self.cancelled),
        }
    }

    /// Signal cancellation to every token derived from this source.
    /// Idempotent.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    /// Whether cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}

impl CancellationToken {
    /// Whether cancellation has been requested.
    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }

    /// A token that can never be cancelled, for callers without a source.
    pub fn never() -> Self {
        Self {
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn token_starts_uncancelled() {
        let source = CancellationSource::new();
        assert!(!source.token().is_cancelled());
    }

    #[test]
    fn cancel_reaches_all_clones() {
        let source = CancellationSource::new();
        let a = source.token();
        let b = a.clone();
        source.cancel();
        assert!(a.is_cancelled());
        assert!(b.is_cancelled());
    }

    #[test]
    fn drop_source_does_not_cancel() {
        let source = CancellationSource::new();
        let token = source.token();
        drop(source);
        assert!(!token.is_cancelled());
    }

    #[test]
    fn cancel_is_idempotent() {
        let source = CancellationSource::new();
        source.cancel();
        source.cancel();
        assert!(source.is_cancelled());
    }

    #[test]
    fn token_crosses_threads() {
        let source = CancellationSource::new();
        let token = source.token();
        source.cancel();
        let handle = thread::spawn(move || token.is_cancelled());
        assert!(handle.join().unwrap());
    }

    #[test]
    fn never_token_stays_live() {
        assert!(!CancellationToken::never().is_cancelled());
    }
}
