//! Cancellation token tied to the lifetime of an owner (a component or the
//! session store).
//!
//! Futures in this crate are not aborted mid-flight; instead every suspend
//! point is wrapped with [`Lifetime::scope`] and a result that resolves after
//! the owner ended is dropped before it can touch state.

#[cfg(test)]
#[path = "lifetime_test.rs"]
mod lifetime_test;

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Shared "owner still alive" flag. Clones observe the same flag.
#[derive(Clone, Debug, Default)]
pub struct Lifetime {
    ended: Arc<AtomicBool>,
}

impl Lifetime {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark the owner as gone. Idempotent.
    pub fn end(&self) {
        self.ended.store(true, Ordering::Release);
    }

    #[must_use]
    pub fn is_live(&self) -> bool {
        !self.ended.load(Ordering::Acquire)
    }

    /// Await `fut`, returning `None` if the owner ended before or while it
    /// was pending.
    pub async fn scope<F: Future>(&self, fut: F) -> Option<F::Output> {
        if !self.is_live() {
            return None;
        }
        let out = fut.await;
        self.is_live().then_some(out)
    }
}
