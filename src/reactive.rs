//! Observable state with coalesced re-render requests.
//!
//! Every write to a tracked field asks the host for a re-render. Requests
//! made before the host gets around to rendering collapse into one.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use tokio::sync::Notify;

#[derive(Debug, Default)]
struct SignalInner {
    requested: AtomicBool,
    requests: AtomicU64,
    notify: Notify,
}

/// Shared "something changed, render again" flag.
#[derive(Debug, Clone, Default)]
pub struct RenderSignal {
    inner: Arc<SignalInner>,
}

impl RenderSignal {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask for a render. Wakes a waiting host only on the first request of
    /// a batch.
    pub fn request(&self) {
        self.inner.requests.fetch_add(1, Ordering::Relaxed);
        if !self.inner.requested.swap(true, Ordering::AcqRel) {
            self.inner.notify.notify_one();
        }
    }

    /// Consume the pending request, returning whether one existed.
    pub fn take(&self) -> bool {
        self.inner.requested.swap(false, Ordering::AcqRel)
    }

    #[must_use]
    pub fn is_requested(&self) -> bool {
        self.inner.requested.load(Ordering::Acquire)
    }

    /// Total number of requests ever made, coalesced or not.
    #[must_use]
    pub fn request_count(&self) -> u64 {
        self.inner.requests.load(Ordering::Relaxed)
    }

    /// Wait until a render is requested, then consume it.
    pub async fn requested(&self) {
        loop {
            if self.take() {
                return;
            }
            self.inner.notify.notified().await;
        }
    }
}

/// A value whose changes request a render.
#[derive(Debug, Clone)]
pub struct Tracked<T> {
    value: T,
    signal: RenderSignal,
}

impl<T: PartialEq> Tracked<T> {
    pub const fn new(value: T, signal: RenderSignal) -> Self {
        Self { value, signal }
    }

    #[must_use]
    pub const fn get(&self) -> &T {
        &self.value
    }

    /// Replace the value; requests a render only when it actually changed.
    pub fn set(&mut self, value: T) {
        if self.value != value {
            self.value = value;
            self.signal.request();
        }
    }

    /// Mutate in place; always requests a render.
    pub fn update(&mut self, f: impl FnOnce(&mut T)) {
        f(&mut self.value);
        self.signal.request();
    }
}
