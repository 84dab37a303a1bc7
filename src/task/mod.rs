//! Cancel-and-replace async fetch bound to a dependency key.
//!
//! Each execution captures a generation id when it starts. A resolution is
//! applied only if its id still matches the latest issued one, so the most
//! recently *started* execution is the only one a render can observe.

use std::future::Future;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{debug, trace};

use crate::reactive::RenderSignal;

/// Observable state of a [`FetchTask`].
#[derive(Debug)]
pub enum TaskStatus<T, E> {
    Idle,
    Pending,
    Complete(T),
    Error(Arc<E>),
}

impl<T: Clone, E> Clone for TaskStatus<T, E> {
    fn clone(&self) -> Self {
        match self {
            Self::Idle => Self::Idle,
            Self::Pending => Self::Pending,
            Self::Complete(value) => Self::Complete(value.clone()),
            Self::Error(err) => Self::Error(Arc::clone(err)),
        }
    }
}

impl<T, E> TaskStatus<T, E> {
    /// True while no terminal state exists.
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        matches!(self, Self::Idle | Self::Pending)
    }

    #[must_use]
    pub const fn complete(&self) -> Option<&T> {
        match self {
            Self::Complete(value) => Some(value),
            _ => None,
        }
    }

    /// Pick exactly one renderer for the current state.
    pub fn render<R>(
        &self,
        pending: impl FnOnce() -> R,
        complete: impl FnOnce(&T) -> R,
        error: impl FnOnce(&E) -> R,
    ) -> R {
        match self {
            Self::Idle | Self::Pending => pending(),
            Self::Complete(value) => complete(value),
            Self::Error(err) => error(err),
        }
    }
}

#[derive(Debug)]
struct Slot<T, E> {
    generation: u64,
    status: TaskStatus<T, E>,
    /// Last successful value, kept while later executions are pending.
    value: Option<T>,
}

pub struct FetchTask<K, T, E> {
    slot: Arc<Mutex<Slot<T, E>>>,
    deps: Option<K>,
    in_flight: Option<JoinHandle<()>>,
    signal: RenderSignal,
}

impl<K, T, E> FetchTask<K, T, E>
where
    K: PartialEq + std::fmt::Debug,
    T: Clone + Send + 'static,
    E: std::fmt::Display + Send + Sync + 'static,
{
    #[must_use]
    pub fn new(signal: RenderSignal) -> Self {
        Self {
            slot: Arc::new(Mutex::new(Slot {
                generation: 0,
                status: TaskStatus::Idle,
                value: None,
            })),
            deps: None,
            in_flight: None,
            signal,
        }
    }

    /// Start a new execution regardless of what is in flight.
    ///
    /// The superseded execution, if any, is aborted. Outside a tokio runtime
    /// nothing starts and the current generation is returned unchanged.
    pub fn run<Fut>(&mut self, fut: Fut) -> u64
    where
        Fut: Future<Output = Result<T, E>> + Send + 'static,
    {
        self.start(fut).unwrap_or_else(|| self.generation())
    }

    fn start<Fut>(&mut self, fut: Fut) -> Option<u64>
    where
        Fut: Future<Output = Result<T, E>> + Send + 'static,
    {
        let Ok(runtime) = Handle::try_current() else {
            debug!("no tokio runtime; fetch not started");
            return None;
        };
        let generation = {
            let mut slot = self.slot.lock();
            slot.generation += 1;
            slot.status = TaskStatus::Pending;
            slot.generation
        };
        debug!(generation, "fetch started");
        self.signal.request();

        let slot = Arc::clone(&self.slot);
        let signal = self.signal.clone();
        let handle = runtime.spawn(async move {
            let outcome = fut.await;
            let mut slot = slot.lock();
            if slot.generation != generation {
                trace!(
                    generation,
                    latest = slot.generation,
                    "discarding superseded fetch result"
                );
                return;
            }
            slot.status = match outcome {
                Ok(value) => {
                    slot.value = Some(value.clone());
                    TaskStatus::Complete(value)
                }
                Err(err) => {
                    debug!(generation, error = %err, "fetch failed");
                    TaskStatus::Error(Arc::new(err))
                }
            };
            drop(slot);
            signal.request();
        });
        // An aborted run may already have finished; the generation check
        // still guards the slot either way.
        if let Some(previous) = self.in_flight.replace(handle) {
            previous.abort();
        }
        Some(generation)
    }

    /// Start a new execution and remember `deps` as its dependency snapshot.
    pub fn run_with<Fut>(&mut self, deps: K, fut: Fut) -> u64
    where
        Fut: Future<Output = Result<T, E>> + Send + 'static,
    {
        let Some(generation) = self.start(fut) else {
            return self.generation();
        };
        self.deps = Some(deps);
        generation
    }

    /// Re-run when `deps` differs by value from the last snapshot.
    ///
    /// The first call always runs. Returns whether an execution started.
    pub fn sync<Fut>(&mut self, deps: K, make: impl FnOnce() -> Fut) -> bool
    where
        Fut: Future<Output = Result<T, E>> + Send + 'static,
    {
        if self.deps.as_ref() == Some(&deps) {
            return false;
        }
        trace!(?deps, "fetch dependencies changed");
        if self.start(make()).is_none() {
            return false;
        }
        self.deps = Some(deps);
        true
    }

    /// Snapshot of the current state.
    #[must_use]
    pub fn status(&self) -> TaskStatus<T, E> {
        self.slot.lock().status.clone()
    }

    /// Last successfully fetched value, even while a newer run is pending.
    #[must_use]
    pub fn value(&self) -> Option<T> {
        self.slot.lock().value.clone()
    }

    #[must_use]
    pub fn generation(&self) -> u64 {
        self.slot.lock().generation
    }

    /// Render with exactly one of the three callbacks.
    pub fn render<R>(
        &self,
        pending: impl FnOnce() -> R,
        complete: impl FnOnce(&T) -> R,
        error: impl FnOnce(&E) -> R,
    ) -> R {
        self.status().render(pending, complete, error)
    }

    /// Wait for the most recently started execution to finish.
    pub async fn settled(&mut self) {
        let Some(handle) = self.in_flight.take() else {
            return;
        };
        if let Err(err) = handle.await {
            debug!(error = %err, "fetch task did not complete");
        }
    }
}

impl<K, T, E> Drop for FetchTask<K, T, E> {
    fn drop(&mut self) {
        if let Some(handle) = self.in_flight.take() {
            handle.abort();
        }
    }
}
