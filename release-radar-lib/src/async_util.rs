//! Async utilities for driving a form's event loop.
//!
//! A form has at most one timer (the debounce deadline) and any number of
//! outstanding network calls. Everything runs on the caller's task: the
//! calls are polled from a [`FuturesUnordered`] rather than spawned, so
//! collaborators do not need to be `Send` and dropping the set cancels them.

use std::future::Future;

use futures::FutureExt;
use futures::StreamExt;
use futures::future::LocalBoxFuture;
use futures::stream::FuturesUnordered;
use tokio::time::Instant;

/// Set of outstanding asynchronous operations, each resolving to a `T`.
pub struct Inflight<T> {
    futures: FuturesUnordered<LocalBoxFuture<'static, T>>,
}

impl<T> Default for Inflight<T> {
    fn default() -> Self {
        Self {
            futures: FuturesUnordered::new(),
        }
    }
}

impl<T> Inflight<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, fut: impl Future<Output = T> + 'static) {
        self.futures.push(fut.boxed_local());
    }

    /// Drop every outstanding operation. Their results are never observed.
    pub fn clear(&mut self) {
        if !self.futures.is_empty() {
            log::debug!("cancelling {} in-flight operation(s)", self.futures.len());
        }
        self.futures.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.futures.is_empty()
    }

    pub fn len(&self) -> usize {
        self.futures.len()
    }
}

/// Why the event loop woke up.
#[derive(Debug)]
pub enum Wake<T> {
    /// The deadline passed.
    Deadline,
    /// One operation completed.
    Done(T),
}

/// Wait for whichever comes first: `deadline` or a completed operation.
///
/// Returns `None` when there is nothing left to wait for. Completions win
/// ties so responses are applied before a timer that fired at the same time.
pub async fn next_wake<T>(deadline: Option<Instant>, inflight: &mut Inflight<T>) -> Option<Wake<T>> {
    if deadline.is_none() && inflight.is_empty() {
        return None;
    }

    let has_work = !inflight.is_empty();
    tokio::select! {
        biased;
        Some(done) = inflight.futures.next(), if has_work => Some(Wake::Done(done)),
        _ = tokio::time::sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
            Some(Wake::Deadline)
        }
        else => None,
    }
}
