//! Deferred outcome of a terminal consumer
//!
//! This module provides the single-settlement future returned by every
//! terminal, following the project's convention of returning concrete types
//! instead of boxed futures or async fn.

use crate::error::{PipelineError, Result};
use futures::FutureExt as _;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::sync::oneshot;

/// Generic async task wrapper for a single pipeline outcome
///
/// This wraps a oneshot::Receiver and implements Future to provide
/// a concrete return type instead of boxed futures or async fn. The
/// outcome settles exactly once: with the value, or with the first error
/// the driving future ran into.
///
/// Dropping the task before it settles cancels the driving future.
#[must_use = "an AsyncTask does nothing observable unless awaited"]
pub struct AsyncTask<T> {
    receiver: oneshot::Receiver<Result<T>>,
}

impl<T> AsyncTask<T> {
    /// Create an AsyncTask from a future
    ///
    /// The future runs on its own tokio task. A panic inside it settles the
    /// task with [`PipelineError::Panicked`].
    pub fn from_future<F>(future: F) -> Self
    where
        F: Future<Output = Result<T>> + Send + 'static,
        T: Send + 'static,
    {
        let (mut tx, rx) = oneshot::channel();
        tokio::spawn(async move {
            let outcome = tokio::select! {
                outcome = AssertUnwindSafe(future).catch_unwind() => Some(outcome),
                _ = tx.closed() => None,
            };
            match outcome {
                Some(Ok(result)) => {
                    let _ = tx.send(result);
                }
                Some(Err(payload)) => {
                    let error = PipelineError::panicked(payload);
                    log::warn!("terminal consumer panicked: {error}");
                    let _ = tx.send(Err(error));
                }
                None => log::debug!("terminal consumer abandoned before settling"),
            }
        });
        Self { receiver: rx }
    }

    /// Create an AsyncTask from a value
    pub fn from_value(value: T) -> Self {
        Self::settled(Ok(value))
    }

    /// Create an AsyncTask that has already failed
    pub fn from_error(error: PipelineError) -> Self {
        Self::settled(Err(error))
    }

    fn settled(result: Result<T>) -> Self {
        let (tx, rx) = oneshot::channel();
        let _ = tx.send(result);
        Self { receiver: rx }
    }
}

impl<T> Future for AsyncTask<T> {
    type Output = Result<T>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match Pin::new(&mut self.receiver).poll(cx) {
            Poll::Ready(Ok(result)) => Poll::Ready(result),
            // Only reachable when the runtime shuts down underneath the driver.
            Poll::Ready(Err(_)) => Poll::Ready(Err(PipelineError::Disconnected)),
            Poll::Pending => Poll::Pending,
        }
    }
}
