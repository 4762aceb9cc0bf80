//! Sequential, flow-controlled conduit between two pipeline stages.
//!
//! A channel carries items of one type followed by exactly one close signal:
//! either a normal end or an error. Consumption is strictly one item at a
//! time: the receiver asking for the next item is the acknowledgement that
//! the previous one has been dealt with.

use crate::error::{PipelineError, Result};
use futures::Stream;
use std::future::poll_fn;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::task::{ready, Context, Poll};
use thiserror::Error;
use tokio::sync::mpsc;

/// Returned by [`Sender::push`] once the channel no longer accepts items.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("channel is closed")]
pub struct ChannelClosed;

enum Signal<T> {
    Item(T),
    End,
    Error(PipelineError),
}

/// Creates a channel buffering at most `capacity` undelivered items.
pub fn channel<T>(capacity: usize) -> (Sender<T>, Receiver<T>) {
    let (tx, rx) = mpsc::channel(capacity.max(1));
    let sender = Sender {
        inner: tx,
        closed: Arc::new(AtomicBool::new(false)),
    };
    let receiver = Receiver {
        inner: rx,
        done: false,
    };
    (sender, receiver)
}

/// Producing half of a channel.
///
/// Clones share the closed state, so whichever clone closes first wins and
/// every later close is a no-op.
pub struct Sender<T> {
    inner: mpsc::Sender<Signal<T>>,
    closed: Arc<AtomicBool>,
}

impl<T> Clone for Sender<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            closed: Arc::clone(&self.closed),
        }
    }
}

impl<T> Sender<T> {
    /// Pushes an item, waiting while the channel is at capacity.
    pub async fn push(&self, item: T) -> std::result::Result<(), ChannelClosed> {
        if self.closed.load(Ordering::Acquire) {
            return Err(ChannelClosed);
        }
        self.inner
            .send(Signal::Item(item))
            .await
            .map_err(|_| ChannelClosed)
    }

    /// Closes the channel normally. Returns `false` if it was already closed.
    pub async fn end(&self) -> bool {
        self.close_with(Signal::End).await
    }

    /// Closes the channel with an error. Returns `false` if it was already closed.
    pub async fn raise_error(&self, error: PipelineError) -> bool {
        self.close_with(Signal::Error(error)).await
    }

    /// Whether the channel has been closed or its receiver is gone.
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire) || self.inner.is_closed()
    }

    /// Resolves once the receiving half has been dropped or has seen its close signal.
    pub async fn cancelled(&self) {
        self.inner.closed().await
    }

    async fn close_with(&self, signal: Signal<T>) -> bool {
        if self.closed.swap(true, Ordering::AcqRel) {
            return false;
        }
        // A vanished receiver has nothing left to observe.
        let _ = self.inner.send(signal).await;
        true
    }
}

/// Consuming half of a channel.
pub struct Receiver<T> {
    inner: mpsc::Receiver<Signal<T>>,
    done: bool,
}

impl<T> Receiver<T> {
    /// Waits for the next item.
    ///
    /// Yields `Some(Ok(item))` per item, `Some(Err(e))` once if the channel
    /// closed with an error, and `None` after a normal close. Once a close
    /// signal has been delivered every further call yields `None`.
    pub async fn recv(&mut self) -> Option<Result<T>> {
        poll_fn(|cx| self.poll_recv(cx)).await
    }

    /// Polls for the next item; see [`Receiver::recv`].
    pub fn poll_recv(&mut self, cx: &mut Context<'_>) -> Poll<Option<Result<T>>> {
        if self.done {
            return Poll::Ready(None);
        }
        let signal = ready!(self.inner.poll_recv(cx));
        let next = match signal {
            Some(Signal::Item(item)) => return Poll::Ready(Some(Ok(item))),
            Some(Signal::End) => None,
            Some(Signal::Error(error)) => Some(Err(error)),
            None => Some(Err(PipelineError::Disconnected)),
        };
        self.done = true;
        self.inner.close();
        Poll::Ready(next)
    }

    /// Whether a close signal has already been delivered.
    pub fn is_terminated(&self) -> bool {
        self.done
    }
}

impl<T> Stream for Receiver<T> {
    type Item = Result<T>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.get_mut().poll_recv(cx)
    }
}
