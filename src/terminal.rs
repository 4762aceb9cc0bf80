//! Terminal consumers: drain a pipeline into a single deferred outcome.

use crate::error::{BoxError, PipelineError};
use crate::pipeline::Pipeline;
use crate::task::AsyncTask;
use std::future::Future;
use tokio::sync::oneshot;

type AckSignal = std::result::Result<(), BoxError>;

/// Acknowledgement handed to an [`Pipeline::attach`] consumer with each item.
///
/// The next item is only delivered once the ack has been answered with
/// [`Ack::next`] or [`Ack::fail`]. Answering consumes the ack, so an item can
/// be acknowledged at most once. Dropping it unanswered fails the terminal
/// with [`PipelineError::AckDropped`].
#[must_use = "the pipeline stalls until the ack is answered"]
pub struct Ack {
    sender: oneshot::Sender<AckSignal>,
}

impl Ack {
    /// Requests the next item.
    pub fn next(self) {
        let _ = self.sender.send(Ok(()));
    }

    /// Stops consumption, rejecting the terminal outcome with `error`.
    pub fn fail(self, error: impl Into<BoxError>) {
        let _ = self.sender.send(Err(error.into()));
    }
}

impl<T: Send + 'static> Pipeline<T> {
    /// Attaches a per-item consumer and drains the pipeline through it.
    ///
    /// `consumer` is called once per item with an [`Ack`] that it must answer,
    /// possibly later from another task, before the next item is delivered.
    /// The outcome resolves to `true` once the pipeline ends normally, or to
    /// the first error seen: an upstream error, an error returned by
    /// `consumer` itself, or an error passed to [`Ack::fail`].
    pub fn attach<F, E>(self, mut consumer: F) -> AsyncTask<bool>
    where
        F: FnMut(T, Ack) -> std::result::Result<(), E> + Send + 'static,
        E: Into<BoxError>,
    {
        let mut upstream = self.receiver;
        AsyncTask::from_future(async move {
            while let Some(item) = upstream.recv().await {
                let (tx, rx) = oneshot::channel();
                consumer(item?, Ack { sender: tx }).map_err(PipelineError::callback)?;
                match rx.await {
                    Ok(Ok(())) => {}
                    Ok(Err(error)) => return Err(PipelineError::Rejected(error)),
                    Err(_) => return Err(PipelineError::AckDropped),
                }
            }
            Ok(true)
        })
    }

    /// Runs an asynchronous `f` for every item, one at a time.
    ///
    /// `f` also receives the zero-based index of the item. Each future is
    /// awaited by the terminal driver itself before the next item is pulled,
    /// so dropping the returned task cancels the item in flight too. Resolves
    /// to `true` once every item has been processed, or to the first error.
    pub fn for_each<F, Fut, E>(self, mut f: F) -> AsyncTask<bool>
    where
        F: FnMut(T, usize) -> Fut + Send + 'static,
        Fut: Future<Output = std::result::Result<(), E>> + Send + 'static,
        E: Into<BoxError> + Send + 'static,
    {
        let mut upstream = self.receiver;
        AsyncTask::from_future(async move {
            let mut index = 0;
            while let Some(item) = upstream.recv().await {
                f(item?, index).await.map_err(PipelineError::callback)?;
                index += 1;
            }
            Ok(true)
        })
    }

    /// Collects every item, in order.
    ///
    /// On error the partial result is discarded and the outcome rejects with
    /// that error.
    pub fn collect(self) -> AsyncTask<Vec<T>> {
        let mut upstream = self.receiver;
        AsyncTask::from_future(async move {
            let mut items = Vec::new();
            while let Some(item) = upstream.recv().await {
                items.push(item?);
            }
            Ok(items)
        })
    }
}
