//! The [`Pipeline`] handle and its transformation operators.
//!
//! A pipeline wraps exactly one channel. Every operator consumes the
//! pipeline, spawns one stage task that owns the upstream receiver, and
//! returns a new pipeline over a freshly allocated downstream channel.

mod aggregate;
mod source;
pub(crate) mod stage;
mod transform;

use crate::channel::{self, Receiver, Sender};
use crate::config::PipelineConfig;
use crate::error::Result;
use futures::Stream;
use std::pin::Pin;
use std::task::{Context, Poll};

/// Ordered, backpressured sequence of items produced by a chain of stages.
///
/// A `Pipeline` is also a [`Stream`] of `Result<T>`, so it can be drained with
/// ordinary stream combinators. Dropping it cancels every stage feeding it.
pub struct Pipeline<T> {
    pub(crate) receiver: Receiver<T>,
    config: PipelineConfig,
}

impl<T: Send + 'static> Pipeline<T> {
    /// Wraps the receiving half of an existing channel.
    pub fn new(receiver: Receiver<T>) -> Self {
        Self {
            receiver,
            config: PipelineConfig::default(),
        }
    }

    /// Creates a pipeline fed by hand through the returned [`Sender`].
    ///
    /// The producer must close the sender with [`Sender::end`] or
    /// [`Sender::raise_error`]; dropping it unclosed fails the pipeline with
    /// [`PipelineError::Disconnected`](crate::PipelineError::Disconnected).
    pub fn channel() -> (Sender<T>, Self) {
        Self::channel_with_config(PipelineConfig::default())
    }

    /// Like [`Pipeline::channel`], with an explicit configuration.
    pub fn channel_with_config(config: PipelineConfig) -> (Sender<T>, Self) {
        let (tx, rx) = channel::channel(config.effective_capacity());
        (tx, Self { receiver: rx, config })
    }

    /// Configuration inherited by stages built from this pipeline.
    pub fn config(&self) -> PipelineConfig {
        self.config
    }

    /// Replaces the configuration used by stages built from here on.
    pub fn with_config(self, config: PipelineConfig) -> Self {
        Self {
            receiver: self.receiver,
            config,
        }
    }

    /// Gives up the pipeline handle, returning its underlying receiver.
    pub fn into_receiver(self) -> Receiver<T> {
        self.receiver
    }

    /// Allocates the downstream channel of a new stage.
    pub(crate) fn downstream<O: Send + 'static>(&self) -> (Sender<O>, Pipeline<O>) {
        Pipeline::channel_with_config(self.config)
    }
}

impl<T> Stream for Pipeline<T> {
    type Item = Result<T>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.get_mut().receiver.poll_recv(cx)
    }
}
