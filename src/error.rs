//! Error types shared by every stage, source and terminal of a pipeline.
//!
//! A pipeline carries at most one error. The first one observed closes the
//! downstream channel and travels unchanged to the terminal consumer.

use std::any::Any;
use thiserror::Error;

/// Boxed error accepted from user callbacks.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result type alias for pipeline operations
pub type Result<T> = std::result::Result<T, PipelineError>;

/// Main error type for all pipeline operations
#[derive(Error, Debug)]
pub enum PipelineError {
    /// A transform, predicate, reducer or consumer returned an error
    #[error("{0}")]
    Callback(BoxError),

    /// A consumer passed an error to its acknowledgement
    #[error("{0}")]
    Rejected(BoxError),

    /// A deferred value or wrapped stream feeding the pipeline failed
    #[error("{0}")]
    Source(BoxError),

    /// A user callback panicked while a stage was driving it
    #[error("stage panicked: {0}")]
    Panicked(String),

    /// Every producer of a channel went away without closing it
    #[error("channel producer dropped before closing the channel")]
    Disconnected,

    /// A consumer dropped its acknowledgement without answering it
    #[error("acknowledgement dropped without being answered")]
    AckDropped,

    /// `split` was asked for chunks of size zero
    #[error("chunk size must be a positive integer, got {size}")]
    InvalidChunkSize {
        /// The rejected chunk size
        size: usize,
    },
}

impl PipelineError {
    /// Wraps an error returned by a per-item callback.
    pub fn callback(error: impl Into<BoxError>) -> Self {
        Self::Callback(error.into())
    }

    /// Wraps an error produced by a pipeline source.
    pub fn source_error(error: impl Into<BoxError>) -> Self {
        Self::Source(error.into())
    }

    /// Returns the user error carried by this error, if it is of type `E`.
    ///
    /// Lets a caller recover exactly the value its callback failed with.
    pub fn downcast_ref<E>(&self) -> Option<&E>
    where
        E: std::error::Error + 'static,
    {
        match self {
            Self::Callback(inner) | Self::Rejected(inner) | Self::Source(inner) => {
                inner.downcast_ref::<E>()
            }
            _ => None,
        }
    }

    pub(crate) fn panicked(payload: Box<dyn Any + Send>) -> Self {
        let message = if let Some(message) = payload.downcast_ref::<&str>() {
            (*message).to_string()
        } else if let Some(message) = payload.downcast_ref::<String>() {
            message.clone()
        } else {
            "non-string panic payload".to_string()
        };
        Self::Panicked(message)
    }
}
