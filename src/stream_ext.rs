//! Stream extension traits for turning any stream into a pipeline

use crate::error::BoxError;
use crate::pipeline::Pipeline;
use futures::Stream;

//────────────────────────────────────────────────────────────────────────────
// PipelineStreamExt – fluent entry point from futures::Stream
//────────────────────────────────────────────────────────────────────────────

/// Extension trait for streams that feeds them into a [`Pipeline`].
pub trait PipelineStreamExt: Stream + Sized + Send + 'static {
    /// Forwards every item of this stream into a new pipeline.
    fn into_pipeline(self) -> Pipeline<Self::Item>
    where
        Self::Item: Send + 'static,
    {
        Pipeline::from_stream(self)
    }

    /// Forwards the `Ok` items of this stream into a new pipeline; the first
    /// `Err` closes the pipeline with that error.
    fn try_into_pipeline<T, E>(self) -> Pipeline<T>
    where
        Self: Stream<Item = Result<T, E>>,
        T: Send + 'static,
        E: Into<BoxError> + Send + 'static,
    {
        Pipeline::try_from_stream(self)
    }
}

impl<S> PipelineStreamExt for S where S: Stream + Sized + Send + 'static {}
