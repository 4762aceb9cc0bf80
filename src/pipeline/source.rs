//! Source constructors: build the first pipeline of a chain.

use super::stage;
use super::Pipeline;
use crate::config::PipelineConfig;
use crate::error::{BoxError, PipelineError};
use futures::{Stream, StreamExt as _};
use std::future::Future;

impl<T: Send + 'static> Pipeline<T> {
    /// Builds a pipeline yielding every item of `items`, in order, then ending.
    ///
    /// An empty iterator gives a pipeline that ends without yielding anything.
    ///
    /// # Panics
    ///
    /// Panics if called outside of a tokio runtime.
    #[allow(clippy::should_implement_trait)]
    pub fn from_iter<I>(items: I) -> Self
    where
        I: IntoIterator<Item = T>,
        I::IntoIter: Send + 'static,
    {
        Self::from_iter_with_config(items, PipelineConfig::default())
    }

    /// Like [`Pipeline::from_iter`], sizing the first channel with `config`.
    ///
    /// Stages built from the returned pipeline inherit `config`.
    pub fn from_iter_with_config<I>(items: I, config: PipelineConfig) -> Self
    where
        I: IntoIterator<Item = T>,
        I::IntoIter: Send + 'static,
    {
        let (tx, pipeline) = Self::channel_with_config(config);
        let items = items.into_iter();
        stage::drive("from_iter", tx, |tx| async move {
            for item in items {
                if tx.push(item).await.is_err() {
                    break;
                }
            }
            Ok(())
        });
        pipeline
    }

    /// Builds a pipeline yielding the single value `future` resolves to.
    ///
    /// If the future fails the pipeline closes with
    /// [`PipelineError::Source`] carrying that error and yields nothing.
    pub fn from_future<F, E>(future: F) -> Self
    where
        F: Future<Output = Result<T, E>> + Send + 'static,
        E: Into<BoxError>,
    {
        let (tx, pipeline) = Self::channel();
        stage::drive("from_future", tx, |tx| async move {
            let value = future.await.map_err(PipelineError::source_error)?;
            // A dropped consumer is not an error for the source.
            let _ = tx.push(value).await;
            Ok(())
        });
        pipeline
    }

    /// Builds a pipeline that forwards every item of an infallible stream.
    pub fn from_stream<S>(stream: S) -> Self
    where
        S: Stream<Item = T> + Send + 'static,
    {
        Self::from_stream_with_config(stream, PipelineConfig::default())
    }

    /// Like [`Pipeline::from_stream`], sizing the first channel with `config`.
    pub fn from_stream_with_config<S>(stream: S, config: PipelineConfig) -> Self
    where
        S: Stream<Item = T> + Send + 'static,
    {
        let (tx, pipeline) = Self::channel_with_config(config);
        stage::drive("from_stream", tx, |tx| async move {
            let mut stream = std::pin::pin!(stream);
            while let Some(item) = stream.next().await {
                if tx.push(item).await.is_err() {
                    break;
                }
            }
            Ok(())
        });
        pipeline
    }

    /// Builds a pipeline from a stream of results.
    ///
    /// The first `Err` closes the pipeline with [`PipelineError::Source`] and
    /// the stream is not polled again.
    pub fn try_from_stream<S, E>(stream: S) -> Self
    where
        S: Stream<Item = Result<T, E>> + Send + 'static,
        E: Into<BoxError> + Send + 'static,
    {
        Self::try_from_stream_with_config(stream, PipelineConfig::default())
    }

    /// Like [`Pipeline::try_from_stream`], sizing the first channel with `config`.
    pub fn try_from_stream_with_config<S, E>(stream: S, config: PipelineConfig) -> Self
    where
        S: Stream<Item = Result<T, E>> + Send + 'static,
        E: Into<BoxError> + Send + 'static,
    {
        let (tx, pipeline) = Self::channel_with_config(config);
        stage::drive("try_from_stream", tx, |tx| async move {
            let mut stream = std::pin::pin!(stream);
            while let Some(item) = stream.next().await {
                let item = item.map_err(PipelineError::source_error)?;
                if tx.push(item).await.is_err() {
                    break;
                }
            }
            Ok(())
        });
        pipeline
    }
}
