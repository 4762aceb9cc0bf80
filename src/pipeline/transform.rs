//! Per-item stages: map, filter and flat-map.
//!
//! Every stage here holds at most one upstream item in flight. The next item
//! is not requested until the current one has settled and its output, if
//! any, has been pushed downstream, so output order is upstream order.

use super::stage;
use super::Pipeline;
use crate::error::{BoxError, PipelineError};
use std::convert::Infallible;
use std::future::{ready, Future};

impl<T: Send + 'static> Pipeline<T> {
    /// Transforms every item with `f`.
    pub fn map<O, F>(self, mut f: F) -> Pipeline<O>
    where
        O: Send + 'static,
        F: FnMut(T) -> O + Send + 'static,
    {
        self.map_async(move |item| ready(Ok::<_, Infallible>(f(item))))
    }

    /// Transforms every item with a fallible `f`.
    ///
    /// The first error closes the returned pipeline with
    /// [`PipelineError::Callback`] and stops consumption of `self`.
    pub fn try_map<O, F, E>(self, mut f: F) -> Pipeline<O>
    where
        O: Send + 'static,
        F: FnMut(T) -> Result<O, E> + Send + 'static,
        E: Into<BoxError> + Send + 'static,
    {
        self.map_async(move |item| ready(f(item)))
    }

    /// Transforms every item with an asynchronous `f`.
    ///
    /// Each future is awaited to completion before the next item is pulled,
    /// so slow and fast items never overtake each other.
    pub fn map_async<O, F, Fut, E>(self, mut f: F) -> Pipeline<O>
    where
        O: Send + 'static,
        F: FnMut(T) -> Fut + Send + 'static,
        Fut: Future<Output = Result<O, E>> + Send + 'static,
        E: Into<BoxError>,
    {
        let (tx, pipeline) = self.downstream();
        let mut upstream = self.receiver;
        stage::drive("map", tx, |tx| async move {
            while let Some(item) = upstream.recv().await {
                let value = f(item?).await.map_err(PipelineError::callback)?;
                if tx.push(value).await.is_err() {
                    break;
                }
            }
            Ok(())
        });
        pipeline
    }

    /// Keeps the items for which `predicate` returns `true`.
    pub fn filter<F>(self, mut predicate: F) -> Pipeline<T>
    where
        F: FnMut(&T) -> bool + Send + 'static,
    {
        self.filter_async(move |item| ready(Ok::<_, Infallible>(predicate(item))))
    }

    /// Keeps the items for which a fallible `predicate` returns `Ok(true)`.
    pub fn try_filter<F, E>(self, mut predicate: F) -> Pipeline<T>
    where
        F: FnMut(&T) -> Result<bool, E> + Send + 'static,
        E: Into<BoxError> + Send + 'static,
    {
        self.filter_async(move |item| ready(predicate(item)))
    }

    /// Keeps the items for which an asynchronous `predicate` resolves to `true`.
    ///
    /// The returned future must not borrow the item; clone what it needs.
    pub fn filter_async<F, Fut, E>(self, mut predicate: F) -> Pipeline<T>
    where
        F: FnMut(&T) -> Fut + Send + 'static,
        Fut: Future<Output = Result<bool, E>> + Send + 'static,
        E: Into<BoxError>,
    {
        let (tx, pipeline) = self.downstream();
        let mut upstream = self.receiver;
        stage::drive("filter", tx, |tx| async move {
            while let Some(item) = upstream.recv().await {
                let item = item?;
                let keep = predicate(&item).await.map_err(PipelineError::callback)?;
                if keep && tx.push(item).await.is_err() {
                    break;
                }
            }
            Ok(())
        });
        pipeline
    }

    /// Replaces every item with the pipeline `f` builds from it.
    ///
    /// Sub-pipelines are drained one after another: all of one item's output
    /// is pushed before the next upstream item is pulled, so the outputs of
    /// two sub-pipelines never interleave. An error from a sub-pipeline
    /// closes the returned pipeline and stops consumption of `self`.
    pub fn flat_map<O, F>(self, mut f: F) -> Pipeline<O>
    where
        O: Send + 'static,
        F: FnMut(T) -> Pipeline<O> + Send + 'static,
    {
        let (tx, pipeline) = self.downstream();
        let mut upstream = self.receiver;
        stage::drive("flat_map", tx, |tx| async move {
            while let Some(item) = upstream.recv().await {
                let mut inner = f(item?).receiver;
                while let Some(value) = inner.recv().await {
                    if tx.push(value?).await.is_err() {
                        return Ok(());
                    }
                }
            }
            Ok(())
        });
        pipeline
    }
}
