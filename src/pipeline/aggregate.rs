//! Stateful stages: reduce and split.

use super::stage;
use super::Pipeline;
use crate::error::{BoxError, PipelineError, Result};
use std::convert::Infallible;

impl<T: Send + 'static> Pipeline<T> {
    /// Folds every item into an accumulator starting at `init`.
    ///
    /// The returned pipeline yields exactly one item, the final accumulator,
    /// once `self` ends normally.
    pub fn reduce<O, F>(self, init: O, mut f: F) -> Pipeline<O>
    where
        O: Send + 'static,
        F: FnMut(O, T) -> O + Send + 'static,
    {
        self.try_reduce(init, move |acc, item| Ok::<_, Infallible>(f(acc, item)))
    }

    /// Folds every item with a fallible reducer.
    ///
    /// A reducer error discards the accumulator and closes the returned
    /// pipeline without yielding anything.
    pub fn try_reduce<O, F, E>(self, init: O, mut f: F) -> Pipeline<O>
    where
        O: Send + 'static,
        F: FnMut(O, T) -> std::result::Result<O, E> + Send + 'static,
        E: Into<BoxError>,
    {
        let (tx, pipeline) = self.downstream();
        let mut upstream = self.receiver;
        stage::drive("reduce", tx, |tx| async move {
            let mut acc = init;
            while let Some(item) = upstream.recv().await {
                acc = f(acc, item?).map_err(PipelineError::callback)?;
            }
            let _ = tx.push(acc).await;
            Ok(())
        });
        pipeline
    }

    /// Groups items into chunks of `size`.
    ///
    /// Every chunk holds exactly `size` items except possibly the last,
    /// which holds whatever remained when `self` ended. An upstream error
    /// discards the partial chunk.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::InvalidChunkSize`] when `size` is zero.
    pub fn split(self, size: usize) -> Result<Pipeline<Vec<T>>> {
        if size == 0 {
            return Err(PipelineError::InvalidChunkSize { size });
        }
        let (tx, pipeline) = self.downstream();
        let mut upstream = self.receiver;
        stage::drive("split", tx, move |tx| async move {
            let mut chunk = Vec::with_capacity(size);
            while let Some(item) = upstream.recv().await {
                chunk.push(item?);
                if chunk.len() == size {
                    let full = std::mem::replace(&mut chunk, Vec::with_capacity(size));
                    if tx.push(full).await.is_err() {
                        return Ok(());
                    }
                }
            }
            if !chunk.is_empty() {
                let _ = tx.push(chunk).await;
            }
            Ok(())
        });
        Ok(pipeline)
    }
}
