//! Stage driver shared by every operator, source and synchronizer.

use crate::channel::Sender;
use crate::error::{PipelineError, Result};
use futures::FutureExt as _;
use std::future::Future;
use std::panic::AssertUnwindSafe;

/// Spawns the task that drives one stage into `downstream`.
///
/// `body` receives its own handle on the downstream channel and pushes items
/// into it. The driver owns the close signal:
/// - `Ok(())` ends the downstream channel normally,
/// - `Err(e)` closes it with `e`,
/// - a panic closes it with [`PipelineError::Panicked`].
///
/// The body owns its upstream receiver, so returning (or panicking) stops
/// consumption of upstream. If the downstream receiver goes away first the
/// body is dropped mid-flight, cancelling whatever it was awaiting.
pub(crate) fn drive<O, F, Fut>(stage: &'static str, downstream: Sender<O>, body: F)
where
    O: Send + 'static,
    F: FnOnce(Sender<O>) -> Fut,
    Fut: Future<Output = Result<()>> + Send + 'static,
{
    let body = body(downstream.clone());
    tokio::spawn(async move {
        log::trace!("{stage} stage started");
        let outcome = tokio::select! {
            outcome = AssertUnwindSafe(body).catch_unwind() => outcome,
            _ = downstream.cancelled() => {
                log::debug!("{stage} stage cancelled: downstream dropped");
                return;
            }
        };
        match outcome {
            Ok(Ok(())) => {
                downstream.end().await;
                log::trace!("{stage} stage finished");
            }
            Ok(Err(error)) => {
                log::debug!("{stage} stage failed: {error}");
                downstream.raise_error(error).await;
            }
            Err(payload) => {
                let error = PipelineError::panicked(payload);
                log::warn!("{stage} stage {error}");
                downstream.raise_error(error).await;
            }
        }
    });
}
