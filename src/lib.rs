//! # Cyrup Pipelines
//!
//! Ordered, backpressured async pipelines built from small composable stages.
//!
//! A [`Pipeline`] wraps one flow-controlled [`channel`]. Every operator
//! (`map`, `filter`, `reduce`, `flat_map`, `split`, ...) consumes the pipeline
//! and returns a new one, driven by its own stage task that keeps at most one
//! item in flight. Order is preserved end to end, the first error closes the
//! chain, and terminals (`collect`, `for_each`, `attach`) settle a single
//! [`AsyncTask`] with the outcome. [`Pipeline::merge`] and
//! [`Pipeline::lockstep`] combine several pipelines into one.
//!
//! Everything runs as tokio tasks; a current-thread runtime gives the single
//! cooperative event loop the ordering guarantees are stated against.
//!
//! ## Example
//!
//! ```rust
//! use cyrup_pipelines::Pipeline;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> cyrup_pipelines::Result<()> {
//! let chunks = Pipeline::from_iter(0..10)
//!     .filter(|n| n % 2 == 0)
//!     .map_async(|n| async move { Ok::<_, std::convert::Infallible>(n * 10) })
//!     .split(2)?
//!     .collect()
//!     .await?;
//!
//! assert_eq!(chunks, vec![vec![0, 20], vec![40, 60], vec![80]]);
//! # Ok(())
//! # }
//! ```
//!
//! ## Features
//!
//! - `serde` - `Serialize`/`Deserialize` for [`PipelineConfig`]

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]
#![forbid(unsafe_code)]

pub mod channel;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod stream_ext;
mod sync;
pub mod task;
mod terminal;

pub use channel::{ChannelClosed, Receiver, Sender};
pub use config::PipelineConfig;
pub use error::{BoxError, PipelineError, Result};
pub use pipeline::Pipeline;
pub use stream_ext::PipelineStreamExt;
pub use task::AsyncTask;
pub use terminal::Ack;
