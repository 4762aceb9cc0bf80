//! Fan-in synchronizers combining several pipelines into one.
//!
//! - [`Pipeline::merge`](crate::Pipeline::merge): unordered, items flow as soon
//!   as any input produces them
//! - [`Pipeline::lockstep`](crate::Pipeline::lockstep): ordered rounds, one
//!   index-aligned tuple per round

mod lockstep;
mod merge;
