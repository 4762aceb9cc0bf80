//! Shared fixtures for the integration tests

#![allow(dead_code)]

use cyrup_pipelines::Pipeline;
use std::convert::Infallible;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefaultStreamItem {
    pub id: u32,
    pub info: String,
}

impl DefaultStreamItem {
    pub fn new(id: u32) -> Self {
        Self {
            id,
            info: format!("information::{id}"),
        }
    }
}

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn default_items(start: u32, len: u32) -> Vec<DefaultStreamItem> {
    (start..start + len).map(DefaultStreamItem::new).collect()
}

pub fn default_object_pipeline(start: u32, len: u32) -> Pipeline<DefaultStreamItem> {
    Pipeline::from_iter(default_items(start, len))
}

/// Pipeline yielding `len` items, each after `delay`.
pub fn delayed_pipeline(start: u32, len: u32, delay: Duration) -> Pipeline<DefaultStreamItem> {
    Pipeline::from_iter(start..start + len).map_async(move |id| async move {
        tokio::time::sleep(delay).await;
        Ok::<_, Infallible>(DefaultStreamItem::new(id))
    })
}
