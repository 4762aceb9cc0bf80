//! Pipeline configuration

/// Default in-flight limit of a channel, matching an object-mode high-water mark.
pub const DEFAULT_CAPACITY: usize = 16;

/// Settings inherited by every stage built from a pipeline.
///
/// With the `serde` feature the config can be read straight out of an
/// application's JSON or TOML settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PipelineConfig {
    /// Maximum number of items buffered between two stages
    pub capacity: usize,
}

impl PipelineConfig {
    /// Creates a config with the given channel capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self { capacity }
    }

    /// Capacity actually used when allocating a channel; never zero.
    #[inline]
    pub fn effective_capacity(&self) -> usize {
        self.capacity.max(1)
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
        }
    }
}
