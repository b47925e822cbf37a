//! Configuration of [`ExperienceReplay`](super::ExperienceReplay).
use serde::{Deserialize, Serialize};

/// Configuration of [`ExperienceReplay`](super::ExperienceReplay).
///
/// A buffer size of zero disables experience replay.
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone, Default)]
pub struct ExperienceReplayConfig {
    /// Maximum number of tuples kept. The oldest tuples are overwritten first.
    #[serde(rename = "Buffer-Size", default)]
    pub buffer_size: Option<usize>,

    /// Number of tuples replayed at each step.
    #[serde(rename = "Update-Batch-Size", default)]
    pub update_batch_size: Option<usize>,

    /// Number of tuples needed before replay starts. Defaults to the batch size.
    #[serde(rename = "Min-Tuples", default)]
    pub min_tuples: Option<usize>,
}

impl ExperienceReplayConfig {
    /// Sets the capacity of the buffer.
    pub fn buffer_size(mut self, v: usize) -> Self {
        self.buffer_size = Some(v);
        self
    }

    /// Sets the number of tuples replayed at each step.
    pub fn update_batch_size(mut self, v: usize) -> Self {
        self.update_batch_size = Some(v);
        self
    }

    /// Sets the number of tuples needed before replay starts.
    pub fn min_tuples(mut self, v: usize) -> Self {
        self.min_tuples = Some(v);
        self
    }
}
