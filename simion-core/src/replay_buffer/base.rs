//! Replay buffer interface.
use anyhow::Result;

/// Interface for buffers that store experiences.
pub trait ExperienceBufferBase {
    /// The type of items stored in the buffer.
    type Item;

    /// Pushes a new experience into the buffer.
    fn push(&mut self, tr: Self::Item) -> Result<()>;

    /// Returns the current number of experiences in the buffer.
    fn len(&self) -> usize;

    /// Returns `true` if the buffer holds no experience.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Interface for replay buffers that generate batches for learning.
pub trait ReplayBufferBase: Sized {
    /// Configuration parameters for the replay buffer.
    type Config: Clone;

    /// The type of batch generated for learning.
    type Batch;

    /// Builds a new replay buffer from the given configuration.
    fn build(config: &Self::Config, seed: u64) -> Result<Self>;

    /// Samples a batch of `size` experiences.
    fn batch(&mut self, size: usize) -> Result<Self::Batch>;
}
