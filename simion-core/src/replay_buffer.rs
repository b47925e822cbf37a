//! Experience replay.
//!
//! Transitions `(s, a, s', r, probability)` seen during training are stored in a
//! fixed-capacity ring buffer and replayed in uniformly sampled batches.
mod base;
mod config;
mod experience_replay;
pub use base::{ExperienceBufferBase, ReplayBufferBase};
pub use config::ExperienceReplayConfig;
pub use experience_replay::{ExperienceReplay, ExperienceTuple};
