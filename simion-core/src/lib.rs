#![warn(missing_docs)]
//! Online reinforcement learning on continuous control problems.
//!
//! A [`SimGod`] drives a set of simions, learning agents and controllers that
//! share global feature maps, a discount factor and an experience replay
//! buffer. Critics learn linear value functions with TD(lambda), true online
//! TD(lambda) or TDC(lambda), optionally bootstrapping from a periodically
//! frozen copy of their weights. A [`Runner`] simulates a [`World`] and feeds
//! its transitions to the [`SimGod`].
pub mod config;
pub mod context;
pub mod critic;
pub mod deferred_load;
pub mod error;
pub mod experiment;
pub mod feature_map;
pub mod named_var_set;
pub mod record;
pub mod replay_buffer;
pub mod runner;
pub mod sim_god;
pub mod simion;
pub mod vfa;
pub mod world;

pub use config::SimionZooConfig;
pub use context::{BuildContext, StepContext};
pub use deferred_load::{DeferredLoad, DeferredLoadContext, DeferredLoadRegistry};
pub use experiment::{Experiment, ExperimentConfig};
pub use named_var_set::{Action, Descriptor, NamedVarSet, State};
pub use replay_buffer::{ExperienceBufferBase, ReplayBufferBase};
pub use runner::{Runner, EPISODE_RECORD_COLUMNS};
pub use sim_god::{SimGod, SimGodConfig};
pub use simion::Simion;
pub use world::{World, WorldConfig};
