//! Control problems simulated step by step.
mod balancing_pole;
use crate::{
    experiment::Experiment,
    named_var_set::{Action, Descriptor, State},
};
use anyhow::Result;
pub use balancing_pole::{BalancingPole, BalancingPoleReward};
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use std::rc::Rc;

/// A simulated control problem.
pub trait World {
    /// State variables.
    fn state_descriptor(&self) -> &Rc<Descriptor>;

    /// Action variables.
    fn action_descriptor(&self) -> &Rc<Descriptor>;

    /// Sets the initial state of an episode.
    fn reset(&mut self, s: &mut State, experiment: &Experiment, rng: &mut StdRng) -> Result<()>;

    /// Integrates the dynamics over `dt` seconds, updating `s` in place.
    fn execute_action(&mut self, s: &mut State, a: &Action, dt: f64) -> Result<()>;

    /// Reward of a transition. May mark the experiment state as terminal.
    fn reward(&self, s: &State, a: &Action, s_p: &State, experiment: &mut Experiment)
        -> Result<f64>;
}

/// One term of the reward function of a world.
pub trait RewardComponent {
    /// Reward of a transition. May mark the experiment state as terminal.
    fn reward(&self, s: &State, a: &Action, s_p: &State, experiment: &mut Experiment)
        -> Result<f64>;

    /// Lowest reward the component returns.
    fn min(&self) -> f64;

    /// Highest reward the component returns.
    fn max(&self) -> f64;
}

/// Choice of world.
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
#[serde(tag = "Type")]
pub enum WorldConfig {
    /// Cart-pole balancing.
    #[serde(rename = "Balancing-Pole")]
    BalancingPole,
}

impl WorldConfig {
    /// Builds the chosen world.
    pub fn build(&self) -> Result<Box<dyn World>> {
        match self {
            Self::BalancingPole => Ok(Box::new(BalancingPole::new()?)),
        }
    }
}
