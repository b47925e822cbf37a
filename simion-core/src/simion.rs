//! Simions: learning agents and controllers driven by [`SimGod`](crate::SimGod).
mod actor_critic;
mod config;
mod controller;
mod policy;
use crate::{
    context::{BuildContext, StepContext},
    named_var_set::{Action, State},
};
pub use actor_critic::ActorCritic;
use anyhow::Result;
pub use config::{
    ActorCriticConfig, ControllerConfig, GainConfig, PolicyConfig, PolicyLearner, SimionConfig,
};
pub use controller::Controller;
pub use policy::GaussianPolicy;

/// A configured agent writing a subset of the action variables.
pub trait Simion {
    /// Writes its action variables into `a` and returns the probability of
    /// the selected values.
    fn select_action(&mut self, s: &State, a: &mut Action, ctx: &StepContext) -> Result<f64>;

    /// Learns from a transition. `probability` is the joint probability with
    /// which `a` was selected.
    fn update(
        &mut self,
        s: &State,
        a: &Action,
        s_p: &State,
        r: f64,
        probability: f64,
        ctx: &StepContext,
    ) -> Result<()>;
}

impl SimionConfig {
    /// Builds the chosen simion.
    pub fn build(&self, ctx: &mut BuildContext) -> Result<Box<dyn Simion>> {
        Ok(match self {
            Self::ActorCritic(config) => Box::new(ActorCritic::build(config, ctx)?),
            Self::Controller(config) => Box::new(Controller::build(config)),
        })
    }
}
