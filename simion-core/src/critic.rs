//! Critics: value-function learners with TD-style update rules.
//!
//! Every critic owns a [`LinearStateVfa`] over the global state feature map and
//! turns a transition `(s, a, s', r)` with an importance weight `rho` into one
//! parameter update, returning the TD error.
mod config;
mod etraces;
mod td_lambda;
mod tdc_lambda;
mod true_online_td_lambda;
use crate::{
    context::{BuildContext, StepContext},
    deferred_load::{Shared, VFA_LOAD_PRIORITY},
    named_var_set::{Action, State},
    vfa::{LinearStateVfa, LinearStateVfaConfig},
};
use anyhow::Result;
pub use config::{
    CriticConfig, ETracesConfig, TdLambdaConfig, TdcLambdaConfig, TrueOnlineTdLambdaConfig,
};
pub use etraces::ETraces;
use std::{cell::RefCell, rc::Rc};
pub use td_lambda::TdLambdaCritic;
pub use tdc_lambda::TdcLambdaCritic;
pub use true_online_td_lambda::TrueOnlineTdLambdaCritic;

/// A value-function learner.
pub trait Critic {
    /// Updates the value function with a transition and returns the TD error.
    ///
    /// `rho` is the importance weight of the transition, 1 for on-policy samples.
    fn update(
        &mut self,
        s: &State,
        a: &Action,
        s_p: &State,
        r: f64,
        rho: f64,
        ctx: &StepContext,
    ) -> Result<f64>;

    /// The learned value function.
    fn v_function(&self) -> &Shared<LinearStateVfa>;
}

impl CriticConfig {
    /// Builds the chosen critic.
    pub fn build(&self, ctx: &mut BuildContext) -> Box<dyn Critic> {
        match self {
            Self::TdLambda(config) => Box::new(TdLambdaCritic::build(config, ctx)),
            Self::TrueOnlineTdLambda(config) => {
                Box::new(TrueOnlineTdLambdaCritic::build(config, ctx))
            }
            Self::TdcLambda(config) => Box::new(TdcLambdaCritic::build(config, ctx)),
        }
    }
}

/// Creates a value function over the global state feature map and registers it
/// for deferred load.
pub(crate) fn build_v_function(
    config: &LinearStateVfaConfig,
    ctx: &mut BuildContext,
) -> Shared<LinearStateVfa> {
    let vfa = Rc::new(RefCell::new(LinearStateVfa::build(
        config,
        ctx.state_feature_map.clone(),
        ctx.freeze_target_function,
    )));
    ctx.registry.register(vfa.clone(), VFA_LOAD_PRIORITY);
    vfa
}
