//! TD(lambda) critic.
use super::{build_v_function, Critic, ETraces, TdLambdaConfig};
use crate::{
    config::param_or_default,
    context::{BuildContext, StepContext},
    deferred_load::Shared,
    feature_map::FeatureList,
    named_var_set::{Action, State},
    vfa::LinearStateVfa,
};
use anyhow::Result;

/// TD(lambda) with eligibility traces.
///
/// ```text
/// delta = r + gamma * V'(s') - V(s)
/// e     = gamma * lambda * e + rho * phi(s)
/// w     = w + alpha * delta * e
/// ```
///
/// `V'` uses the frozen weights when target-function freezing is enabled.
pub struct TdLambdaCritic {
    alpha: f64,
    e: ETraces,
    v_function: Shared<LinearStateVfa>,
    phi: FeatureList,
    phi_p: FeatureList,
}

impl TdLambdaCritic {
    /// Builds the critic and registers its V-function for deferred load.
    pub fn build(config: &TdLambdaConfig, ctx: &mut BuildContext) -> Self {
        Self {
            alpha: param_or_default(config.alpha, "TD-Lambda", "Alpha", 0.01),
            e: ETraces::build(&config.e_traces),
            v_function: build_v_function(&config.v_function, ctx),
            phi: FeatureList::new(),
            phi_p: FeatureList::new(),
        }
    }
}

impl Critic for TdLambdaCritic {
    fn update(
        &mut self,
        s: &State,
        _a: &Action,
        s_p: &State,
        r: f64,
        rho: f64,
        ctx: &StepContext,
    ) -> Result<f64> {
        let mut v = self.v_function.borrow_mut();
        v.check_loaded()?;
        v.get_features(s, &mut self.phi)?;
        v.get_features(s_p, &mut self.phi_p)?;

        let td = r + ctx.gamma * v.get_frozen_value(&self.phi_p) - v.get_value(&self.phi);

        if ctx.is_first_step {
            self.e.clear();
        }
        self.e.update(ctx.gamma);
        self.e.add(&self.phi, rho);
        v.add(self.e.features(), self.alpha * td);

        if ctx.update_frozen_weights_now {
            v.update_frozen_weights();
        }
        Ok(td)
    }

    fn v_function(&self) -> &Shared<LinearStateVfa> {
        &self.v_function
    }
}
