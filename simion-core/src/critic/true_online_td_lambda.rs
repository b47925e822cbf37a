//! True online TD(lambda) critic.
use super::{build_v_function, Critic, ETraces, TrueOnlineTdLambdaConfig};
use crate::{
    config::param_or_default,
    context::{BuildContext, StepContext},
    deferred_load::Shared,
    feature_map::FeatureList,
    named_var_set::{Action, State},
    vfa::LinearStateVfa,
};
use anyhow::Result;

/// True online TD(lambda) (van Seijen & Sutton, 2014) with dutch traces.
///
/// ```text
/// delta = r + gamma * V'(s') - V(s)
/// e     = gamma * lambda * e + rho * (1 - alpha * gamma * lambda * e.phi) * phi
/// w     = w + alpha * (delta + V(s) - v_old) * e - alpha * (V(s) - v_old) * phi
/// v_old = V'(s')
/// ```
pub struct TrueOnlineTdLambdaCritic {
    alpha: f64,
    e: ETraces,
    v_old: f64,
    v_function: Shared<LinearStateVfa>,
    phi: FeatureList,
    phi_p: FeatureList,
}

impl TrueOnlineTdLambdaCritic {
    /// Builds the critic and registers its V-function for deferred load.
    pub fn build(config: &TrueOnlineTdLambdaConfig, ctx: &mut BuildContext) -> Self {
        Self {
            alpha: param_or_default(config.alpha, "True-Online-TD-Lambda", "Alpha", 0.01),
            e: ETraces::build(&config.e_traces),
            v_old: 0.0,
            v_function: build_v_function(&config.v_function, ctx),
            phi: FeatureList::new(),
            phi_p: FeatureList::new(),
        }
    }
}

impl Critic for TrueOnlineTdLambdaCritic {
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

        if ctx.is_first_step {
            self.e.clear();
            self.v_old = 0.0;
        }
        let v_s = v.get_value(&self.phi);
        let v_s_p = v.get_frozen_value(&self.phi_p);
        let td = r + ctx.gamma * v_s_p - v_s;

        let gamma_lambda = ctx.gamma * self.e.lambda();
        let e_phi = self.e.features().inner_product(&self.phi);
        self.e.update(ctx.gamma);
        self.e
            .add(&self.phi, rho * (1.0 - self.alpha * gamma_lambda * e_phi));

        v.add(self.e.features(), self.alpha * (td + v_s - self.v_old));
        v.add(&self.phi, -self.alpha * (v_s - self.v_old));
        self.v_old = v_s_p;

        if ctx.update_frozen_weights_now {
            v.update_frozen_weights();
        }
        Ok(td)
    }

    fn v_function(&self) -> &Shared<LinearStateVfa> {
        &self.v_function
    }
}
