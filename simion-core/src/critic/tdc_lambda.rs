//! TDC(lambda) critic.
use super::{build_v_function, Critic, ETraces, TdcLambdaConfig};
use crate::{
    config::param_or_default,
    context::{BuildContext, StepContext},
    deferred_load::Shared,
    feature_map::FeatureList,
    named_var_set::{Action, State},
    vfa::{LinearStateVfa, LinearStateVfaConfig},
};
use anyhow::Result;

/// TDC(lambda), also known as GTD(lambda) (Maei, 2011).
///
/// A second set of weights `w` estimates the expected TD error and corrects the
/// gradient, which keeps the updates stable with off-policy samples. `w` learns on
/// a faster time scale, with learning rate `beta`.
///
/// ```text
/// delta = r + gamma * theta'.phi(s') - theta.phi(s)
/// e     = gamma * lambda * e + rho * phi(s)
/// theta = theta + alpha * (delta * e - gamma * (1 - lambda) * (e.w) * phi(s'))
/// w     = w + beta * (delta * e - (w.phi(s)) * phi(s))
/// ```
pub struct TdcLambdaCritic {
    alpha: f64,
    beta: f64,
    e: ETraces,
    v_function: Shared<LinearStateVfa>,
    w: Shared<LinearStateVfa>,
    phi: FeatureList,
    phi_p: FeatureList,
}

impl TdcLambdaCritic {
    /// Builds the critic and registers both weight vectors for deferred load.
    pub fn build(config: &TdcLambdaConfig, ctx: &mut BuildContext) -> Self {
        // The correction weights never bootstrap, they don't need a frozen copy
        let freeze = ctx.freeze_target_function;
        ctx.freeze_target_function = false;
        let w = build_v_function(&LinearStateVfaConfig::default().init_value(0.0), ctx);
        ctx.freeze_target_function = freeze;

        Self {
            alpha: param_or_default(config.alpha, "TDC-Lambda", "Alpha", 0.01),
            beta: param_or_default(config.beta, "TDC-Lambda", "Beta", 0.001),
            e: ETraces::build(&config.e_traces),
            v_function: build_v_function(&config.v_function, ctx),
            w,
            phi: FeatureList::new(),
            phi_p: FeatureList::new(),
        }
    }
}

impl Critic for TdcLambdaCritic {
    fn update(
        &mut self,
        s: &State,
        _a: &Action,
        s_p: &State,
        r: f64,
        rho: f64,
        ctx: &StepContext,
    ) -> Result<f64> {
        let mut theta = self.v_function.borrow_mut();
        let mut w = self.w.borrow_mut();
        theta.check_loaded()?;
        w.check_loaded()?;
        theta.get_features(s, &mut self.phi)?;
        theta.get_features(s_p, &mut self.phi_p)?;

        let td = r + ctx.gamma * theta.get_frozen_value(&self.phi_p) - theta.get_value(&self.phi);

        if ctx.is_first_step {
            self.e.clear();
        }
        self.e.update(ctx.gamma);
        self.e.add(&self.phi, rho);

        let e_w = w.get_value(self.e.features());
        let w_phi = w.get_value(&self.phi);
        let lambda = self.e.lambda();

        theta.add(self.e.features(), self.alpha * td);
        theta.add(&self.phi_p, -self.alpha * ctx.gamma * (1.0 - lambda) * e_w);

        w.add(self.e.features(), self.beta * td);
        w.add(&self.phi, -self.beta * w_phi);

        if ctx.update_frozen_weights_now {
            theta.update_frozen_weights();
        }
        Ok(td)
    }

    fn v_function(&self) -> &Shared<LinearStateVfa> {
        &self.v_function
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::critic::{test_util::Fixture, ETracesConfig};

    #[test]
    fn test_initial_value_only_applies_to_v_function() -> Result<()> {
        let mut fixture = Fixture::new(3)?;
        let config =
            TdcLambdaConfig::default().v_function(LinearStateVfaConfig::default().init_value(2.0));
        let critic = TdcLambdaCritic::build(&config, &mut fixture.build_context(false));
        fixture.load()?;
        assert_eq!(critic.v_function().borrow().weights(), &[2.0, 2.0, 2.0]);
        assert_eq!(critic.w.borrow().weights(), &[0.0, 0.0, 0.0]);
        Ok(())
    }

    #[test]
    fn test_gradient_correction() -> Result<()> {
        let mut fixture = Fixture::new(2)?;
        let config = TdcLambdaConfig::default()
            .alpha(0.5)
            .beta(0.5)
            .e_traces(ETracesConfig::default().lambda(0.5));
        let mut critic = TdcLambdaCritic::build(&config, &mut fixture.build_context(false));
        fixture.load()?;

        let ctx = StepContext {
            gamma: 0.5,
            ..StepContext::default()
        };
        let s = fixture.state(0.25)?;
        let a = fixture.action();

        // delta = 1, e = 1, theta = 0.5, w = 0.5
        critic.update(&s, &a, &s, 1.0, 1.0, &ctx)?;
        assert!((critic.w.borrow().weights()[0] - 0.5).abs() < 1e-12);

        // delta = 0.75, e = 1.25, e.w = 0.625, w.phi = 0.5
        // theta = 0.5 + 0.5 * 0.75 * 1.25 - 0.5 * 0.5 * 0.5 * 0.625
        // w     = 0.5 + 0.5 * 0.75 * 1.25 - 0.5 * 0.5
        assert_eq!(critic.update(&s, &a, &s, 1.0, 1.0, &ctx)?, 0.75);
        let theta = critic.v_function().borrow().weights().to_vec();
        assert!((theta[0] - 0.890625).abs() < 1e-12);
        assert_eq!(theta[1], 0.0);
        assert!((critic.w.borrow().weights()[0] - 0.71875).abs() < 1e-12);
        Ok(())
    }
}
