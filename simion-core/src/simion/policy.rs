//! Gaussian exploration policy with a linear mean.
use super::{PolicyConfig, PolicyLearner};
use crate::{
    config::param_or_default,
    context::{BuildContext, StepContext},
    deferred_load::{Shared, VFA_LOAD_PRIORITY},
    error::SimionError,
    feature_map::FeatureList,
    named_var_set::{Action, State},
    vfa::{LinearStateVfa, LinearStateVfaConfig},
};
use anyhow::Result;
use rand::{rngs::StdRng, SeedableRng};
use rand_distr::{Distribution, Normal};
use std::{cell::RefCell, f64::consts::PI, rc::Rc};

/// Writes `mu(s) + N(0, sigma^2)` into one action variable.
///
/// `mu(s) = w . phi(s)` over the global state feature map. In evaluation
/// episodes the policy is greedy and the action is `mu(s)`.
pub struct GaussianPolicy {
    output_action: String,
    sigma: f64,
    alpha: f64,
    learner: PolicyLearner,
    mean: Shared<LinearStateVfa>,
    rng: StdRng,
    phi: FeatureList,
}

impl GaussianPolicy {
    /// Builds the policy and registers its mean for deferred load.
    ///
    /// Fails unless `Sigma` is positive.
    pub fn build(config: &PolicyConfig, ctx: &mut BuildContext) -> Result<Self> {
        let node = format!("Actor/{}", config.output_action);
        let sigma = param_or_default(config.sigma, &node, "Sigma", 0.1);
        if !(sigma > 0.0 && sigma.is_finite()) {
            return Err(SimionError::InvalidConfig(
                format!("{}/Sigma", node),
                format!("{} is not a positive width", sigma),
            )
            .into());
        }
        let vfa_config = LinearStateVfaConfig::default().init_value(param_or_default(
            config.init_value,
            &node,
            "Init-Value",
            0.0,
        ));
        let mean = Rc::new(RefCell::new(LinearStateVfa::build(
            &vfa_config,
            ctx.state_feature_map.clone(),
            false,
        )));
        ctx.registry.register(mean.clone(), VFA_LOAD_PRIORITY);

        Ok(Self {
            output_action: config.output_action.clone(),
            sigma,
            alpha: param_or_default(config.alpha, &node, "Alpha", 0.001),
            learner: param_or_default(config.learner, &node, "Learner", PolicyLearner::Cacla),
            mean,
            rng: StdRng::seed_from_u64(ctx.next_seed()),
            phi: FeatureList::new(),
        })
    }

    /// Name of the action variable written by the policy.
    pub fn output_action(&self) -> &str {
        &self.output_action
    }

    /// The mean of the policy.
    pub fn mean(&self) -> &Shared<LinearStateVfa> {
        &self.mean
    }

    /// Writes an action and returns its probability density.
    ///
    /// Greedy actions have probability 1.
    pub fn select_action(&mut self, s: &State, a: &mut Action, ctx: &StepContext) -> Result<f64> {
        let mu = self.mean_of(s)?;
        if ctx.is_evaluation {
            a.set(&self.output_action, mu)?;
            return Ok(1.0);
        }

        let u = Normal::new(mu, self.sigma)?.sample(&mut self.rng);
        a.set(&self.output_action, u)?;

        // The variable clamps, so the density is taken at the stored value
        Ok(self.density(a.get(&self.output_action)?, mu))
    }

    /// Probability density of the action stored in `a` given `s`.
    pub fn pdf(&mut self, s: &State, a: &Action) -> Result<f64> {
        let mu = self.mean_of(s)?;
        Ok(self.density(a.get(&self.output_action)?, mu))
    }

    /// Updates the mean with the TD error of the critic.
    pub fn update(&mut self, s: &State, a: &Action, td: f64) -> Result<()> {
        let mu = self.mean_of(s)?;
        let diff = a.get(&self.output_action)? - mu;
        let factor = match self.learner {
            PolicyLearner::RegularGradient => self.alpha * td * diff / (self.sigma * self.sigma),
            PolicyLearner::Cacla if td > 0.0 => self.alpha * diff,
            PolicyLearner::Cacla => return Ok(()),
        };
        self.mean.borrow_mut().add(&self.phi, factor);
        Ok(())
    }

    fn mean_of(&mut self, s: &State) -> Result<f64> {
        let mean = self.mean.borrow();
        mean.check_loaded()?;
        mean.get_features(s, &mut self.phi)?;
        Ok(mean.get_value(&self.phi))
    }

    fn density(&self, x: f64, mu: f64) -> f64 {
        let z = (x - mu) / self.sigma;
        (-0.5 * z * z).exp() / (self.sigma * (2.0 * PI).sqrt())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::critic::test_util::Fixture;

    fn policy(fixture: &mut Fixture, learner: PolicyLearner) -> Result<GaussianPolicy> {
        let config = PolicyConfig::new("u")
            .sigma(0.2)
            .alpha(0.5)
            .learner(learner)
            .init_value(0.1);
        GaussianPolicy::build(&config, &mut fixture.build_context(false))
    }

    #[test]
    fn test_sigma_must_be_positive() -> Result<()> {
        let mut fixture = Fixture::new(2)?;
        for sigma in [0.0, -0.5, f64::NAN] {
            let config = PolicyConfig::new("u").sigma(sigma);
            assert!(GaussianPolicy::build(&config, &mut fixture.build_context(false)).is_err());
        }
        // Only the two feature maps of the fixture
        assert_eq!(fixture.registry.len(), 2);
        Ok(())
    }

    #[test]
    fn test_greedy_in_evaluation() -> Result<()> {
        let mut fixture = Fixture::new(2)?;
        let mut pi = policy(&mut fixture, PolicyLearner::Cacla)?;
        fixture.load()?;

        let s = fixture.state(0.3)?;
        let mut a = fixture.action();
        let ctx = StepContext {
            is_evaluation: true,
            ..StepContext::default()
        };
        assert_eq!(pi.select_action(&s, &mut a, &ctx)?, 1.0);
        assert!((a.get("u")? - 0.1).abs() < 1e-12);
        Ok(())
    }

    #[test]
    fn test_exploration_returns_density() -> Result<()> {
        let mut fixture = Fixture::new(2)?;
        let mut pi = policy(&mut fixture, PolicyLearner::Cacla)?;
        fixture.load()?;

        let s = fixture.state(0.3)?;
        let mut a = fixture.action();
        let p = pi.select_action(&s, &mut a, &StepContext::default())?;
        assert!(p > 0.0);
        assert!((pi.pdf(&s, &a)? - p).abs() < 1e-12);
        Ok(())
    }

    #[test]
    fn test_cacla_ignores_negative_td() -> Result<()> {
        let mut fixture = Fixture::new(2)?;
        let mut pi = policy(&mut fixture, PolicyLearner::Cacla)?;
        fixture.load()?;

        let s = fixture.state(0.3)?;
        let mut a = fixture.action();
        a.set("u", 0.5)?;
        pi.update(&s, &a, -1.0)?;
        assert_eq!(pi.mean().borrow().weights(), &[0.1, 0.1]);

        // The state falls in the first cell: 0.1 + 0.5 * (0.5 - 0.1)
        pi.update(&s, &a, 1.0)?;
        assert!((pi.mean().borrow().weights()[0] - 0.3).abs() < 1e-12);
        assert_eq!(pi.mean().borrow().weights()[1], 0.1);
        Ok(())
    }

    #[test]
    fn test_regular_gradient_follows_td_sign() -> Result<()> {
        let mut fixture = Fixture::new(2)?;
        let mut pi = policy(&mut fixture, PolicyLearner::RegularGradient)?;
        fixture.load()?;

        let s = fixture.state(0.3)?;
        let mut a = fixture.action();
        a.set("u", 0.5)?;
        pi.update(&s, &a, -0.1)?;
        assert!(pi.mean().borrow().weights()[0] < 0.1);
        Ok(())
    }
}
