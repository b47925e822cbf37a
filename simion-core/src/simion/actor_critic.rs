//! Actor-critic simion.
use super::{ActorCriticConfig, GaussianPolicy, Simion};
use crate::{
    context::{BuildContext, StepContext},
    critic::Critic,
    error::SimionError,
    named_var_set::{Action, State},
};
use anyhow::Result;

/// A critic plus one Gaussian policy per controlled action variable.
///
/// The TD error returned by the critic drives the updates of every policy.
pub struct ActorCritic {
    critic: Box<dyn Critic>,
    actor: Vec<GaussianPolicy>,
}

impl ActorCritic {
    /// Builds the critic and the policies.
    pub fn build(config: &ActorCriticConfig, ctx: &mut BuildContext) -> Result<Self> {
        Ok(Self {
            critic: config.critic.build(ctx),
            actor: config
                .actor
                .iter()
                .map(|policy| GaussianPolicy::build(policy, ctx))
                .collect::<Result<Vec<_>>>()?,
        })
    }

    /// The critic.
    pub fn critic(&self) -> &dyn Critic {
        self.critic.as_ref()
    }

    /// The policies, in configuration order.
    pub fn actor(&self) -> &[GaussianPolicy] {
        &self.actor
    }

    /// `pi(a|s) / probability`, or 1 without importance weights.
    fn importance_weight(
        &mut self,
        s: &State,
        a: &Action,
        probability: f64,
        ctx: &StepContext,
    ) -> Result<f64> {
        if !ctx.use_importance_weights {
            return Ok(1.0);
        }
        if !(probability > 0.0) {
            return Err(SimionError::InvalidProbability(probability).into());
        }
        let mut pi = 1.0;
        for policy in self.actor.iter_mut() {
            pi *= policy.pdf(s, a)?;
        }
        Ok(pi / probability)
    }
}

impl Simion for ActorCritic {
    fn select_action(&mut self, s: &State, a: &mut Action, ctx: &StepContext) -> Result<f64> {
        let mut probability = 1.0;
        for policy in self.actor.iter_mut() {
            probability *= policy.select_action(s, a, ctx)?;
        }
        Ok(probability)
    }

    fn update(
        &mut self,
        s: &State,
        a: &Action,
        s_p: &State,
        r: f64,
        probability: f64,
        ctx: &StepContext,
    ) -> Result<()> {
        let rho = self.importance_weight(s, a, probability, ctx)?;
        let td = self.critic.update(s, a, s_p, r, rho, ctx)?;
        for policy in self.actor.iter_mut() {
            policy.update(s, a, td)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        critic::{test_util::Fixture, CriticConfig, TdLambdaConfig},
        simion::PolicyConfig,
    };

    fn actor_critic(fixture: &mut Fixture) -> Result<ActorCritic> {
        let config = ActorCriticConfig {
            critic: CriticConfig::TdLambda(TdLambdaConfig::default().alpha(0.1)),
            actor: vec![PolicyConfig::new("u").sigma(0.5)],
        };
        ActorCritic::build(&config, &mut fixture.build_context(false))
    }

    #[test]
    fn test_update_trains_the_critic() -> Result<()> {
        let mut fixture = Fixture::new(1)?;
        let mut simion = actor_critic(&mut fixture)?;
        fixture.load()?;

        let s = fixture.state(0.5)?;
        let a = fixture.action();
        simion.update(&s, &a, &s, 1.0, 1.0, &StepContext::default())?;
        let v = simion.critic().v_function().borrow().weights()[0];
        assert!((v - 0.1).abs() < 1e-12);
        Ok(())
    }

    #[test]
    fn test_importance_weight() -> Result<()> {
        let mut fixture = Fixture::new(1)?;
        let mut simion = actor_critic(&mut fixture)?;
        fixture.load()?;

        let s = fixture.state(0.5)?;
        let mut a = fixture.action();
        let ctx = StepContext {
            use_importance_weights: true,
            ..StepContext::default()
        };
        let p = simion.select_action(&s, &mut a, &ctx)?;
        assert!((simion.importance_weight(&s, &a, p, &ctx)? - 1.0).abs() < 1e-9);
        assert!((simion.importance_weight(&s, &a, 2.0 * p, &ctx)? - 0.5).abs() < 1e-9);
        assert!(simion.importance_weight(&s, &a, 0.0, &ctx).is_err());

        let on_policy = StepContext::default();
        assert_eq!(simion.importance_weight(&s, &a, 0.0, &on_policy)?, 1.0);
        Ok(())
    }
}
