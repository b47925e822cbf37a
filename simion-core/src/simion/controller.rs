//! Fixed state-feedback controller.
use super::{ControllerConfig, Simion};
use crate::{
    context::StepContext,
    named_var_set::{Action, State},
};
use anyhow::Result;

/// `a = sum_i gain_i * s_i`, written into one action variable. Never learns.
pub struct Controller {
    config: ControllerConfig,
}

impl Controller {
    /// Builds the controller.
    pub fn build(config: &ControllerConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }
}

impl Simion for Controller {
    fn select_action(&mut self, s: &State, a: &mut Action, _ctx: &StepContext) -> Result<f64> {
        let mut u = 0.0;
        for term in self.config.gains.iter() {
            u += term.gain * s.get(&term.variable)?;
        }
        a.set(&self.config.output_action, u)?;
        Ok(1.0)
    }

    fn update(
        &mut self,
        _s: &State,
        _a: &Action,
        _s_p: &State,
        _r: f64,
        _probability: f64,
        _ctx: &StepContext,
    ) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::critic::test_util::Fixture;

    #[test]
    fn test_linear_feedback() -> Result<()> {
        let fixture = Fixture::new(1)?;
        let mut controller = Controller::build(&ControllerConfig::new("u").gain("x", -2.0));
        let s = fixture.state(0.25)?;
        let mut a = fixture.action();
        assert_eq!(controller.select_action(&s, &mut a, &StepContext::default())?, 1.0);
        assert_eq!(a.get("u")?, -0.5);

        // Clamped into the range of u
        let s = fixture.state(1.0)?;
        controller.select_action(&s, &mut a, &StepContext::default())?;
        assert_eq!(a.get("u")?, -1.0);
        Ok(())
    }

    #[test]
    fn test_unknown_variable_fails() -> Result<()> {
        let fixture = Fixture::new(1)?;
        let mut controller = Controller::build(&ControllerConfig::new("force"));
        let s = fixture.state(0.25)?;
        let mut a = fixture.action();
        assert!(controller
            .select_action(&s, &mut a, &StepContext::default())
            .is_err());
        Ok(())
    }
}
