//! Cart-pole balancing.
use super::{RewardComponent, World};
use crate::{
    experiment::Experiment,
    named_var_set::{Action, Descriptor, State},
};
use anyhow::Result;
use rand::{rngs::StdRng, Rng};
use std::rc::Rc;

const GRAVITY: f64 = 9.8;
const MASS_CART: f64 = 1.0;
const MASS_POLE: f64 = 0.1;
const TOTAL_MASS: f64 = MASS_CART + MASS_POLE;
const HALF_LENGTH: f64 = 0.5;
const POLE_MASS_LENGTH: f64 = MASS_POLE * HALF_LENGTH;
const FOUR_THIRDS: f64 = 4.0 / 3.0;

const MAX_X: f64 = 2.4;
const MAX_THETA: f64 = 0.2094384;

/// A pole hinged on a cart moving along a track, pushed by a horizontal force.
///
/// State variables are `x`, `x_dot`, `theta` and `theta_dot`, the action is `force`.
pub struct BalancingPole {
    state_descriptor: Rc<Descriptor>,
    action_descriptor: Rc<Descriptor>,
    x: usize,
    x_dot: usize,
    theta: usize,
    theta_dot: usize,
    force: usize,
    reward: BalancingPoleReward,
}

impl BalancingPole {
    /// Declares the variables of the world.
    pub fn new() -> Result<Self> {
        let mut sd = Descriptor::new();
        let x = sd.add_var("x", "m", -3.0, 3.0)?;
        let x_dot = sd.add_var("x_dot", "m/s", -1.0, 1.0)?;
        let theta = sd.add_var("theta", "rad", -0.22, 0.22)?;
        let theta_dot = sd.add_var("theta_dot", "rad/s", -1.0, 1.0)?;
        let mut ad = Descriptor::new();
        let force = ad.add_var("force", "N", -10.0, 10.0)?;

        Ok(Self {
            state_descriptor: Rc::new(sd),
            action_descriptor: Rc::new(ad),
            x,
            x_dot,
            theta,
            theta_dot,
            force,
            reward: BalancingPoleReward,
        })
    }
}

impl World for BalancingPole {
    fn state_descriptor(&self) -> &Rc<Descriptor> {
        &self.state_descriptor
    }

    fn action_descriptor(&self) -> &Rc<Descriptor> {
        &self.action_descriptor
    }

    fn reset(&mut self, s: &mut State, experiment: &Experiment, rng: &mut StdRng) -> Result<()> {
        if experiment.is_evaluation_episode() {
            s.set_by_index(self.theta, -0.1);
            s.set_by_index(self.theta_dot, -0.01);
            s.set_by_index(self.x, 0.0);
            s.set_by_index(self.x_dot, 0.0);
        } else {
            s.set_by_index(self.theta, rng.gen_range(-0.2..0.2));
            s.set_by_index(self.theta_dot, rng.gen_range(-0.05..0.05));
            s.set_by_index(self.x, rng.gen_range(-0.5..0.5));
            s.set_by_index(self.x_dot, rng.gen_range(-0.1..0.1));
        }
        Ok(())
    }

    fn execute_action(&mut self, s: &mut State, a: &Action, dt: f64) -> Result<()> {
        let force = a.get_by_index(self.force);
        let x = s.get_by_index(self.x);
        let x_dot = s.get_by_index(self.x_dot);
        let theta = s.get_by_index(self.theta);
        let theta_dot = s.get_by_index(self.theta_dot);
        let (sin, cos) = theta.sin_cos();

        let temp = (force + POLE_MASS_LENGTH * theta_dot * theta_dot * sin) / TOTAL_MASS;
        let theta_acc = (GRAVITY * sin - cos * temp)
            / (HALF_LENGTH * (FOUR_THIRDS - MASS_POLE * cos * cos / TOTAL_MASS));
        let x_acc = temp - POLE_MASS_LENGTH * theta_acc * cos / TOTAL_MASS;

        // Euler
        s.set_by_index(self.x, x + x_dot * dt);
        s.set_by_index(self.x_dot, x_dot + x_acc * dt);
        s.set_by_index(self.theta, theta + theta_dot * dt);
        s.set_by_index(self.theta_dot, theta_dot + theta_acc * dt);
        Ok(())
    }

    fn reward(
        &self,
        s: &State,
        a: &Action,
        s_p: &State,
        experiment: &mut Experiment,
    ) -> Result<f64> {
        self.reward.reward(s, a, s_p, experiment)
    }
}

/// -1 and a terminal state when the cart leaves the track or the pole falls, 0 otherwise.
pub struct BalancingPoleReward;

impl RewardComponent for BalancingPoleReward {
    fn reward(
        &self,
        _s: &State,
        _a: &Action,
        s_p: &State,
        experiment: &mut Experiment,
    ) -> Result<f64> {
        let x = s_p.get("x")?;
        let theta = s_p.get("theta")?;
        if x.abs() > MAX_X || theta.abs() > MAX_THETA {
            experiment.set_terminal_state();
            return Ok(-1.0);
        }
        Ok(0.0)
    }

    fn min(&self) -> f64 {
        -1.0
    }

    fn max(&self) -> f64 {
        0.0
    }
}
