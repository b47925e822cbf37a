//! Values handed down by [`SimGod`](crate::SimGod) to the components it drives.
use crate::{
    deferred_load::{DeferredLoadRegistry, Shared},
    feature_map::FeatureMap,
};

/// Shared objects available while building critics, policies and simions.
pub struct BuildContext<'a> {
    /// Global state feature map.
    pub state_feature_map: Shared<FeatureMap>,

    /// Global action feature map.
    pub action_feature_map: Shared<FeatureMap>,

    /// Whether value functions keep a frozen copy of their weights.
    pub freeze_target_function: bool,

    /// Where components register their deferred load steps.
    pub registry: &'a mut DeferredLoadRegistry,

    seed: u64,
}

impl<'a> BuildContext<'a> {
    /// Creates a context. Seeds handed out by [`BuildContext::next_seed`] start at `seed`.
    pub fn new(
        state_feature_map: Shared<FeatureMap>,
        action_feature_map: Shared<FeatureMap>,
        freeze_target_function: bool,
        registry: &'a mut DeferredLoadRegistry,
        seed: u64,
    ) -> Self {
        Self {
            state_feature_map,
            action_feature_map,
            freeze_target_function,
            registry,
            seed,
        }
    }

    /// A distinct seed for each random component.
    pub fn next_seed(&mut self) -> u64 {
        self.seed = self.seed.wrapping_add(1);
        self.seed
    }
}

/// Global values of the current simulation step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepContext {
    /// Discount factor.
    pub gamma: f64,

    /// Whether sample importance weights are used.
    pub use_importance_weights: bool,

    /// Whether frozen weights must be synchronized in this update.
    pub update_frozen_weights_now: bool,

    /// Whether the current episode is an evaluation episode.
    pub is_evaluation: bool,

    /// Whether the update comes from experience replay.
    pub replaying: bool,

    /// Whether the transition is the first one of an episode. Eligibility
    /// traces are cleared on it. Always false for replayed transitions.
    pub is_first_step: bool,
}

impl Default for StepContext {
    fn default() -> Self {
        Self {
            gamma: 0.9,
            use_importance_weights: false,
            update_frozen_weights_now: false,
            is_evaluation: false,
            replaying: false,
            is_first_step: false,
        }
    }
}
