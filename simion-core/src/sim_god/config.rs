//! Configuration of [`SimGod`](super::SimGod).
use crate::{
    feature_map::FeatureMapConfig, replay_buffer::ExperienceReplayConfig, simion::SimionConfig,
};
use serde::{Deserialize, Serialize};

/// Configuration of [`SimGod`](super::SimGod).
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone, Default)]
pub struct SimGodConfig {
    /// Discount factor. Defaults to 0.9.
    #[serde(rename = "Gamma", default)]
    pub gamma: Option<f64>,

    /// Bootstrapped targets use a frozen copy of the value functions. Defaults to false.
    #[serde(rename = "Freeze-Target-Function", default)]
    pub freeze_target_function: Option<bool>,

    /// Experiment steps between two synchronizations of the frozen copy. Defaults to 100.
    #[serde(rename = "Target-Function-Update-Freq", default)]
    pub target_function_update_freq: Option<usize>,

    /// Critics weight off-policy samples. Defaults to false.
    #[serde(rename = "Use-Importance-Weights", default)]
    pub use_importance_weights: Option<bool>,

    /// Experience replay. Disabled when absent.
    #[serde(rename = "Experience-Replay", default)]
    pub experience_replay: Option<ExperienceReplayConfig>,

    /// Global state feature map.
    #[serde(rename = "State-Feature-Map", default)]
    pub state_feature_map: Option<FeatureMapConfig>,

    /// Global action feature map.
    #[serde(rename = "Action-Feature-Map", default)]
    pub action_feature_map: Option<FeatureMapConfig>,

    /// Simions, in the order their actions are selected and updated.
    #[serde(rename = "Simion", default)]
    pub simions: Vec<SimionConfig>,
}

impl SimGodConfig {
    /// Sets the discount factor.
    pub fn gamma(mut self, v: f64) -> Self {
        self.gamma = Some(v);
        self
    }

    /// Enables or disables target-function freezing.
    pub fn freeze_target_function(mut self, v: bool) -> Self {
        self.freeze_target_function = Some(v);
        self
    }

    /// Sets the synchronization period of the frozen target function.
    pub fn target_function_update_freq(mut self, v: usize) -> Self {
        self.target_function_update_freq = Some(v);
        self
    }

    /// Enables or disables importance weights.
    pub fn use_importance_weights(mut self, v: bool) -> Self {
        self.use_importance_weights = Some(v);
        self
    }

    /// Sets the experience replay buffer.
    pub fn experience_replay(mut self, v: Option<ExperienceReplayConfig>) -> Self {
        self.experience_replay = v;
        self
    }

    /// Sets the global state feature map.
    pub fn state_feature_map(mut self, v: FeatureMapConfig) -> Self {
        self.state_feature_map = Some(v);
        self
    }

    /// Sets the global action feature map.
    pub fn action_feature_map(mut self, v: FeatureMapConfig) -> Self {
        self.action_feature_map = Some(v);
        self
    }

    /// Appends a simion.
    pub fn simion(mut self, v: SimionConfig) -> Self {
        self.simions.push(v);
        self
    }
}
