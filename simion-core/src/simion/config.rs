//! Configuration of simions.
use crate::critic::CriticConfig;
use serde::{Deserialize, Serialize};

/// Learning rule of a [`GaussianPolicy`](super::GaussianPolicy).
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone, Copy)]
pub enum PolicyLearner {
    /// Policy-gradient step scaled by the TD error.
    #[serde(rename = "Regular-Gradient")]
    RegularGradient,

    /// Moves the mean towards the taken action when the TD error is positive.
    #[serde(rename = "CACLA")]
    Cacla,
}

/// Configuration of a [`GaussianPolicy`](super::GaussianPolicy).
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct PolicyConfig {
    /// Name of the action variable written by the policy.
    #[serde(rename = "Output-Action")]
    pub output_action: String,

    /// Standard deviation of the exploration noise.
    #[serde(rename = "Sigma", default)]
    pub sigma: Option<f64>,

    /// Learning rate.
    #[serde(rename = "Alpha", default)]
    pub alpha: Option<f64>,

    /// Learning rule.
    #[serde(rename = "Learner", default)]
    pub learner: Option<PolicyLearner>,

    /// Initial value of the weights of the mean.
    #[serde(rename = "Init-Value", default)]
    pub init_value: Option<f64>,
}

impl PolicyConfig {
    /// A policy writing `output_action` with default parameters.
    pub fn new(output_action: impl Into<String>) -> Self {
        Self {
            output_action: output_action.into(),
            sigma: None,
            alpha: None,
            learner: None,
            init_value: None,
        }
    }

    /// Sets the exploration width.
    pub fn sigma(mut self, v: f64) -> Self {
        self.sigma = Some(v);
        self
    }

    /// Sets the learning rate.
    pub fn alpha(mut self, v: f64) -> Self {
        self.alpha = Some(v);
        self
    }

    /// Sets the learning rule.
    pub fn learner(mut self, v: PolicyLearner) -> Self {
        self.learner = Some(v);
        self
    }

    /// Sets the initial value of the weights of the mean.
    pub fn init_value(mut self, v: f64) -> Self {
        self.init_value = Some(v);
        self
    }
}

/// Configuration of an [`ActorCritic`](super::ActorCritic) simion.
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone, Default)]
pub struct ActorCriticConfig {
    /// Value-function learner.
    #[serde(rename = "Critic")]
    pub critic: CriticConfig,

    /// One policy per controlled action variable.
    #[serde(rename = "Actor")]
    pub actor: Vec<PolicyConfig>,
}

/// One term of a linear feedback law.
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct GainConfig {
    /// State variable.
    #[serde(rename = "Variable")]
    pub variable: String,

    /// Gain applied to the variable.
    #[serde(rename = "Gain")]
    pub gain: f64,
}

/// Configuration of a [`Controller`](super::Controller) simion.
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct ControllerConfig {
    /// Name of the action variable written by the controller.
    #[serde(rename = "Output-Action")]
    pub output_action: String,

    /// Terms of the feedback law.
    #[serde(rename = "Gains", default)]
    pub gains: Vec<GainConfig>,
}

impl ControllerConfig {
    /// A controller writing `output_action` with no gains.
    pub fn new(output_action: impl Into<String>) -> Self {
        Self {
            output_action: output_action.into(),
            gains: Vec::new(),
        }
    }

    /// Adds a term `gain * variable` to the feedback law.
    pub fn gain(mut self, variable: impl Into<String>, gain: f64) -> Self {
        self.gains.push(GainConfig {
            variable: variable.into(),
            gain,
        });
        self
    }
}

/// Choice of simion.
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
#[serde(tag = "Type")]
pub enum SimionConfig {
    /// A learning actor-critic agent.
    #[serde(rename = "Actor-Critic")]
    ActorCritic(ActorCriticConfig),

    /// A fixed feedback controller.
    #[serde(rename = "Controller")]
    Controller(ControllerConfig),
}
