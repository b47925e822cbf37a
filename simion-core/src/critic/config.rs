//! Configuration of the critics.
use crate::vfa::LinearStateVfaConfig;
use serde::{Deserialize, Serialize};

/// Configuration of [`ETraces`](super::ETraces).
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone, Default)]
pub struct ETracesConfig {
    /// Decay factor of the traces.
    #[serde(rename = "Lambda", default)]
    pub lambda: Option<f64>,

    /// Traces below this value are dropped.
    #[serde(rename = "Threshold", default)]
    pub threshold: Option<f64>,

    /// Replacing traces instead of accumulating ones.
    #[serde(rename = "Replace", default)]
    pub replace: Option<bool>,
}

impl ETracesConfig {
    /// Sets the decay factor.
    pub fn lambda(mut self, v: f64) -> Self {
        self.lambda = Some(v);
        self
    }

    /// Sets the pruning threshold.
    pub fn threshold(mut self, v: f64) -> Self {
        self.threshold = Some(v);
        self
    }

    /// Uses replacing traces.
    pub fn replace(mut self, v: bool) -> Self {
        self.replace = Some(v);
        self
    }
}

/// Configuration of [`TdLambdaCritic`](super::TdLambdaCritic).
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone, Default)]
pub struct TdLambdaConfig {
    /// Learning rate.
    #[serde(rename = "Alpha", default)]
    pub alpha: Option<f64>,

    /// Eligibility traces.
    #[serde(rename = "E-Traces", default)]
    pub e_traces: ETracesConfig,

    /// The learned V-function.
    #[serde(rename = "V-Function", default)]
    pub v_function: LinearStateVfaConfig,
}

impl TdLambdaConfig {
    /// Sets the learning rate.
    pub fn alpha(mut self, v: f64) -> Self {
        self.alpha = Some(v);
        self
    }

    /// Sets the eligibility traces.
    pub fn e_traces(mut self, v: ETracesConfig) -> Self {
        self.e_traces = v;
        self
    }

    /// Sets the V-function.
    pub fn v_function(mut self, v: LinearStateVfaConfig) -> Self {
        self.v_function = v;
        self
    }
}

/// Configuration of [`TrueOnlineTdLambdaCritic`](super::TrueOnlineTdLambdaCritic).
pub type TrueOnlineTdLambdaConfig = TdLambdaConfig;

/// Configuration of [`TdcLambdaCritic`](super::TdcLambdaCritic).
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone, Default)]
pub struct TdcLambdaConfig {
    /// Learning rate of the V-function weights.
    #[serde(rename = "Alpha", default)]
    pub alpha: Option<f64>,

    /// Learning rate of the correction weights.
    #[serde(rename = "Beta", default)]
    pub beta: Option<f64>,

    /// Eligibility traces.
    #[serde(rename = "E-Traces", default)]
    pub e_traces: ETracesConfig,

    /// The learned V-function.
    #[serde(rename = "V-Function", default)]
    pub v_function: LinearStateVfaConfig,
}

impl TdcLambdaConfig {
    /// Sets the learning rate of the V-function weights.
    pub fn alpha(mut self, v: f64) -> Self {
        self.alpha = Some(v);
        self
    }

    /// Sets the learning rate of the correction weights.
    pub fn beta(mut self, v: f64) -> Self {
        self.beta = Some(v);
        self
    }

    /// Sets the eligibility traces.
    pub fn e_traces(mut self, v: ETracesConfig) -> Self {
        self.e_traces = v;
        self
    }

    /// Sets the V-function.
    pub fn v_function(mut self, v: LinearStateVfaConfig) -> Self {
        self.v_function = v;
        self
    }
}

/// Choice of critic.
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
#[serde(tag = "Type")]
pub enum CriticConfig {
    /// TD(lambda) with accumulating or replacing traces.
    #[serde(rename = "TD-Lambda")]
    TdLambda(TdLambdaConfig),

    /// True online TD(lambda) with dutch traces.
    #[serde(rename = "True-Online-TD-Lambda")]
    TrueOnlineTdLambda(TrueOnlineTdLambdaConfig),

    /// TDC(lambda), gradient-corrected TD for off-policy learning.
    #[serde(rename = "TDC-Lambda")]
    TdcLambda(TdcLambdaConfig),
}

impl Default for CriticConfig {
    fn default() -> Self {
        Self::TdLambda(TdLambdaConfig::default())
    }
}
