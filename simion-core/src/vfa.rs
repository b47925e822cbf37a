//! Linear value-function approximation over the global state feature map.
use crate::{
    config::param_or_default,
    deferred_load::{DeferredLoad, DeferredLoadContext, Shared},
    error::SimionError,
    feature_map::{FeatureList, FeatureMap},
    named_var_set::State,
};
use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Configuration of [`LinearStateVfa`].
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone, Default)]
pub struct LinearStateVfaConfig {
    /// Initial value of every weight.
    #[serde(rename = "Init-Value", default)]
    pub init_value: Option<f64>,
}

impl LinearStateVfaConfig {
    /// Sets the initial value of the weights.
    pub fn init_value(mut self, v: f64) -> Self {
        self.init_value = Some(v);
        self
    }
}

/// `V(s) = w . phi(s)` with an optional frozen copy of `w`.
///
/// When target-function freezing is enabled, bootstrapped targets are computed
/// with the frozen weights, which only follow the live weights when
/// [`LinearStateVfa::update_frozen_weights`] is called.
pub struct LinearStateVfa {
    feature_map: Shared<FeatureMap>,
    init_value: f64,
    freeze: bool,
    weights: Vec<f64>,
    frozen_weights: Option<Vec<f64>>,
}

impl LinearStateVfa {
    /// Creates the approximator. Weights are allocated in the deferred load step.
    pub fn build(config: &LinearStateVfaConfig, feature_map: Shared<FeatureMap>, freeze: bool) -> Self {
        Self {
            feature_map,
            init_value: param_or_default(config.init_value, "V-Function", "Init-Value", 0.0),
            freeze,
            weights: Vec::new(),
            frozen_weights: None,
        }
    }

    /// Fails if the weights have not been allocated yet.
    pub fn check_loaded(&self) -> Result<()> {
        match self.weights.is_empty() {
            true => Err(SimionError::NotLoaded("Value function").into()),
            false => Ok(()),
        }
    }

    /// The number of weights, equal to the output size of the feature map.
    pub fn num_weights(&self) -> usize {
        self.weights.len()
    }

    /// The live weights.
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// Computes the features of `s` with the global state feature map.
    pub fn get_features(&self, s: &State, out: &mut FeatureList) -> Result<()> {
        self.feature_map.borrow().get_features(s, out)
    }

    /// Value with the live weights.
    pub fn get_value(&self, features: &FeatureList) -> f64 {
        Self::dot(&self.weights, features)
    }

    /// Value with the frozen weights, or the live ones when freezing is off.
    pub fn get_frozen_value(&self, features: &FeatureList) -> f64 {
        match &self.frozen_weights {
            Some(w) => Self::dot(w, features),
            None => self.get_value(features),
        }
    }

    /// `w += factor * features`.
    pub fn add(&mut self, features: &FeatureList, factor: f64) {
        for f in features.iter() {
            self.weights[f.index] += factor * f.factor;
        }
    }

    /// Copies the live weights into the frozen ones.
    pub fn update_frozen_weights(&mut self) {
        if let Some(frozen) = self.frozen_weights.as_mut() {
            frozen.copy_from_slice(&self.weights);
        }
    }

    fn dot(w: &[f64], features: &FeatureList) -> f64 {
        features.iter().map(|f| w[f.index] * f.factor).sum()
    }
}

impl DeferredLoad for LinearStateVfa {
    fn deferred_load_step(&mut self, _ctx: &DeferredLoadContext) -> Result<()> {
        let n = self.feature_map.borrow().num_features()?;
        self.weights = vec![self.init_value; n];
        if self.freeze {
            self.frozen_weights = Some(self.weights.clone());
        }
        Ok(())
    }
}
