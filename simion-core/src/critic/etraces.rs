//! Eligibility traces.
use super::ETracesConfig;
use crate::{config::param_or_default, feature_map::FeatureList};

/// Sparse eligibility traces.
pub struct ETraces {
    lambda: f64,
    threshold: f64,
    replace: bool,
    traces: FeatureList,
}

impl ETraces {
    /// Creates empty traces.
    pub fn build(config: &ETracesConfig) -> Self {
        Self {
            lambda: param_or_default(config.lambda, "E-Traces", "Lambda", 0.9),
            threshold: param_or_default(config.threshold, "E-Traces", "Threshold", 1e-4),
            replace: param_or_default(config.replace, "E-Traces", "Replace", false),
            traces: FeatureList::new(),
        }
    }

    /// Decay factor.
    pub fn lambda(&self) -> f64 {
        self.lambda
    }

    /// Forgets every trace, at the start of an episode.
    pub fn clear(&mut self) {
        self.traces.clear();
    }

    /// Decays the traces by `lambda * gamma` and drops negligible ones.
    pub fn update(&mut self, gamma: f64) {
        self.traces.mult(self.lambda * gamma);
        self.traces.apply_threshold(self.threshold);
    }

    /// Accumulates `factor * features`, or overwrites them with replacing traces.
    pub fn add(&mut self, features: &FeatureList, factor: f64) {
        match self.replace {
            true => features
                .iter()
                .for_each(|f| self.traces.set(f.index, f.factor * factor)),
            false => self.traces.add_feature_list(features, factor),
        }
    }

    /// Current traces.
    pub fn features(&self) -> &FeatureList {
        &self.traces
    }
}
