//! Configuration of [`FeatureMap`](super::FeatureMap).
use serde::{Deserialize, Serialize};

/// Parameters shared by the grid-shaped feature maps.
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone, Default)]
pub struct GridConfig {
    /// Names of the variables covered by the grid, in layout order.
    #[serde(rename = "Variables", default)]
    pub variables: Vec<String>,

    /// Number of features per variable.
    #[serde(rename = "Num-Features", default)]
    pub num_features: Option<usize>,
}

/// Choice of feature map.
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
#[serde(tag = "Type")]
pub enum FeatureMapConfig {
    /// Gaussian radial basis functions centered on a regular grid.
    #[serde(rename = "Gaussian-RBF-Grid")]
    GaussianRbfGrid(GridConfig),

    /// One-hot encoding of the cell of a regular grid.
    #[serde(rename = "Discrete-Grid")]
    DiscreteGrid(GridConfig),
}

impl Default for FeatureMapConfig {
    /// A map over no variable, which outputs a single constant feature.
    fn default() -> Self {
        Self::GaussianRbfGrid(GridConfig::default())
    }
}

impl FeatureMapConfig {
    /// Gaussian RBF grid over `variables` with `num_features` centers each.
    pub fn gaussian_rbf_grid(variables: &[&str], num_features: usize) -> Self {
        Self::GaussianRbfGrid(GridConfig {
            variables: variables.iter().map(|v| v.to_string()).collect(),
            num_features: Some(num_features),
        })
    }

    /// Discrete grid over `variables` with `num_features` cells each.
    pub fn discrete_grid(variables: &[&str], num_features: usize) -> Self {
        Self::DiscreteGrid(GridConfig {
            variables: variables.iter().map(|v| v.to_string()).collect(),
            num_features: Some(num_features),
        })
    }

    pub(super) fn grid(&self) -> &GridConfig {
        match self {
            Self::GaussianRbfGrid(c) | Self::DiscreteGrid(c) => c,
        }
    }
}
