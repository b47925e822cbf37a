//! Feature maps: from named variables to sparse feature vectors.
//!
//! A [`FeatureMap`] is configured with the names of the variables it covers, but
//! its layout (value ranges and output dimensionality) depends on the descriptors
//! of the world. The layout is resolved in the deferred load step, so every map
//! must be registered in a [`DeferredLoadRegistry`](crate::DeferredLoadRegistry)
//! before it is used.
mod config;
mod feature_list;
use crate::{
    config::param_or_default,
    deferred_load::{DeferredLoad, DeferredLoadContext},
    error::SimionError,
    named_var_set::{Descriptor, NamedVarSet},
};
use anyhow::{Context, Result};
pub use config::{FeatureMapConfig, GridConfig};
pub use feature_list::{Feature, FeatureList};
use log::debug;

/// Number of RBF centers evaluated on each side of the nearest one. Near the
/// edges of the grid the window shifts inward and keeps its width.
const RBF_NEIGHBOURS: usize = 1;

/// Variables a feature map reads from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeatureMapKind {
    /// Maps states.
    State,

    /// Maps actions.
    Action,
}

#[derive(Debug, Clone)]
struct GridDimension {
    var: usize,
    min: f64,
    max: f64,
    n: usize,
}

impl GridDimension {
    fn step(&self) -> f64 {
        (self.max - self.min) / (self.n - 1) as f64
    }

    fn center(&self, k: usize) -> f64 {
        self.min + k as f64 * self.step()
    }

    /// Gaussian activations of the centers around `x`, normalized.
    fn rbf(&self, x: f64, out: &mut FeatureList) {
        out.clear();
        let step = self.step();
        let nearest = (((x - self.min) / step).round().max(0.0) as usize).min(self.n - 1);
        let window = (2 * RBF_NEIGHBOURS + 1).min(self.n);
        let lo = nearest.saturating_sub(RBF_NEIGHBOURS).min(self.n - window);
        for k in lo..lo + window {
            let u = (x - self.center(k)) / step;
            out.add(k, (-u * u).exp());
        }
        out.normalize();
    }

    fn cell(&self, x: f64) -> usize {
        let u = (x - self.min) / (self.max - self.min);
        ((u * self.n as f64).max(0.0) as usize).min(self.n - 1)
    }
}

#[derive(Debug, Clone)]
struct GridLayout {
    dims: Vec<GridDimension>,
    num_features: usize,
}

/// A feature map over state or action variables.
#[derive(Debug)]
pub struct FeatureMap {
    kind: FeatureMapKind,
    config: FeatureMapConfig,
    layout: Option<GridLayout>,
}

impl FeatureMap {
    /// Creates a feature map whose layout is resolved in the deferred load step.
    pub fn build(kind: FeatureMapKind, config: FeatureMapConfig) -> Self {
        Self {
            kind,
            config,
            layout: None,
        }
    }

    /// Variables this map reads from.
    pub fn kind(&self) -> FeatureMapKind {
        self.kind
    }

    /// Returns `true` once the layout has been resolved.
    pub fn is_loaded(&self) -> bool {
        self.layout.is_some()
    }

    fn layout(&self) -> Result<&GridLayout> {
        self.layout
            .as_ref()
            .ok_or_else(|| SimionError::NotLoaded("Feature map").into())
    }

    /// Output dimensionality of the map.
    pub fn num_features(&self) -> Result<usize> {
        Ok(self.layout()?.num_features)
    }

    /// Computes the active features of `vars` into `out`.
    pub fn get_features(&self, vars: &NamedVarSet, out: &mut FeatureList) -> Result<()> {
        let layout = self.layout()?;
        let mut stride = 1;
        match &self.config {
            FeatureMapConfig::GaussianRbfGrid(_) => {
                out.clear();
                out.add(0, 1.0);
                let mut dim_features = FeatureList::new();
                for dim in layout.dims.iter() {
                    dim.rbf(vars.get_by_index(dim.var), &mut dim_features);
                    out.tensor_product(&dim_features, stride);
                    stride *= dim.n;
                }
            }
            FeatureMapConfig::DiscreteGrid(_) => {
                let mut index = 0;
                for dim in layout.dims.iter() {
                    index += dim.cell(vars.get_by_index(dim.var)) * stride;
                    stride *= dim.n;
                }
                out.clear();
                out.add(index, 1.0);
            }
        }
        Ok(())
    }

    fn resolve_layout(&self, descriptor: &Descriptor) -> Result<GridLayout> {
        let grid = self.config.grid();
        let n = param_or_default(grid.num_features, "Feature-Map", "Num-Features", 10);
        let min_n = match self.config {
            FeatureMapConfig::GaussianRbfGrid(_) => 2,
            FeatureMapConfig::DiscreteGrid(_) => 1,
        };
        if n < min_n {
            return Err(SimionError::InvalidConfig(
                "Feature-Map/Num-Features".to_string(),
                format!("at least {} features per variable are required", min_n),
            )
            .into());
        }

        let dims = grid
            .variables
            .iter()
            .map(|name| {
                let var = descriptor
                    .index_of(name)
                    .with_context(|| format!("Feature map over {:?} variables", self.kind))?;
                let p = descriptor.properties(var);
                Ok(GridDimension {
                    var,
                    min: p.min,
                    max: p.max,
                    n,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        let num_features = dims.iter().map(|d| d.n).product();

        Ok(GridLayout { dims, num_features })
    }
}

impl DeferredLoad for FeatureMap {
    fn deferred_load_step(&mut self, ctx: &DeferredLoadContext) -> Result<()> {
        let descriptor = match self.kind {
            FeatureMapKind::State => ctx.state_descriptor,
            FeatureMapKind::Action => ctx.action_descriptor,
        };
        let layout = self.resolve_layout(descriptor)?;
        debug!(
            "{:?} feature map resolved with {} features",
            self.kind, layout.num_features
        );
        self.layout = Some(layout);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    fn descriptor() -> Result<Descriptor> {
        let mut d = Descriptor::new();
        d.add_var("x", "m", -1.0, 1.0)?;
        d.add_var("y", "m", 0.0, 4.0)?;
        Ok(d)
    }

    fn load(map: &mut FeatureMap, d: &Descriptor) -> Result<()> {
        let empty = Descriptor::new();
        let ctx = DeferredLoadContext {
            state_descriptor: d,
            action_descriptor: &empty,
        };
        map.deferred_load_step(&ctx)
    }

    #[test]
    fn test_use_before_load_fails() -> Result<()> {
        let d = Rc::new(descriptor()?);
        let map = FeatureMap::build(
            FeatureMapKind::State,
            FeatureMapConfig::gaussian_rbf_grid(&["x"], 5),
        );
        let mut out = FeatureList::new();
        assert!(map.num_features().is_err());
        assert!(map.get_features(&NamedVarSet::new(d), &mut out).is_err());
        Ok(())
    }

    #[test]
    fn test_rbf_grid_features_are_normalized() -> Result<()> {
        let d = descriptor()?;
        let mut map = FeatureMap::build(
            FeatureMapKind::State,
            FeatureMapConfig::gaussian_rbf_grid(&["x", "y"], 5),
        );
        load(&mut map, &d)?;
        assert_eq!(map.num_features()?, 25);

        let mut s = NamedVarSet::new(Rc::new(d));
        s.set("x", 0.3)?;
        s.set("y", 4.0)?;
        let mut out = FeatureList::new();
        map.get_features(&s, &mut out)?;
        let sum: f64 = out.iter().map(|f| f.factor).sum();
        assert!((sum - 1.0).abs() < 1e-9);
        assert!(out.iter().all(|f| f.index < 25));
        assert_eq!(out.len(), 3 * 3);
        Ok(())
    }

    #[test]
    fn test_rbf_window_at_grid_edges() -> Result<()> {
        let d = descriptor()?;
        let mut map = FeatureMap::build(
            FeatureMapKind::State,
            FeatureMapConfig::gaussian_rbf_grid(&["y"], 5),
        );
        load(&mut map, &d)?;

        let mut s = NamedVarSet::new(Rc::new(d.clone()));
        let mut out = FeatureList::new();
        for (y, centers) in [(0.0, [0, 1, 2]), (0.9, [0, 1, 2]), (4.0, [2, 3, 4])] {
            s.set("y", y)?;
            map.get_features(&s, &mut out)?;
            let active = out.iter().map(|f| f.index).collect::<Vec<_>>();
            assert_eq!(active, centers, "y = {}", y);
        }

        // Grids narrower than the window use every center
        let mut map = FeatureMap::build(
            FeatureMapKind::State,
            FeatureMapConfig::gaussian_rbf_grid(&["y"], 2),
        );
        load(&mut map, &d)?;
        s.set("y", 4.0)?;
        map.get_features(&s, &mut out)?;
        assert_eq!(out.len(), 2);
        Ok(())
    }

    #[test]
    fn test_discrete_grid_is_one_hot() -> Result<()> {
        let d = descriptor()?;
        let mut map = FeatureMap::build(
            FeatureMapKind::State,
            FeatureMapConfig::discrete_grid(&["x", "y"], 4),
        );
        load(&mut map, &d)?;

        let mut s = NamedVarSet::new(Rc::new(d));
        s.set("x", 1.0)?;
        s.set("y", 1.5)?;
        let mut out = FeatureList::new();
        map.get_features(&s, &mut out)?;
        assert_eq!(out.len(), 1);
        assert_eq!(out.get(7), 1.0);
        Ok(())
    }

    #[test]
    fn test_map_without_variables_is_constant() -> Result<()> {
        let d = descriptor()?;
        let mut map = FeatureMap::build(FeatureMapKind::State, FeatureMapConfig::default());
        load(&mut map, &d)?;
        assert_eq!(map.num_features()?, 1);

        let mut out = FeatureList::new();
        map.get_features(&NamedVarSet::new(Rc::new(d)), &mut out)?;
        assert_eq!(out.get(0), 1.0);
        Ok(())
    }

    #[test]
    fn test_unknown_variable_fails_on_load() -> Result<()> {
        let d = descriptor()?;
        let mut map = FeatureMap::build(
            FeatureMapKind::State,
            FeatureMapConfig::gaussian_rbf_grid(&["z"], 5),
        );
        assert!(load(&mut map, &d).is_err());
        Ok(())
    }
}
