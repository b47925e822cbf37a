//! Sparse lists of active features.
use std::cmp::Ordering;

/// A single active feature.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Feature {
    /// Index into the output of a feature map.
    pub index: usize,

    /// Activation factor.
    pub factor: f64,
}

/// Sparse vector of `(index, factor)` pairs.
///
/// Indices are unique within a list and the entries are kept sorted by index,
/// so lookups are binary searches and products of two lists are merges.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureList {
    features: Vec<Feature>,
}

impl FeatureList {
    /// Creates an empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Removes all the features.
    pub fn clear(&mut self) {
        self.features.clear();
    }

    /// The number of active features.
    pub fn len(&self) -> usize {
        self.features.len()
    }

    /// Returns `true` if there is no active feature.
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Iterates over the active features.
    pub fn iter(&self) -> std::slice::Iter<Feature> {
        self.features.iter()
    }

    fn position(&self, index: usize) -> std::result::Result<usize, usize> {
        self.features.binary_search_by_key(&index, |f| f.index)
    }

    /// Adds `factor` to the feature `index`, inserting it if not present.
    pub fn add(&mut self, index: usize, factor: f64) {
        match self.position(index) {
            Ok(i) => self.features[i].factor += factor,
            Err(i) => self.features.insert(i, Feature { index, factor }),
        }
    }

    /// Sets the feature `index` to `factor`, inserting it if not present.
    pub fn set(&mut self, index: usize, factor: f64) {
        match self.position(index) {
            Ok(i) => self.features[i].factor = factor,
            Err(i) => self.features.insert(i, Feature { index, factor }),
        }
    }

    /// Factor of the feature `index`, zero when not active.
    pub fn get(&self, index: usize) -> f64 {
        self.position(index).map_or(0.0, |i| self.features[i].factor)
    }

    /// Multiplies every factor by `factor`.
    pub fn mult(&mut self, factor: f64) {
        self.features.iter_mut().for_each(|f| f.factor *= factor);
    }

    /// Adds `factor * other` to this list.
    pub fn add_feature_list(&mut self, other: &FeatureList, factor: f64) {
        let mut merged = Vec::with_capacity(self.len() + other.len());
        let (mut i, mut j) = (0, 0);
        loop {
            match (self.features.get(i), other.features.get(j)) {
                (Some(f), Some(g)) if f.index == g.index => {
                    merged.push(Feature {
                        index: f.index,
                        factor: f.factor + g.factor * factor,
                    });
                    i += 1;
                    j += 1;
                }
                (Some(f), Some(g)) if f.index < g.index => {
                    merged.push(*f);
                    i += 1;
                }
                (Some(f), None) => {
                    merged.push(*f);
                    i += 1;
                }
                (_, Some(g)) => {
                    merged.push(Feature {
                        index: g.index,
                        factor: g.factor * factor,
                    });
                    j += 1;
                }
                (None, None) => break,
            }
        }
        self.features = merged;
    }

    /// Dot product of two sparse lists.
    pub fn inner_product(&self, other: &FeatureList) -> f64 {
        let (mut i, mut j) = (0, 0);
        let mut sum = 0.0;
        while i < self.len() && j < other.len() {
            let (f, g) = (&self.features[i], &other.features[j]);
            match f.index.cmp(&g.index) {
                Ordering::Less => i += 1,
                Ordering::Greater => j += 1,
                Ordering::Equal => {
                    sum += f.factor * g.factor;
                    i += 1;
                    j += 1;
                }
            }
        }
        sum
    }

    /// Removes the features whose absolute factor is below `threshold`.
    pub fn apply_threshold(&mut self, threshold: f64) {
        self.features.retain(|f| f.factor.abs() >= threshold);
    }

    /// Scales the factors so that they sum up to one.
    ///
    /// Lists summing to zero are left untouched.
    pub fn normalize(&mut self) {
        let sum: f64 = self.features.iter().map(|f| f.factor).sum();
        if sum != 0.0 {
            self.mult(1.0 / sum);
        }
    }

    /// Replaces the content with the tensor product of `self` and `other`.
    ///
    /// The index of a joint feature is `i + j * stride`, where `i` comes from
    /// `self` and `j` from `other`. Every index of `self` must be below `stride`.
    pub fn tensor_product(&mut self, other: &FeatureList, stride: usize) {
        let mut joint = Vec::with_capacity(self.len() * other.len());
        for g in other.iter() {
            for f in self.features.iter() {
                joint.push(Feature {
                    index: f.index + g.index * stride,
                    factor: f.factor * g.factor,
                });
            }
        }
        self.features = joint;
    }
}
