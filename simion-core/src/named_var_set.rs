//! Named variable sets: states and actions.
//!
//! A [`Descriptor`] fixes the ordered schema of the variables of an experiment,
//! and a [`NamedVarSet`] holds one value per declared variable. The order in which
//! variables are declared defines the layout used by feature maps.
use crate::error::SimionError;
use anyhow::Result;
use std::rc::Rc;

/// Declaration of a single variable.
#[derive(Debug, Clone, PartialEq)]
pub struct VarProperties {
    /// Name of the variable, unique within its descriptor.
    pub name: String,

    /// Units, only informative.
    pub units: String,

    /// Lower bound of the value.
    pub min: f64,

    /// Upper bound of the value.
    pub max: f64,
}

impl VarProperties {
    /// Width of the value range.
    pub fn range_width(&self) -> f64 {
        self.max - self.min
    }
}

/// Ordered schema of named variables.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Descriptor {
    vars: Vec<VarProperties>,
}

impl Descriptor {
    /// Creates an empty descriptor.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares a new variable and returns its index.
    pub fn add_var(
        &mut self,
        name: impl Into<String>,
        units: impl Into<String>,
        min: f64,
        max: f64,
    ) -> Result<usize> {
        let name = name.into();
        if self.vars.iter().any(|v| v.name == name) {
            return Err(SimionError::DuplicateVariable(name).into());
        }
        if max <= min {
            return Err(SimionError::EmptyRange(name).into());
        }
        self.vars.push(VarProperties {
            name,
            units: units.into(),
            min,
            max,
        });
        Ok(self.vars.len() - 1)
    }

    /// Returns the index of the variable named `name`.
    pub fn index_of(&self, name: &str) -> Result<usize> {
        self.vars
            .iter()
            .position(|v| v.name == name)
            .ok_or_else(|| SimionError::UnknownVariable(name.to_string()).into())
    }

    /// Returns the properties of the i-th variable.
    pub fn properties(&self, i: usize) -> &VarProperties {
        &self.vars[i]
    }

    /// Returns the properties of the variable named `name`.
    pub fn properties_of(&self, name: &str) -> Result<&VarProperties> {
        Ok(&self.vars[self.index_of(name)?])
    }

    /// The number of declared variables.
    pub fn len(&self) -> usize {
        self.vars.len()
    }

    /// Returns `true` if no variable is declared.
    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    /// Iterates over the declarations in order.
    pub fn iter(&self) -> std::slice::Iter<VarProperties> {
        self.vars.iter()
    }
}

/// Values of the variables declared in a shared [`Descriptor`].
///
/// Setting a value clamps it into the declared range.
#[derive(Debug, Clone, PartialEq)]
pub struct NamedVarSet {
    descriptor: Rc<Descriptor>,
    values: Vec<f64>,
}

/// State of a world.
pub type State = NamedVarSet;

/// Action applied to a world.
pub type Action = NamedVarSet;

impl NamedVarSet {
    /// Creates a set with every variable at the middle of its range.
    pub fn new(descriptor: Rc<Descriptor>) -> Self {
        let values = descriptor.iter().map(|v| 0.5 * (v.min + v.max)).collect();
        Self { descriptor, values }
    }

    /// The schema of this set.
    pub fn descriptor(&self) -> &Rc<Descriptor> {
        &self.descriptor
    }

    /// Value of the variable named `name`.
    pub fn get(&self, name: &str) -> Result<f64> {
        Ok(self.values[self.descriptor.index_of(name)?])
    }

    /// Sets the variable named `name`, clamped into its range.
    pub fn set(&mut self, name: &str, value: f64) -> Result<()> {
        let i = self.descriptor.index_of(name)?;
        self.set_by_index(i, value);
        Ok(())
    }

    /// Value of the i-th variable.
    #[inline]
    pub fn get_by_index(&self, i: usize) -> f64 {
        self.values[i]
    }

    /// Sets the i-th variable, clamped into its range.
    #[inline]
    pub fn set_by_index(&mut self, i: usize, value: f64) {
        let p = self.descriptor.properties(i);
        self.values[i] = value.clamp(p.min, p.max);
    }

    /// Value of the i-th variable scaled to `[0, 1]` over its range.
    pub fn get_normalized(&self, i: usize) -> f64 {
        let p = self.descriptor.properties(i);
        (self.values[i] - p.min) / p.range_width()
    }

    /// Copies the values of `other`, which must share the schema.
    pub fn copy_from(&mut self, other: &NamedVarSet) {
        debug_assert_eq!(self.values.len(), other.values.len());
        self.values.copy_from_slice(&other.values);
    }

    /// Raw values in declaration order.
    pub fn values(&self) -> &[f64] {
        &self.values
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptor() -> Result<Rc<Descriptor>> {
        let mut d = Descriptor::new();
        d.add_var("x", "m", -3.0, 3.0)?;
        d.add_var("theta", "rad", -0.22, 0.22)?;
        Ok(Rc::new(d))
    }

    #[test]
    fn test_set_clamps_to_range() -> Result<()> {
        let mut s = NamedVarSet::new(descriptor()?);
        s.set("x", 10.0)?;
        assert_eq!(s.get("x")?, 3.0);
        s.set("theta", -1.0)?;
        assert_eq!(s.get("theta")?, -0.22);
        Ok(())
    }

    #[test]
    fn test_unknown_and_duplicate_variables() -> Result<()> {
        let s = NamedVarSet::new(descriptor()?);
        assert!(s.get("y").is_err());

        let mut d = Descriptor::new();
        d.add_var("x", "m", 0.0, 1.0)?;
        assert!(d.add_var("x", "m", 0.0, 1.0).is_err());
        assert!(d.add_var("y", "m", 1.0, 1.0).is_err());
        Ok(())
    }

    #[test]
    fn test_declaration_order_defines_layout() -> Result<()> {
        let d = descriptor()?;
        assert_eq!(d.index_of("x")?, 0);
        assert_eq!(d.index_of("theta")?, 1);
        let s = NamedVarSet::new(d);
        assert_eq!(s.values(), &[0.0, 0.0]);
        assert_eq!(s.get_normalized(0), 0.5);
        Ok(())
    }
}
