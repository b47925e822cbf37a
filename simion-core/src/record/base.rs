//! Key-value records.
use crate::error::SimionError;
use chrono::prelude::{DateTime, Local};
use std::collections::{
    hash_map::{Iter, Keys},
    HashMap,
};

/// A value stored in a [`Record`].
#[derive(Debug, Clone, PartialEq)]
pub enum RecordValue {
    /// A single value, such as a reward or a counter.
    Scalar(f64),

    /// A timestamp.
    DateTime(DateTime<Local>),

    /// A 1-dimensional array, such as a state.
    Array1(Vec<f64>),

    /// A text value.
    String(String),
}

impl RecordValue {
    /// Textual form of the value, used by file-based recorders.
    pub fn to_text(&self) -> String {
        match self {
            Self::Scalar(v) => v.to_string(),
            Self::DateTime(t) => t.to_rfc3339(),
            Self::Array1(v) => v
                .iter()
                .map(|x| x.to_string())
                .collect::<Vec<_>>()
                .join(" "),
            Self::String(s) => s.clone(),
        }
    }
}

/// String-keyed collection of [`RecordValue`]s.
#[derive(Debug, Clone, Default)]
pub struct Record(HashMap<String, RecordValue>);

impl Record {
    /// Creates an empty record.
    pub fn empty() -> Self {
        Self(HashMap::new())
    }

    /// Creates a record containing a single scalar.
    pub fn from_scalar(name: impl Into<String>, value: f64) -> Self {
        Self(HashMap::from([(name.into(), RecordValue::Scalar(value))]))
    }

    /// Creates a record from key-value pairs.
    pub fn from_slice<K: Into<String> + Clone>(s: &[(K, RecordValue)]) -> Self {
        Self(
            s.iter()
                .map(|(k, v)| (k.clone().into(), v.clone()))
                .collect(),
        )
    }

    /// Keys of the record.
    pub fn keys(&self) -> Keys<String, RecordValue> {
        self.0.keys()
    }

    /// Inserts a value, replacing any value with the same key.
    pub fn insert(&mut self, k: impl Into<String>, v: RecordValue) {
        self.0.insert(k.into(), v);
    }

    /// Iterates over the key-value pairs.
    pub fn iter(&self) -> Iter<'_, String, RecordValue> {
        self.0.iter()
    }

    /// The value of key `k`.
    pub fn get(&self, k: &str) -> Option<&RecordValue> {
        self.0.get(k)
    }

    /// Merges two records. Values of `record` win on duplicate keys.
    pub fn merge(self, record: Record) -> Self {
        Record(self.0.into_iter().chain(record.0).collect())
    }

    /// Gets a scalar.
    pub fn get_scalar(&self, k: &str) -> Result<f64, SimionError> {
        match self.0.get(k) {
            Some(RecordValue::Scalar(v)) => Ok(*v),
            Some(_) => Err(SimionError::RecordValueTypeError("Scalar".to_string())),
            None => Err(SimionError::RecordKeyError(k.to_string())),
        }
    }

    /// Gets a 1-dimensional array.
    pub fn get_array1(&self, k: &str) -> Result<Vec<f64>, SimionError> {
        match self.0.get(k) {
            Some(RecordValue::Array1(v)) => Ok(v.clone()),
            Some(_) => Err(SimionError::RecordValueTypeError("Array1".to_string())),
            None => Err(SimionError::RecordKeyError(k.to_string())),
        }
    }

    /// Gets a string.
    pub fn get_string(&self, k: &str) -> Result<String, SimionError> {
        match self.0.get(k) {
            Some(RecordValue::String(s)) => Ok(s.clone()),
            Some(_) => Err(SimionError::RecordValueTypeError("String".to_string())),
            None => Err(SimionError::RecordKeyError(k.to_string())),
        }
    }

    /// Whether the record holds no value.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
