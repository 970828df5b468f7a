//! Raw booking records as they arrive at the serving boundary.
//!
//! A record is a flat mapping from field name to a scalar. JSON `null` and an
//! absent key are both treated as "missing" by every stage.
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::PipelineError;

/// A single scalar value of a booking record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Int(i64),
    Float(f64),
    Text(String),
    Flag(bool),
}

impl FieldValue {
    /// Numeric view of the value. Strings are never coerced.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            FieldValue::Int(v) => Some(*v as f64),
            FieldValue::Float(v) => Some(*v),
            FieldValue::Flag(b) => Some(if *b { 1.0 } else { 0.0 }),
            FieldValue::Text(_) => None,
        }
    }

    /// Category label of the value, rendered the way the training frame
    /// rendered it.
    pub fn category(&self) -> String {
        match self {
            FieldValue::Text(s) => s.clone(),
            FieldValue::Int(v) => v.to_string(),
            FieldValue::Float(v) => format_float(*v),
            FieldValue::Flag(true) => "True".to_string(),
            FieldValue::Flag(false) => "False".to_string(),
        }
    }
}

impl From<i64> for FieldValue {
    fn from(v: i64) -> Self {
        FieldValue::Int(v)
    }
}

impl From<i32> for FieldValue {
    fn from(v: i32) -> Self {
        FieldValue::Int(v as i64)
    }
}

impl From<f64> for FieldValue {
    fn from(v: f64) -> Self {
        FieldValue::Float(v)
    }
}

impl From<bool> for FieldValue {
    fn from(v: bool) -> Self {
        FieldValue::Flag(v)
    }
}

impl From<&str> for FieldValue {
    fn from(v: &str) -> Self {
        FieldValue::Text(v.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(v: String) -> Self {
        FieldValue::Text(v)
    }
}

/// One booking, keyed by field name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawRecord {
    fields: BTreeMap<String, Option<FieldValue>>,
}

impl RawRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert, handy for tests and fixtures.
    pub fn with(mut self, field: &str, value: impl Into<FieldValue>) -> Self {
        self.insert(field, value);
        self
    }

    /// Builder-style explicit `null`.
    pub fn with_null(mut self, field: &str) -> Self {
        self.fields.insert(field.to_string(), None);
        self
    }

    pub fn insert(&mut self, field: &str, value: impl Into<FieldValue>) {
        self.fields.insert(field.to_string(), Some(value.into()));
    }

    /// Present, non-null value of `field`.
    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.fields.get(field).and_then(|v| v.as_ref())
    }

    pub fn is_missing(&self, field: &str) -> bool {
        self.get(field).is_none()
    }

    pub fn remove(&mut self, field: &str) -> Option<FieldValue> {
        self.fields.remove(field).flatten()
    }

    /// Iterate over present, non-null fields in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields
            .iter()
            .filter_map(|(k, v)| v.as_ref().map(|v| (k.as_str(), v)))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Parse a record from a JSON object of scalars.
    pub fn from_json(json: &str) -> Result<Self, PipelineError> {
        serde_json::from_str(json).map_err(|e| PipelineError::InvalidRecord(e.to_string()))
    }

    /// Convert an already-parsed JSON value into a record.
    pub fn from_value(value: serde_json::Value) -> Result<Self, PipelineError> {
        if !value.is_object() {
            return Err(PipelineError::InvalidRecord(format!(
                "expected a JSON object, got {}",
                value
            )));
        }
        serde_json::from_value(value).map_err(|e| PipelineError::InvalidRecord(e.to_string()))
    }
}

/// Render a float the way the training frame printed floats: integral values
/// keep a trailing `.0` (`9.0`), everything else uses the shortest round-trip
/// form.
pub(crate) fn format_float(v: f64) -> String {
    if v.is_nan() {
        "nan".to_string()
    } else if v.is_infinite() {
        if v > 0.0 { "inf".to_string() } else { "-inf".to_string() }
    } else if v.fract() == 0.0 && v.abs() < 1e16 {
        format!("{:.1}", v)
    } else {
        format!("{}", v)
    }
}
