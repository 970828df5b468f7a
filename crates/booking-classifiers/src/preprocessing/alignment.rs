//! Canonical feature layout and column alignment.
//!
//! The classifier only understands vectors whose columns are exactly the
//! training feature list, in training order. `FeatureLayout` precomputes the
//! name → position table once; `align` projects an encoded frame onto it.
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};

use crate::error::PipelineError;
use crate::preprocessing::encoding::EncodedFrame;

/// Ordered feature names the classifier was trained on.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureLayout {
    names: Vec<String>,
    positions: HashMap<String, usize>,
}

impl FeatureLayout {
    pub fn new(names: Vec<String>) -> Result<Self> {
        if names.is_empty() {
            bail!("feature list is empty");
        }
        let mut positions = HashMap::with_capacity(names.len());
        for (idx, name) in names.iter().enumerate() {
            if positions.insert(name.clone(), idx).is_some() {
                bail!("feature '{}' appears more than once in the feature list", name);
            }
        }
        Ok(Self { names, positions })
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let names: Vec<String> =
            serde_json::from_str(json).context("Feature list must be a JSON array of strings")?;
        Self::new(names)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read feature list: {}", path.as_ref().display()))?;
        Self::from_json_str(&content)
            .with_context(|| format!("Invalid feature list: {}", path.as_ref().display()))
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.positions.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// One booking as the classifier sees it: a value per canonical column.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector {
    layout: Arc<FeatureLayout>,
    values: Vec<f64>,
}

impl FeatureVector {
    pub fn zeros(layout: Arc<FeatureLayout>) -> Self {
        let values = vec![0.0; layout.len()];
        Self { layout, values }
    }

    pub fn layout(&self) -> &FeatureLayout {
        &self.layout
    }

    pub fn columns(&self) -> &[String] {
        self.layout.names()
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub(crate) fn values_mut(&mut self) -> &mut [f64] {
        &mut self.values
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.layout.position(name).map(|idx| self.values[idx])
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.layout
            .names()
            .iter()
            .map(String::as_str)
            .zip(self.values.iter().copied())
    }
}

/// Project `frame` onto `layout`: missing columns become 0, extras are dropped,
/// order is the layout's.
pub fn align(frame: &EncodedFrame, layout: &Arc<FeatureLayout>) -> FeatureVector {
    let mut vector = FeatureVector::zeros(Arc::clone(layout));
    let mut dropped = Vec::new();

    for (name, &value) in frame {
        match layout.position(name) {
            Some(idx) => vector.values[idx] = value,
            None => dropped.push(name.as_str()),
        }
    }

    if !dropped.is_empty() {
        log::debug!("Dropped {} columns unknown to the model: {:?}", dropped.len(), dropped);
    }
    log::trace!(
        "Aligned {} of {} canonical columns from the encoded frame",
        frame.len() - dropped.len(),
        layout.len()
    );

    vector
}

/// Check that `vector` is laid out exactly as `layout`.
pub fn check_alignment(vector: &FeatureVector, layout: &FeatureLayout) -> Result<(), PipelineError> {
    if vector.values.len() != layout.len() || vector.columns() != layout.names() {
        return Err(PipelineError::ColumnMismatch {
            expected: layout.len(),
            got: vector.values.len(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout(names: &[&str]) -> Arc<FeatureLayout> {
        Arc::new(FeatureLayout::new(names.iter().map(|s| s.to_string()).collect()).unwrap())
    }

    #[test]
    fn duplicate_feature_names_are_rejected() {
        assert!(FeatureLayout::new(vec!["a".into(), "b".into(), "a".into()]).is_err());
        assert!(FeatureLayout::new(vec![]).is_err());
    }

    #[test]
    fn align_fills_drops_and_orders() {
        let layout = layout(&["lead_time", "country_GBR", "adr"]);
        let mut frame = EncodedFrame::new();
        frame.insert("adr".into(), 99.0);
        frame.insert("lead_time".into(), 12.0);
        frame.insert("agent_10.0".into(), 1.0);

        let vector = align(&frame, &layout);
        assert_eq!(vector.columns(), layout.names());
        assert_eq!(vector.values(), &[12.0, 0.0, 99.0]);
        assert_eq!(vector.get("agent_10.0"), None);
        assert!(check_alignment(&vector, &layout).is_ok());
    }

    #[test]
    fn mismatched_layout_is_reported() {
        let vector = FeatureVector::zeros(layout(&["a", "b"]));
        let other = layout(&["b", "a"]);
        assert!(matches!(
            check_alignment(&vector, &other),
            Err(PipelineError::ColumnMismatch { expected: 2, got: 2 })
        ));
    }
}
