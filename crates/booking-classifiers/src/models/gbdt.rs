use std::path::Path;

use anyhow::{Context, Result};
use gbdt::decision_tree::{Data, DataVec};
use gbdt::gradient_boost::GBDT;
use serde::Deserialize;

use crate::models::classifier_trait::ClassifierModel;
use crate::preprocessing::FeatureVector;

/// The part of a saved model's config that fixes its input width.
#[derive(Deserialize)]
struct SavedShape {
    conf: SavedConf,
}

#[derive(Deserialize)]
struct SavedConf {
    feature_size: usize,
}

/// Gradient Boosting Decision Tree (GBDT) classifier
pub struct GBDTClassifier {
    model: GBDT,
    feature_size: usize,
}

impl GBDTClassifier {
    /// Wrap a trained model that expects `feature_size` input columns.
    pub fn new(model: GBDT, feature_size: usize) -> Self {
        GBDTClassifier {
            model,
            feature_size,
        }
    }

    /// Load a model written by `GBDT::save_model`.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read GBDT model: {}", path.display()))?;
        let shape: SavedShape = serde_json::from_str(&content)
            .with_context(|| format!("GBDT model has no feature size: {}", path.display()))?;
        let model: GBDT = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse GBDT model: {}", path.display()))?;
        log::debug!(
            "Loaded GBDT model from {} ({} features)",
            path.display(),
            shape.conf.feature_size
        );
        Ok(Self::new(model, shape.conf.feature_size))
    }
}

impl ClassifierModel for GBDTClassifier {
    fn n_features(&self) -> Option<usize> {
        Some(self.feature_size)
    }

    fn predict_proba(&self, x: &FeatureVector) -> f64 {
        let row: Vec<f32> = x.values().iter().map(|&v| v as f32).collect();
        let test_x: DataVec = vec![Data::new_test_data(row, None)];
        let predictions = self.model.predict(&test_x);
        predictions.first().copied().unwrap_or(0.0) as f64
    }

    fn name(&self) -> &str {
        "gbdt"
    }
}
