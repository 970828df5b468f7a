//! Replay of the fitted standard scaler.
//!
//! The scaler artifact carries per-column mean and scale, optionally with the
//! names of the columns it was fitted on. Names are resolved against the
//! feature layout once, when the artifact is loaded.
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::preprocessing::alignment::{FeatureLayout, FeatureVector};

/// Serialized scaler parameters.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ScalerParams {
    #[serde(alias = "mean_")]
    pub mean: Vec<f64>,
    #[serde(alias = "scale_", alias = "std")]
    pub scale: Vec<f64>,
    /// Columns the scaler was fitted on. When absent the scaler covers the
    /// whole feature layout, in layout order.
    #[serde(default, alias = "feature_names_in_", skip_serializing_if = "Option::is_none")]
    pub feature_names: Option<Vec<String>>,
}

impl ScalerParams {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read scaler: {}", path.as_ref().display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse scaler: {}", path.as_ref().display()))
    }
}

/// Standard scaler bound to layout positions.
#[derive(Clone, Debug)]
pub struct Scaler {
    columns: Vec<usize>,
    mean: Vec<f64>,
    scale: Vec<f64>,
}

impl Scaler {
    /// Minimum scale to avoid division by zero when transforming.
    const MIN_SCALE: f64 = 1e-12;

    /// Bind `params` to the positions of `layout`.
    pub fn resolve(params: &ScalerParams, layout: &FeatureLayout) -> Result<Self> {
        let (mean, scale) = (&params.mean, &params.scale);
        if mean.len() != scale.len() {
            bail!(
                "scaler has {} means but {} scales",
                mean.len(),
                scale.len()
            );
        }
        if let Some(bad) = scale.iter().chain(mean.iter()).find(|v| !v.is_finite()) {
            bail!("scaler parameter {} is not finite", bad);
        }
        if let Some(bad) = scale.iter().find(|s| **s < 0.0) {
            bail!("scaler scale {} is negative", bad);
        }

        let columns = match &params.feature_names {
            Some(names) => {
                if names.len() != mean.len() {
                    bail!(
                        "scaler lists {} feature names for {} parameters",
                        names.len(),
                        mean.len()
                    );
                }
                names
                    .iter()
                    .map(|name| {
                        layout.position(name).with_context(|| {
                            format!("scaler column '{}' is not in the feature list", name)
                        })
                    })
                    .collect::<Result<Vec<_>>>()?
            }
            None => {
                if mean.len() != layout.len() {
                    bail!(
                        "scaler covers {} columns but the feature list has {}",
                        mean.len(),
                        layout.len()
                    );
                }
                (0..layout.len()).collect()
            }
        };

        Ok(Scaler {
            columns,
            mean: mean.clone(),
            scale: scale.iter().map(|s| s.max(Self::MIN_SCALE)).collect(),
        })
    }

    /// Number of columns this scaler rescales.
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Rescale the scaler's columns in place; other columns are untouched.
    pub fn transform(&self, vector: &mut FeatureVector) {
        let values = vector.values_mut();
        for (i, &col) in self.columns.iter().enumerate() {
            values[col] = (values[col] - self.mean[i]) / self.scale[i];
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn layout() -> Arc<FeatureLayout> {
        Arc::new(FeatureLayout::new(vec!["lead_time".into(), "adr".into(), "country_PRT".into()]).unwrap())
    }

    #[test]
    fn named_scaler_touches_only_its_columns() {
        let layout = layout();
        let params = ScalerParams {
            mean: vec![100.0],
            scale: vec![50.0],
            feature_names: Some(vec!["adr".into()]),
        };
        let scaler = Scaler::resolve(&params, &layout).unwrap();

        let mut v = FeatureVector::zeros(Arc::clone(&layout));
        v.values_mut().copy_from_slice(&[7.0, 150.0, 1.0]);
        scaler.transform(&mut v);
        assert_eq!(v.values(), &[7.0, 1.0, 1.0]);
    }

    #[test]
    fn unnamed_scaler_must_cover_the_layout() {
        let params = ScalerParams {
            mean: vec![0.0, 0.0],
            scale: vec![1.0, 1.0],
            feature_names: None,
        };
        assert!(Scaler::resolve(&params, &layout()).is_err());
    }

    #[test]
    fn unknown_scaler_column_is_an_error() {
        let params = ScalerParams {
            mean: vec![0.0],
            scale: vec![1.0],
            feature_names: Some(vec!["babies".into()]),
        };
        let err = Scaler::resolve(&params, &layout()).unwrap_err();
        assert!(format!("{err:#}").contains("babies"));
    }

    #[test]
    fn zero_scale_is_clamped() {
        let layout = layout();
        let params = ScalerParams {
            mean: vec![1.0, 1.0, 1.0],
            scale: vec![0.0, 1.0, 1.0],
            feature_names: None,
        };
        let scaler = Scaler::resolve(&params, &layout).unwrap();
        let mut v = FeatureVector::zeros(layout);
        v.values_mut().copy_from_slice(&[1.0, 3.0, 0.0]);
        scaler.transform(&mut v);
        assert_eq!(v.values(), &[0.0, 2.0, -1.0]);
    }

    #[test]
    fn negative_scale_is_rejected() {
        let params = ScalerParams {
            mean: vec![100.0],
            scale: vec![-50.0],
            feature_names: Some(vec!["adr".into()]),
        };
        let err = Scaler::resolve(&params, &layout()).unwrap_err();
        assert!(format!("{err:#}").contains("negative"), "{err:#}");
    }

    #[test]
    fn sklearn_field_names_are_accepted() {
        let params: ScalerParams = serde_json::from_str(
            r#"{"mean_": [1.0], "scale_": [2.0], "feature_names_in_": ["adr"]}"#,
        )
        .unwrap();
        assert_eq!(params.feature_names.as_deref(), Some(&["adr".to_string()][..]));
    }
}
