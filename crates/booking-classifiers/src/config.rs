use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Central configuration for serving predictions.
#[derive(Deserialize, Serialize, Debug, Clone, Default)]
#[serde(default)]
pub struct ServeConfig {
    pub artifacts: ArtifactPaths,
    pub model_type: ModelType,
    pub scaling: ScalingMode,
    pub one_hot_drop: OneHotDrop,
}

/// Locations of the trained artifacts.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ArtifactPaths {
    pub model: PathBuf,
    pub scaler: PathBuf,
    pub label_encoders: PathBuf,
    pub selected_features: PathBuf,
}

impl Default for ArtifactPaths {
    fn default() -> Self {
        Self {
            model: PathBuf::from("models/mlp_model.json"),
            scaler: PathBuf::from("models/scaler.json"),
            label_encoders: PathBuf::from("models/label_encoders.json"),
            selected_features: PathBuf::from("models/selected_features.json"),
        }
    }
}

impl ArtifactPaths {
    /// Resolve relative paths against `base`.
    pub fn relative_to(&self, base: &Path) -> Self {
        let join = |p: &PathBuf| {
            if p.is_absolute() {
                p.clone()
            } else {
                base.join(p)
            }
        };
        Self {
            model: join(&self.model),
            scaler: join(&self.scaler),
            label_encoders: join(&self.label_encoders),
            selected_features: join(&self.selected_features),
        }
    }
}

/// Supported classifier artifacts.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ModelType {
    /// Multi-layer perceptron exported as JSON weights.
    #[default]
    Mlp,
    /// Gradient boosted trees in the `gbdt` model format.
    Gbdt,
}

impl FromStr for ModelType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mlp" => Ok(ModelType::Mlp),
            "gbdt" => Ok(ModelType::Gbdt),
            _ => Err(format!(
                "Unknown model type: {}. Supported model types are `mlp` and `gbdt`",
                s
            )),
        }
    }
}

impl ModelType {
    pub fn name(&self) -> &'static str {
        match self {
            ModelType::Mlp => "mlp",
            ModelType::Gbdt => "gbdt",
        }
    }
}

/// Whether the fitted scaler is applied to the aligned feature vector.
///
/// `Skip` replays the legacy service, which returned before scaling.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ScalingMode {
    #[default]
    Apply,
    Skip,
}

/// Reference-level policy for one-hot expansion.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OneHotDrop {
    /// Drop the first sorted level of each column.
    #[default]
    #[serde(rename = "first")]
    DropFirst,
    /// Emit an indicator for every observed level.
    #[serde(rename = "none")]
    KeepAll,
}

/// Load a serving configuration from a JSON file. Relative artifact paths
/// are resolved against the directory holding the configuration.
pub fn load_serve_config<P: AsRef<Path>>(path: P) -> Result<ServeConfig> {
    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read config: {}", path.as_ref().display()))?;
    let mut config: ServeConfig = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse config: {}", path.as_ref().display()))?;
    if let Some(dir) = path.as_ref().parent() {
        config.artifacts = config.artifacts.relative_to(dir);
    }
    Ok(config)
}
