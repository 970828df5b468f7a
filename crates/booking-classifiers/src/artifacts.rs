//! The artifact store: every trained object the pipeline replays.
//!
//! The store is built once before the first request and is read-only
//! afterwards. It can be loaded from disk with [`ArtifactStore::load`] or
//! assembled from in-memory parts with [`ArtifactStore::new`].
use std::fmt;
use std::io::ErrorKind;
use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};

use crate::config::{ArtifactPaths, ModelType};
use crate::models::factory::load_model;
use crate::models::ClassifierModel;
use crate::preprocessing::{FeatureLayout, LabelEncoderSet, Scaler, ScalerParams};

pub struct ArtifactStore {
    classifier: Box<dyn ClassifierModel>,
    scaler: Scaler,
    encoders: Option<LabelEncoderSet>,
    layout: Arc<FeatureLayout>,
}

impl ArtifactStore {
    /// Assemble a store, validating that the parts agree on the feature list.
    pub fn new(
        layout: FeatureLayout,
        scaler: &ScalerParams,
        encoders: Option<LabelEncoderSet>,
        classifier: Box<dyn ClassifierModel>,
    ) -> Result<Self> {
        let scaler = Scaler::resolve(scaler, &layout).context("Scaler does not fit the feature list")?;

        if let Some(n) = classifier.n_features() {
            if n != layout.len() {
                bail!(
                    "{} classifier expects {} features but the feature list has {}",
                    classifier.name(),
                    n,
                    layout.len()
                );
            }
        }
        if let Some(set) = &encoders {
            set.ensure_complete()?;
        }

        Ok(Self {
            classifier,
            scaler,
            encoders,
            layout: Arc::new(layout),
        })
    }

    /// Load every artifact named in `paths`. The classifier, scaler and
    /// feature list are mandatory; a missing encoder file only disables
    /// prediction until encoders are provided.
    pub fn load(paths: &ArtifactPaths, model_type: ModelType) -> Result<Self> {
        let layout = FeatureLayout::from_path(&paths.selected_features)?;
        let scaler = ScalerParams::from_path(&paths.scaler)?;
        let classifier = load_model(model_type, &paths.model)?;
        let encoders = load_optional_encoders(&paths.label_encoders)?;

        let store = Self::new(layout, &scaler, encoders, classifier)?;
        log::info!(
            "Loaded {} classifier with {} features ({} scaled, encoders {})",
            store.classifier.name(),
            store.layout.len(),
            store.scaler.len(),
            if store.encoders.is_some() { "loaded" } else { "missing" }
        );
        Ok(store)
    }

    pub fn classifier(&self) -> &dyn ClassifierModel {
        self.classifier.as_ref()
    }

    pub fn scaler(&self) -> &Scaler {
        &self.scaler
    }

    pub fn encoders(&self) -> Option<&LabelEncoderSet> {
        self.encoders.as_ref()
    }

    pub fn layout(&self) -> &Arc<FeatureLayout> {
        &self.layout
    }
}

impl fmt::Debug for ArtifactStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArtifactStore")
            .field("classifier", &self.classifier.name())
            .field("features", &self.layout.len())
            .field("scaled_columns", &self.scaler.len())
            .field("encoders", &self.encoders.as_ref().map(|e| e.len()))
            .finish()
    }
}

fn load_optional_encoders(path: &Path) -> Result<Option<LabelEncoderSet>> {
    match std::fs::metadata(path) {
        Ok(_) => Ok(Some(LabelEncoderSet::from_path(path)?)),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            log::warn!(
                "Label encoders not found at {}; predictions will fail until they are provided",
                path.display()
            );
            Ok(None)
        }
        Err(e) => Err(e).with_context(|| format!("Failed to access label encoders: {}", path.display())),
    }
}
