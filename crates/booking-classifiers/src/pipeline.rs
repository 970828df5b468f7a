//! End-to-end inference: raw booking record in, cancellation prediction out.
use std::fmt;
use std::sync::Arc;

use anyhow::Result;
use rayon::prelude::*;

use crate::artifacts::ArtifactStore;
use crate::config::{OneHotDrop, ScalingMode, ServeConfig};
use crate::error::PipelineError;
use crate::preprocessing::{
    align, apply_defaults, check_alignment, encode_categoricals, engineer_features, FeatureVector,
};
use crate::record::RawRecord;
use crate::response::{Prediction, PredictionResponse};

/// Replays the training-time transformation over an injected artifact store.
///
/// A pipeline holds no per-request state: every call builds a fresh feature
/// vector, so the same record always yields the same vector and prediction.
#[derive(Clone)]
pub struct Pipeline {
    store: Arc<ArtifactStore>,
    scaling: ScalingMode,
    one_hot_drop: OneHotDrop,
}

impl Pipeline {
    pub fn new(store: Arc<ArtifactStore>) -> Self {
        Self {
            store,
            scaling: ScalingMode::default(),
            one_hot_drop: OneHotDrop::default(),
        }
    }

    pub fn with_scaling(mut self, scaling: ScalingMode) -> Self {
        if scaling == ScalingMode::Skip {
            log::warn!(
                "Numerical scaling is disabled; feature vectors reach the classifier unscaled"
            );
        }
        self.scaling = scaling;
        self
    }

    pub fn with_one_hot_drop(mut self, drop: OneHotDrop) -> Self {
        self.one_hot_drop = drop;
        self
    }

    /// Load the artifacts named in `config` and build a pipeline over them.
    pub fn from_config(config: &ServeConfig) -> Result<Self> {
        let store = ArtifactStore::load(&config.artifacts, config.model_type)?;
        Ok(Self::new(Arc::new(store))
            .with_scaling(config.scaling)
            .with_one_hot_drop(config.one_hot_drop))
    }

    pub fn store(&self) -> &ArtifactStore {
        &self.store
    }

    /// Turn a raw record into the aligned, scaled feature vector.
    pub fn transform(&self, record: &RawRecord) -> Result<FeatureVector, PipelineError> {
        let record = apply_defaults(record.clone());
        let record = engineer_features(record)?;
        let frame = encode_categoricals(&record, self.store.encoders(), self.one_hot_drop)?;
        let mut vector = align(&frame, self.store.layout());
        if self.scaling == ScalingMode::Apply {
            self.store.scaler().transform(&mut vector);
        }
        log::trace!("Feature vector: {:?}", vector.values());
        Ok(vector)
    }

    pub fn predict(&self, record: &RawRecord) -> Result<Prediction, PipelineError> {
        let vector = self.transform(record)?;
        check_alignment(&vector, self.store.layout())?;
        let prediction = self.store.classifier().predict(&vector);
        log::debug!(
            "{} predicted {:?} (p = {:.4})",
            self.store.classifier().name(),
            prediction.class,
            prediction.probability
        );
        Ok(prediction)
    }

    /// Prediction in the serving response shape.
    pub fn respond(&self, record: &RawRecord) -> Result<PredictionResponse, PipelineError> {
        self.predict(record).map(PredictionResponse::from)
    }

    /// Score independent records in parallel. Output order follows input
    /// order and every entry equals what [`Pipeline::respond`] returns for
    /// that record alone.
    pub fn predict_batch(&self, records: &[RawRecord]) -> Vec<Result<PredictionResponse, PipelineError>> {
        records.par_iter().map(|record| self.respond(record)).collect()
    }

    /// Feature vectors for independent records, in input order.
    pub fn transform_batch(&self, records: &[RawRecord]) -> Vec<Result<FeatureVector, PipelineError>> {
        records.par_iter().map(|record| self.transform(record)).collect()
    }
}

impl fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pipeline")
            .field("store", &self.store)
            .field("scaling", &self.scaling)
            .field("one_hot_drop", &self.one_hot_drop)
            .finish()
    }
}
