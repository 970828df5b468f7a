use std::path::Path;

use anyhow::Result;

use crate::config::ModelType;
use crate::models::classifier_trait::ClassifierModel;
use crate::models::gbdt::GBDTClassifier;
use crate::models::mlp::MlpClassifier;

/// Load a boxed classifier of `model_type` from `path`.
pub fn load_model<P: AsRef<Path>>(model_type: ModelType, path: P) -> Result<Box<dyn ClassifierModel>> {
    match model_type {
        ModelType::Mlp => Ok(Box::new(MlpClassifier::load(path)?)),
        ModelType::Gbdt => Ok(Box::new(GBDTClassifier::load(path)?)),
    }
}
