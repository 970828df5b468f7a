use crate::preprocessing::FeatureVector;
use crate::response::Prediction;

/// A trained binary classifier replayed at inference time. Implementations
/// are read-only after loading and shared across concurrent requests.
pub trait ClassifierModel: Send + Sync {
    /// Number of input features the model was trained on, when it records it.
    fn n_features(&self) -> Option<usize> {
        None
    }

    /// Probability of the canceled class for one aligned feature vector.
    fn predict_proba(&self, x: &FeatureVector) -> f64;

    /// Thresholded class label.
    fn predict(&self, x: &FeatureVector) -> Prediction {
        Prediction::from_probability(self.predict_proba(x))
    }

    /// Optional human readable name for the model
    fn name(&self) -> &str {
        "classifier"
    }
}
