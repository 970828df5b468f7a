//! booking-classifiers: cancellation predictions for hotel bookings.
//!
//! This crate replays, at inference time, the feature transformation a
//! cancellation classifier was trained with: training-time defaults, derived
//! features, label and one-hot encoding, alignment to the trained feature
//! list, and standard scaling. Trained artifacts (classifier, scaler, label
//! encoders, feature list) are loaded once into an [`artifacts::ArtifactStore`]
//! and injected into a [`pipeline::Pipeline`].
pub mod artifacts;
pub mod config;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod preprocessing;
pub mod record;
pub mod response;

pub use artifacts::ArtifactStore;
pub use error::PipelineError;
pub use pipeline::Pipeline;
pub use record::{FieldValue, RawRecord};
pub use response::{CancellationClass, Prediction, PredictionResponse};
