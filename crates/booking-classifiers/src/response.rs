//! Prediction results and the JSON shapes returned to callers.
use serde::{Deserialize, Serialize};

use crate::error::PipelineError;

/// Probability above which a booking is classified as canceled.
pub const DECISION_THRESHOLD: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CancellationClass {
    NotCanceled = 0,
    Canceled = 1,
}

impl CancellationClass {
    pub fn label(self) -> u8 {
        self as u8
    }

    pub fn description(self) -> &'static str {
        match self {
            CancellationClass::Canceled => "Booking Likely to be Canceled",
            CancellationClass::NotCanceled => "Booking Likely to be Not Canceled",
        }
    }
}

/// Output of one classifier call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prediction {
    pub class: CancellationClass,
    /// Probability of the canceled class.
    pub probability: f64,
}

impl Prediction {
    pub fn from_probability(probability: f64) -> Self {
        let class = if probability > DECISION_THRESHOLD {
            CancellationClass::Canceled
        } else {
            CancellationClass::NotCanceled
        };
        Self { class, probability }
    }
}

/// `{"prediction": 0|1, "result": "..."}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredictionResponse {
    pub prediction: u8,
    pub result: String,
}

impl From<Prediction> for PredictionResponse {
    fn from(p: Prediction) -> Self {
        Self {
            prediction: p.class.label(),
            result: p.class.description().to_string(),
        }
    }
}

/// `{"error": "..."}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl From<&PipelineError> for ErrorResponse {
    fn from(e: &PipelineError) -> Self {
        Self {
            error: e.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn threshold_is_strict() {
        assert_eq!(Prediction::from_probability(0.5).class, CancellationClass::NotCanceled);
        assert_eq!(Prediction::from_probability(0.51).class, CancellationClass::Canceled);
    }

    #[test]
    fn response_strings_match_the_class() {
        let canceled = PredictionResponse::from(Prediction::from_probability(0.9));
        assert_eq!(canceled.prediction, 1);
        assert_eq!(canceled.result, "Booking Likely to be Canceled");

        let kept = PredictionResponse::from(Prediction::from_probability(0.1));
        assert_eq!(kept.prediction, 0);
        assert_eq!(kept.result, "Booking Likely to be Not Canceled");
        assert_eq!(
            serde_json::to_string(&kept).unwrap(),
            r#"{"prediction":0,"result":"Booking Likely to be Not Canceled"}"#
        );
    }
}
