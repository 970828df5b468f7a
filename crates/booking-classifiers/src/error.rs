use std::error::Error;
use std::fmt;

/// Errors raised while turning a booking record into a prediction.
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineError {
    /// A required artifact (the label encoders) was not loaded.
    NotReady(String),
    /// A field is absent or has the wrong type for the stage that consumes it.
    MalformedInput { field: String, reason: String },
    /// The inbound payload is not a JSON object of scalar values.
    InvalidRecord(String),
    /// The feature vector does not match the canonical feature list.
    ColumnMismatch { expected: usize, got: usize },
}

impl PipelineError {
    pub(crate) fn malformed(field: &str, reason: impl Into<String>) -> Self {
        PipelineError::MalformedInput {
            field: field.to_string(),
            reason: reason.into(),
        }
    }

    /// True when the caller sent a bad record, false when the service is at fault.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            PipelineError::MalformedInput { .. } | PipelineError::InvalidRecord(_)
        )
    }
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            PipelineError::NotReady(what) => write!(f, "Pipeline not ready: {}", what),
            PipelineError::MalformedInput { field, reason } => {
                write!(f, "Malformed input for '{}': {}", field, reason)
            }
            PipelineError::InvalidRecord(msg) => write!(f, "Invalid booking record: {}", msg),
            PipelineError::ColumnMismatch { expected, got } => write!(
                f,
                "Feature vector does not match the canonical feature list: expected {} columns, got {}",
                expected, got
            ),
        }
    }
}

impl Error for PipelineError {}
