//! Feature reconstruction stages, in the order the pipeline runs them:
//! defaults → derived features → categorical encoding → column alignment →
//! scaling.
pub mod alignment;
pub mod defaults;
pub mod encoding;
pub mod features;
pub mod scaling;

pub use alignment::{align, check_alignment, FeatureLayout, FeatureVector};
pub use defaults::apply_defaults;
pub use encoding::{encode_categoricals, EncodedFrame, LabelEncoder, LabelEncoderSet};
pub use features::engineer_features;
pub use scaling::{Scaler, ScalerParams};
