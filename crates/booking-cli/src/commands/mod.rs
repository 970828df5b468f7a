pub mod features;
pub mod input;
pub mod predict;
