//! Type definitions for the placement predictor

pub mod prediction;
pub mod profile;

pub use prediction::{ConfidenceSource, PredictionResult};
pub use profile::{ProfileError, StudentProfile};
