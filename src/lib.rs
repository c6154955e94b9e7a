//! Student Placement Predictor Library
//!
//! Collects six attributes of a student through a web form, runs a
//! pre-trained binary classifier on them and explains the verdict with
//! rule-based strengths, weaknesses and recommendations.

pub mod assessment;
pub mod charts;
pub mod config;
pub mod feature_extractor;
pub mod insights;
pub mod metrics;
pub mod models;
pub mod server;
pub mod types;

pub use assessment::{assess, Assessment};
pub use config::AppConfig;
pub use feature_extractor::FeatureExtractor;
pub use models::inference::Predictor;
pub use models::loader::ModelLoader;
pub use types::{prediction::PredictionResult, profile::StudentProfile};
