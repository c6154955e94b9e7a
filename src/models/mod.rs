//! Classifier loading and inference components

pub mod classifier;
pub mod forest;
pub mod inference;
pub mod loader;
pub mod onnx;

pub use classifier::Classifier;
pub use inference::{PredictionError, Predictor};
pub use loader::{LoadedModel, ModelError, ModelLoader};
