//! Classifier artifact loader

use crate::models::classifier::Classifier;
use crate::models::forest::ForestClassifier;
use crate::models::onnx::OnnxClassifier;
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

/// Startup failure while loading the classifier artifact
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("Model file not found. Please ensure '{}' exists.", .path.display())]
    NotFound { path: PathBuf },

    #[error("Unsupported model format for '{}' (expected .onnx or .json)", .path.display())]
    UnsupportedFormat { path: PathBuf },

    #[error("Model file '{}' could not be loaded: {reason}", .path.display())]
    Corrupt { path: PathBuf, reason: String },
}

/// Artifact format, chosen by file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelFormat {
    Onnx,
    Json,
}

impl ModelFormat {
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?.to_ascii_lowercase();
        match extension.as_str() {
            "onnx" => Some(Self::Onnx),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

impl fmt::Display for ModelFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Onnx => write!(f, "onnx"),
            Self::Json => write!(f, "json"),
        }
    }
}

/// Classifier loaded once at startup and never reloaded
pub struct LoadedModel {
    /// Artifact path
    pub path: PathBuf,
    /// Artifact format
    pub format: ModelFormat,
    /// The classifier itself
    pub classifier: Box<dyn Classifier>,
}

impl fmt::Debug for LoadedModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoadedModel")
            .field("path", &self.path)
            .field("format", &self.format)
            .field("classifier", &self.classifier.name())
            .field("probability", &self.classifier.supports_probability())
            .finish()
    }
}

/// Loader for classifier artifacts
pub struct ModelLoader {
    /// Number of threads for ONNX inference
    onnx_threads: usize,
}

impl ModelLoader {
    /// Create a new model loader with default settings (1 thread)
    pub fn new() -> Self {
        Self::with_threads(1)
    }

    /// Create a new model loader with specified number of ONNX threads
    pub fn with_threads(onnx_threads: usize) -> Self {
        Self {
            onnx_threads: onnx_threads.max(1),
        }
    }

    /// Load the classifier at `path`. Any failure is fatal for startup.
    pub fn load<P: AsRef<Path>>(&self, path: P) -> Result<LoadedModel, ModelError> {
        let path = path.as_ref();

        if !path.is_file() {
            return Err(ModelError::NotFound {
                path: path.to_path_buf(),
            });
        }

        let format = ModelFormat::from_path(path).ok_or_else(|| ModelError::UnsupportedFormat {
            path: path.to_path_buf(),
        })?;

        let classifier: Box<dyn Classifier> = match format {
            ModelFormat::Onnx => Box::new(
                OnnxClassifier::load(path, self.onnx_threads).map_err(|e| corrupt(path, e))?,
            ),
            ModelFormat::Json => {
                Box::new(ForestClassifier::load(path).map_err(|e| corrupt(path, e))?)
            }
        };

        info!(
            model = %classifier.name(),
            format = %format,
            probability = classifier.supports_probability(),
            "Classifier ready"
        );

        Ok(LoadedModel {
            path: path.to_path_buf(),
            format,
            classifier,
        })
    }
}

impl Default for ModelLoader {
    fn default() -> Self {
        Self::new()
    }
}

fn corrupt(path: &Path, error: anyhow::Error) -> ModelError {
    ModelError::Corrupt {
        path: path.to_path_buf(),
        reason: format!("{:#}", error),
    }
}
