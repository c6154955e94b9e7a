//! Placement predictor: runs the loaded classifier on one feature record

use crate::feature_extractor::FeatureRecord;
use crate::models::classifier::Classifier;
use crate::models::loader::LoadedModel;
use crate::types::prediction::{ConfidenceSource, PredictionResult};
use anyhow::{ensure, Result};
use thiserror::Error;
use tracing::{debug, error, info};

/// Confidence shown for a positive label when the classifier has no probabilities
pub const FALLBACK_POSITIVE_PERCENT: f64 = 85.0;
/// Confidence shown for a negative label when the classifier has no probabilities
pub const FALLBACK_NEGATIVE_PERCENT: f64 = 25.0;

/// Non-fatal failure of a single prediction; the form stays usable.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("Error making prediction: {message}")]
pub struct PredictionError {
    pub message: String,
}

/// Wraps the process-wide classifier. Built once at startup, read-only after.
pub struct Predictor {
    classifier: Box<dyn Classifier>,
    /// Capability checked once at construction
    probability: bool,
}

impl Predictor {
    /// Create a predictor from a loaded artifact
    pub fn new(model: LoadedModel) -> Self {
        Self::from_classifier(model.classifier)
    }

    /// Create a predictor from any classifier (stubs included)
    pub fn from_classifier(classifier: Box<dyn Classifier>) -> Self {
        let probability = classifier.supports_probability();
        info!(
            model = %classifier.name(),
            probability,
            "Predictor initialized"
        );
        Self {
            classifier,
            probability,
        }
    }

    /// Name of the underlying classifier
    pub fn model_name(&self) -> &str {
        self.classifier.name()
    }

    /// Whether confidence comes from the model rather than the fallback table
    pub fn supports_probability(&self) -> bool {
        self.probability
    }

    /// Run the decision function and, when available, the probability function.
    pub fn predict(&self, record: &FeatureRecord) -> Result<PredictionResult, PredictionError> {
        match self.try_predict(record) {
            Ok(result) => {
                debug!(
                    model = %self.classifier.name(),
                    label = result.label,
                    probability_percent = result.probability_percent,
                    source = ?result.source,
                    "Prediction complete"
                );
                Ok(result)
            }
            Err(e) => {
                error!(model = %self.classifier.name(), error = %e, "Inference failed");
                Err(PredictionError {
                    message: format!("{:#}", e),
                })
            }
        }
    }

    fn try_predict(&self, record: &FeatureRecord) -> Result<PredictionResult> {
        if !self.probability {
            let label = self.classifier.predict(record)?;
            return Ok(PredictionResult {
                label,
                probability_percent: fallback_percent(label),
                source: ConfidenceSource::Fallback,
            });
        }

        let (label, [_, positive]) = self.classifier.predict_with_proba(record)?;
        ensure!(
            positive.is_finite() && (0.0..=1.0).contains(&positive),
            "Classifier returned invalid probability {}",
            positive
        );

        Ok(PredictionResult {
            label,
            probability_percent: positive * 100.0,
            source: ConfidenceSource::Model,
        })
    }
}

/// Placeholder confidence for classifiers without probability output
pub fn fallback_percent(label: bool) -> f64 {
    if label {
        FALLBACK_POSITIVE_PERCENT
    } else {
        FALLBACK_NEGATIVE_PERCENT
    }
}
