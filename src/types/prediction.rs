//! Prediction result data structures

use serde::{Deserialize, Serialize};

/// Where the confidence percentage came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceSource {
    /// Positive-class probability reported by the classifier
    Model,
    /// Fixed placeholder used when the classifier has no probability output
    Fallback,
}

/// Verdict for a single submission. Never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    /// True when the student is predicted to be placed
    pub label: bool,
    /// Placement probability as a percentage (0.0 - 100.0)
    pub probability_percent: f64,
    /// Origin of `probability_percent`
    pub source: ConfidenceSource,
}

impl PredictionResult {
    /// Headline shown in the verdict block
    pub fn headline(&self) -> &'static str {
        if self.label {
            "LIKELY TO BE PLACED"
        } else {
            "NEEDS IMPROVEMENT"
        }
    }

    /// Explanatory sentence shown under the headline
    pub fn summary(&self) -> &'static str {
        if self.label {
            "Based on the provided academic profile, the student has a high probability of securing a placement."
        } else {
            "The student may need to focus on improving certain areas to increase placement chances."
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verdict_copy() {
        let placed = PredictionResult {
            label: true,
            probability_percent: 91.0,
            source: ConfidenceSource::Model,
        };
        assert_eq!(placed.headline(), "LIKELY TO BE PLACED");

        let not_placed = PredictionResult {
            label: false,
            probability_percent: 25.0,
            source: ConfidenceSource::Fallback,
        };
        assert_eq!(not_placed.headline(), "NEEDS IMPROVEMENT");
    }

    #[test]
    fn test_serialization() {
        let result = PredictionResult {
            label: true,
            probability_percent: 85.0,
            source: ConfidenceSource::Fallback,
        };

        let json = serde_json::to_string(&result).unwrap();
        assert!(json.contains("\"source\":\"fallback\""));
        let deserialized: PredictionResult = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, result);
    }
}
