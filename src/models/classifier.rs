//! Classifier capability consumed by the predictor

use crate::feature_extractor::FeatureRecord;
use anyhow::{bail, Result};

/// A frozen, pre-trained binary classifier.
///
/// `predict` is required. Probability estimates are optional: implementors
/// that can produce them override both `supports_probability` and
/// `predict_proba`. The predictor checks the capability once, when it is
/// constructed.
pub trait Classifier: Send + Sync {
    /// Short identifier for logs and the health endpoint
    fn name(&self) -> &str;

    /// Decision function: `true` for the positive (placed) class
    fn predict(&self, record: &FeatureRecord) -> Result<bool>;

    /// Whether `predict_proba` is available
    fn supports_probability(&self) -> bool {
        false
    }

    /// Per-class probabilities `[p_negative, p_positive]`
    fn predict_proba(&self, _record: &FeatureRecord) -> Result<[f64; 2]> {
        bail!("{} does not expose class probabilities", self.name())
    }

    /// Label and probabilities together. Backends that compute both in one
    /// pass override this so each submission is evaluated once.
    fn predict_with_proba(&self, record: &FeatureRecord) -> Result<(bool, [f64; 2])> {
        Ok((self.predict(record)?, self.predict_proba(record)?))
    }
}

/// Map a raw class index onto the binary label.
pub(crate) fn label_from_class(class: i64) -> Result<bool> {
    match class {
        0 => Ok(false),
        1 => Ok(true),
        other => bail!("Unexpected class label {} (expected 0 or 1)", other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct LabelOnly;

    impl Classifier for LabelOnly {
        fn name(&self) -> &str {
            "label-only"
        }

        fn predict(&self, _record: &FeatureRecord) -> Result<bool> {
            Ok(true)
        }
    }

    #[test]
    fn test_probability_is_optional() {
        let record = crate::feature_extractor::FeatureExtractor::new()
            .extract(&crate::types::StudentProfile::default());
        let classifier = LabelOnly;

        assert!(!classifier.supports_probability());
        let err = classifier.predict_proba(&record).unwrap_err();
        assert!(err.to_string().contains("label-only"));
    }

    #[test]
    fn test_combined_call_requires_probability() {
        let record = crate::feature_extractor::FeatureExtractor::new()
            .extract(&crate::types::StudentProfile::default());
        assert!(LabelOnly.predict_with_proba(&record).is_err());
    }

    #[test]
    fn test_label_from_class() {
        assert!(!label_from_class(0).unwrap());
        assert!(label_from_class(1).unwrap());
        assert!(label_from_class(2).is_err());
    }
}
