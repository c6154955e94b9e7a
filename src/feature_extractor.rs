//! Feature extraction for placement model inference.
//!
//! The record layout must match the column order the classifier was
//! trained on. ONNX artifacts carry no column names, so a mismatch is not
//! detected at runtime.

use crate::types::profile::StudentProfile;

/// Number of model input features
pub const FEATURE_COUNT: usize = 6;

/// Column names in training order
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "IQ",
    "Prev_Sem_Result",
    "Academic_Performance",
    "Internship_Experience",
    "Communication_Skills",
    "Projects_Completed",
];

/// One row of model input, in training column order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureRecord {
    values: [f32; FEATURE_COUNT],
}

impl FeatureRecord {
    /// Values in column order
    pub fn values(&self) -> &[f32; FEATURE_COUNT] {
        &self.values
    }

    /// Value of a named column
    pub fn get(&self, name: &str) -> Option<f32> {
        FEATURE_NAMES
            .iter()
            .position(|&n| n == name)
            .map(|i| self.values[i])
    }

    /// (name, value) pairs in column order
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, f32)> + '_ {
        FEATURE_NAMES.iter().copied().zip(self.values.iter().copied())
    }
}

/// Turns a student profile into the classifier's input record.
pub struct FeatureExtractor;

impl FeatureExtractor {
    /// Create a new feature extractor.
    pub fn new() -> Self {
        Self
    }

    /// Build the input record. Internship experience is encoded as 1/0.
    pub fn extract(&self, profile: &StudentProfile) -> FeatureRecord {
        FeatureRecord {
            values: [
                profile.iq() as f32,
                profile.prev_sem_result() as f32,
                profile.academic_performance() as f32,
                if profile.internship_experience() { 1.0 } else { 0.0 },
                profile.communication_skills() as f32,
                profile.projects_completed() as f32,
            ],
        }
    }

    /// Get the number of features produced.
    pub fn feature_count(&self) -> usize {
        FEATURE_COUNT
    }

    /// Get feature names (training order).
    pub fn feature_names(&self) -> &'static [&'static str] {
        &FEATURE_NAMES
    }
}

impl Default for FeatureExtractor {
    fn default() -> Self {
        Self::new()
    }
}
