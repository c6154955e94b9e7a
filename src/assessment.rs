//! One form submission end to end: features, prediction, insights, charts.

use crate::charts::{self, BarChart, RadarChart};
use crate::feature_extractor::FeatureExtractor;
use crate::insights::{self, Insights};
use crate::models::inference::{PredictionError, Predictor};
use crate::types::prediction::PredictionResult;
use crate::types::profile::StudentProfile;
use serde::Serialize;
use tracing::{debug, info};
use uuid::Uuid;

/// Everything rendered for a successful submission
#[derive(Debug, Clone, Serialize)]
pub struct Assessment {
    pub submission_id: Uuid,
    pub profile: StudentProfile,
    pub prediction: PredictionResult,
    pub insights: Insights,
    pub radar: RadarChart,
    pub feature_bars: BarChart,
}

/// Run the decision pipeline for one profile.
///
/// Insights and charts are only produced when the prediction succeeds.
pub fn assess(
    predictor: &Predictor,
    profile: &StudentProfile,
) -> Result<Assessment, PredictionError> {
    let submission_id = Uuid::new_v4();
    let record = FeatureExtractor::new().extract(profile);
    debug!(
        submission_id = %submission_id,
        features = ?record.iter().collect::<Vec<_>>(),
        "Feature record built"
    );
    let prediction = predictor.predict(&record)?;

    info!(
        submission_id = %submission_id,
        placed = prediction.label,
        probability_percent = prediction.probability_percent,
        "Placement prediction"
    );

    Ok(Assessment {
        submission_id,
        profile: *profile,
        prediction,
        insights: insights::generate(profile),
        radar: charts::radar(profile),
        feature_bars: charts::feature_bars(profile),
    })
}
