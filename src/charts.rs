//! Chart payloads and static display tables.
//!
//! Both charts are display-only projections of the six raw inputs onto a
//! roughly 0-10 scale.

use crate::types::profile::StudentProfile;
use serde::Serialize;

/// Radial axis range of the profile chart
pub const RADAR_RANGE: [f64; 2] = [0.0, 10.0];

/// Radar chart of the current inputs (five axes, internship excluded)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RadarChart {
    pub categories: Vec<&'static str>,
    pub values: Vec<f64>,
    pub range: [f64; 2],
}

/// Per-feature bar chart
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarChart {
    pub title: &'static str,
    pub features: Vec<&'static str>,
    pub values: Vec<f64>,
}

/// Build the five-axis profile chart.
pub fn radar(profile: &StudentProfile) -> RadarChart {
    RadarChart {
        categories: vec![
            "IQ Score",
            "Academic Perf.",
            "Prev. Semester",
            "Communication",
            "Projects",
        ],
        values: vec![
            f64::from(profile.iq()) / 20.0,
            f64::from(profile.academic_performance()),
            profile.prev_sem_result(),
            f64::from(profile.communication_skills()),
            f64::from(profile.projects_completed()) / 2.0,
        ],
        range: RADAR_RANGE,
    }
}

/// Build the feature contribution bar chart.
///
/// Projects are plotted raw here (not halved as on the radar).
pub fn feature_bars(profile: &StudentProfile) -> BarChart {
    BarChart {
        title: "Current Profile Strengths",
        features: vec![
            "IQ Score",
            "Previous Semester",
            "Academic Performance",
            "Internship Experience",
            "Communication Skills",
            "Projects Completed",
        ],
        values: vec![
            f64::from(profile.iq()) / 20.0,
            profile.prev_sem_result(),
            f64::from(profile.academic_performance()),
            if profile.internship_experience() { 10.0 } else { 0.0 },
            f64::from(profile.communication_skills()),
            f64::from(profile.projects_completed()),
        ],
    }
}

/// Displayed feature importance. Static constants, not read from the model.
pub const FEATURE_IMPORTANCE: [(&str, f64); 6] = [
    ("Academic Performance", 0.25),
    ("Communication Skills", 0.20),
    ("IQ Score", 0.18),
    ("Projects Completed", 0.15),
    ("Previous Semester", 0.12),
    ("Internship Experience", 0.10),
];

/// Sidebar tips for better placement
pub const PLACEMENT_TIPS: [&str; 5] = [
    "Focus on improving communication skills",
    "Complete more practical projects",
    "Gain internship experience",
    "Maintain consistent academic performance",
    "Develop problem-solving abilities",
];
