//! Rule-based strengths, weaknesses and recommendations.
//!
//! A pure function of the raw profile; the model is never consulted.
//! Values strictly between an attribute's weakness and strength thresholds
//! (e.g. IQ 91..=119) produce no bullet for that attribute.

use crate::types::profile::StudentProfile;
use serde::Serialize;

pub const IQ_STRENGTH_MIN: u32 = 120;
pub const IQ_WEAKNESS_MAX: u32 = 90;
pub const ACADEMIC_STRENGTH_MIN: u32 = 8;
pub const ACADEMIC_WEAKNESS_MAX: u32 = 5;
pub const COMMUNICATION_STRENGTH_MIN: u32 = 8;
pub const COMMUNICATION_WEAKNESS_MAX: u32 = 5;
pub const PROJECTS_STRENGTH_MIN: u32 = 5;
pub const PROJECTS_WEAKNESS_MAX: u32 = 2;

pub const COMMUNICATION_ADVICE_MAX: u32 = 6;
pub const PROJECTS_ADVICE_MAX: u32 = 3;
pub const ACADEMIC_ADVICE_MAX: u32 = 6;

/// Profile attribute a bullet refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Attribute {
    Iq,
    Academics,
    Communication,
    Projects,
    Internship,
}

impl Attribute {
    /// Icon shown next to the bullet
    pub fn icon(&self) -> &'static str {
        match self {
            Self::Iq => "🧠",
            Self::Academics => "📚",
            Self::Communication => "🗣️",
            Self::Projects => "📁",
            Self::Internship => "💼",
        }
    }
}

/// One strength or weakness bullet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Bullet {
    pub attribute: Attribute,
    pub text: &'static str,
}

/// Output of the insight rules for one profile
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Insights {
    pub strengths: Vec<Bullet>,
    pub weaknesses: Vec<Bullet>,
    pub recommendations: Vec<&'static str>,
}

/// Suggested when no recommendation rule fires
pub const MAINTENANCE_RECOMMENDATIONS: [&str; 4] = [
    "Maintain current performance levels",
    "Consider leadership roles in projects",
    "Build a strong professional network",
    "Prepare well for placement interviews",
];

/// Evaluate the threshold rules for a profile.
pub fn generate(profile: &StudentProfile) -> Insights {
    let mut strengths = Vec::new();
    let mut weaknesses = Vec::new();

    let mut rate = |attribute, value: u32, strong_min, weak_max, strong, weak| {
        if value >= strong_min {
            strengths.push(Bullet { attribute, text: strong });
        } else if value <= weak_max {
            weaknesses.push(Bullet { attribute, text: weak });
        }
    };

    rate(
        Attribute::Iq,
        profile.iq(),
        IQ_STRENGTH_MIN,
        IQ_WEAKNESS_MAX,
        "High IQ Score",
        "IQ Score needs improvement",
    );
    rate(
        Attribute::Academics,
        profile.academic_performance(),
        ACADEMIC_STRENGTH_MIN,
        ACADEMIC_WEAKNESS_MAX,
        "Excellent Academic Performance",
        "Academic Performance needs focus",
    );
    rate(
        Attribute::Communication,
        profile.communication_skills(),
        COMMUNICATION_STRENGTH_MIN,
        COMMUNICATION_WEAKNESS_MAX,
        "Strong Communication Skills",
        "Communication Skills need development",
    );
    rate(
        Attribute::Projects,
        profile.projects_completed(),
        PROJECTS_STRENGTH_MIN,
        PROJECTS_WEAKNESS_MAX,
        "Good Project Portfolio",
        "Need more project experience",
    );

    if profile.internship_experience() {
        strengths.push(Bullet {
            attribute: Attribute::Internship,
            text: "Valuable Internship Experience",
        });
    } else {
        weaknesses.push(Bullet {
            attribute: Attribute::Internship,
            text: "Lack of internship experience",
        });
    }

    Insights {
        strengths,
        weaknesses,
        recommendations: recommendations(profile),
    }
}

fn recommendations(profile: &StudentProfile) -> Vec<&'static str> {
    let mut advice = Vec::new();

    if profile.communication_skills() <= COMMUNICATION_ADVICE_MAX {
        advice.push("Join public speaking clubs or communication workshops");
    }
    if profile.projects_completed() <= PROJECTS_ADVICE_MAX {
        advice.push("Work on more practical projects in your field");
    }
    if !profile.internship_experience() {
        advice.push("Apply for internships to gain industry experience");
    }
    if profile.academic_performance() <= ACADEMIC_ADVICE_MAX {
        advice.push("Focus on improving academic grades");
    }

    if advice.is_empty() {
        advice.extend(MAINTENANCE_RECOMMENDATIONS);
    }
    advice
}
