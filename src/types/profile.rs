//! Student profile collected from the input form

use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;
use thiserror::Error;

/// Allowed IQ score range
pub const IQ_RANGE: RangeInclusive<u32> = 50..=200;
/// Allowed academic performance range
pub const ACADEMIC_PERFORMANCE_RANGE: RangeInclusive<u32> = 0..=10;
/// Allowed previous semester result range (step 0.1)
pub const PREV_SEM_RESULT_RANGE: RangeInclusive<f64> = 0.0..=10.0;
/// Allowed communication skills range
pub const COMMUNICATION_SKILLS_RANGE: RangeInclusive<u32> = 0..=10;
/// Allowed number of completed projects
pub const PROJECTS_COMPLETED_RANGE: RangeInclusive<u32> = 0..=20;

/// Rejected form input
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProfileError {
    #[error("{field} is required")]
    Missing { field: &'static str },

    #[error("{field} must be a number (got {value:?})")]
    NotANumber { field: &'static str, value: String },

    #[error("{field} must be between {min} and {max} (got {value})")]
    OutOfRange {
        field: &'static str,
        value: String,
        min: String,
        max: String,
    },

    #[error("internship_experience must be Yes or No (got {value:?})")]
    InvalidToggle { value: String },
}

/// The six attributes describing a student.
///
/// Every constructed value is within the documented domain, so the
/// classifier is never invoked with out-of-range data.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StudentProfile {
    iq: u32,
    academic_performance: u32,
    prev_sem_result: f64,
    communication_skills: u32,
    internship_experience: bool,
    projects_completed: u32,
}

impl StudentProfile {
    /// Build a validated profile. `prev_sem_result` is rounded to one decimal.
    pub fn new(
        iq: u32,
        academic_performance: u32,
        prev_sem_result: f64,
        communication_skills: u32,
        internship_experience: bool,
        projects_completed: u32,
    ) -> Result<Self, ProfileError> {
        check_int("iq", iq, &IQ_RANGE)?;
        check_int(
            "academic_performance",
            academic_performance,
            &ACADEMIC_PERFORMANCE_RANGE,
        )?;
        check_int(
            "communication_skills",
            communication_skills,
            &COMMUNICATION_SKILLS_RANGE,
        )?;
        check_int(
            "projects_completed",
            projects_completed,
            &PROJECTS_COMPLETED_RANGE,
        )?;

        if !prev_sem_result.is_finite() {
            return Err(ProfileError::NotANumber {
                field: "prev_sem_result",
                value: prev_sem_result.to_string(),
            });
        }
        // Bounds apply to the submitted value, not the rounded one
        if !PREV_SEM_RESULT_RANGE.contains(&prev_sem_result) {
            return Err(ProfileError::OutOfRange {
                field: "prev_sem_result",
                value: prev_sem_result.to_string(),
                min: format!("{:.1}", PREV_SEM_RESULT_RANGE.start()),
                max: format!("{:.1}", PREV_SEM_RESULT_RANGE.end()),
            });
        }
        // `+ 0.0` turns -0.0 into 0.0
        let prev_sem_result = (prev_sem_result * 10.0).round() / 10.0 + 0.0;

        Ok(Self {
            iq,
            academic_performance,
            prev_sem_result,
            communication_skills,
            internship_experience,
            projects_completed,
        })
    }

    pub fn iq(&self) -> u32 {
        self.iq
    }

    pub fn academic_performance(&self) -> u32 {
        self.academic_performance
    }

    pub fn prev_sem_result(&self) -> f64 {
        self.prev_sem_result
    }

    pub fn communication_skills(&self) -> u32 {
        self.communication_skills
    }

    pub fn internship_experience(&self) -> bool {
        self.internship_experience
    }

    pub fn projects_completed(&self) -> u32 {
        self.projects_completed
    }

    /// Internship flag as shown on the form
    pub fn internship_label(&self) -> &'static str {
        if self.internship_experience {
            "Yes"
        } else {
            "No"
        }
    }
}

/// Form defaults: a middle-of-the-road student with no internship.
impl Default for StudentProfile {
    fn default() -> Self {
        Self {
            iq: 100,
            academic_performance: 7,
            prev_sem_result: 7.0,
            communication_skills: 7,
            internship_experience: false,
            projects_completed: 3,
        }
    }
}

fn check_int(
    field: &'static str,
    value: u32,
    range: &RangeInclusive<u32>,
) -> Result<(), ProfileError> {
    if range.contains(&value) {
        Ok(())
    } else {
        Err(ProfileError::OutOfRange {
            field,
            value: value.to_string(),
            min: range.start().to_string(),
            max: range.end().to_string(),
        })
    }
}

/// Raw form submission, kept as text so it can be redrawn verbatim when
/// validation fails.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileForm {
    pub iq: Option<String>,
    pub academic_performance: Option<String>,
    pub prev_sem_result: Option<String>,
    pub communication_skills: Option<String>,
    pub internship_experience: Option<String>,
    pub projects_completed: Option<String>,
}

impl ProfileForm {
    /// True when no field was submitted at all
    pub fn is_empty(&self) -> bool {
        self.iq.is_none()
            && self.academic_performance.is_none()
            && self.prev_sem_result.is_none()
            && self.communication_skills.is_none()
            && self.internship_experience.is_none()
            && self.projects_completed.is_none()
    }

    /// Validate the submission into a profile.
    ///
    /// A missing internship toggle counts as "No", like an unchecked box.
    pub fn parse(&self) -> Result<StudentProfile, ProfileError> {
        let iq = parse_int("iq", self.iq.as_deref())?;
        let academic_performance =
            parse_int("academic_performance", self.academic_performance.as_deref())?;
        let prev_sem_result = parse_float("prev_sem_result", self.prev_sem_result.as_deref())?;
        let communication_skills =
            parse_int("communication_skills", self.communication_skills.as_deref())?;
        let internship_experience = match self.internship_experience.as_deref() {
            None => false,
            Some(raw) => parse_toggle(raw)?,
        };
        let projects_completed =
            parse_int("projects_completed", self.projects_completed.as_deref())?;

        StudentProfile::new(
            iq,
            academic_performance,
            prev_sem_result,
            communication_skills,
            internship_experience,
            projects_completed,
        )
    }
}

impl From<&StudentProfile> for ProfileForm {
    fn from(profile: &StudentProfile) -> Self {
        Self {
            iq: Some(profile.iq.to_string()),
            academic_performance: Some(profile.academic_performance.to_string()),
            prev_sem_result: Some(format!("{:.1}", profile.prev_sem_result)),
            communication_skills: Some(profile.communication_skills.to_string()),
            internship_experience: Some(profile.internship_label().to_string()),
            projects_completed: Some(profile.projects_completed.to_string()),
        }
    }
}

/// Parse the internship toggle (`Yes`/`No`, also `true`/`false`, `1`/`0`, `on`/`off`)
pub fn parse_toggle(raw: &str) -> Result<bool, ProfileError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "yes" | "y" | "true" | "1" | "on" => Ok(true),
        "no" | "n" | "false" | "0" | "off" => Ok(false),
        _ => Err(ProfileError::InvalidToggle {
            value: raw.to_string(),
        }),
    }
}

fn parse_int(field: &'static str, raw: Option<&str>) -> Result<u32, ProfileError> {
    let raw = present(field, raw)?;
    match raw.parse::<i64>() {
        Ok(value) => u32::try_from(value).map_err(|_| ProfileError::OutOfRange {
            field,
            value: value.to_string(),
            min: "0".to_string(),
            max: u32::MAX.to_string(),
        }),
        Err(_) => Err(ProfileError::NotANumber {
            field,
            value: raw.to_string(),
        }),
    }
}

fn parse_float(field: &'static str, raw: Option<&str>) -> Result<f64, ProfileError> {
    let raw = present(field, raw)?;
    raw.parse::<f64>().map_err(|_| ProfileError::NotANumber {
        field,
        value: raw.to_string(),
    })
}

fn present<'a>(field: &'static str, raw: Option<&'a str>) -> Result<&'a str, ProfileError> {
    match raw.map(str::trim) {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(ProfileError::Missing { field }),
    }
}
