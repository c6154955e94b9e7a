use std::sync::Arc;
use std::time::Instant;

use axum::extract::{Form, Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse};
use axum::Json;
use serde::Serialize;
use tracing::{error, warn};

use super::render::{render_page, Outcome};
use super::AppState;
use crate::assessment::{assess, Assessment};
use crate::charts;
use crate::metrics::MetricsSnapshot;
use crate::models::inference::PredictionError;
use crate::types::profile::{ProfileForm, StudentProfile};

/// Liveness probe body
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub model: String,
    pub probability_support: bool,
    pub uptime_seconds: u64,
    pub predictions: MetricsSnapshot,
}

/// Form page. Query-string values prefill the form when present.
pub async fn index_handler(Query(form): Query<ProfileForm>) -> impl IntoResponse {
    if form.is_empty() {
        let profile = StudentProfile::default();
        let radar = charts::radar(&profile);
        return Html(render_page(&ProfileForm::from(&profile), Some(&radar), &Outcome::Empty));
    }

    match form.parse() {
        Ok(profile) => {
            let radar = charts::radar(&profile);
            Html(render_page(&form, Some(&radar), &Outcome::Empty))
        }
        Err(e) => Html(render_page(&form, None, &Outcome::Invalid(&e))),
    }
}

/// Form submission: validate, predict, render.
pub async fn predict_handler(
    State(state): State<Arc<AppState>>,
    Form(form): Form<ProfileForm>,
) -> impl IntoResponse {
    let profile = match form.parse() {
        Ok(profile) => profile,
        Err(e) => {
            warn!(error = %e, "Rejected form submission");
            state.metrics.record_rejected_input();
            return (
                StatusCode::UNPROCESSABLE_ENTITY,
                Html(render_page(&form, None, &Outcome::Invalid(&e))),
            );
        }
    };

    let radar = charts::radar(&profile);
    let start = Instant::now();

    match run_assessment(&state, profile).await {
        Ok(assessment) => {
            state.metrics.record_prediction(
                start.elapsed(),
                assessment.prediction.label,
                assessment.prediction.probability_percent,
            );
            (
                StatusCode::OK,
                Html(render_page(&form, Some(&radar), &Outcome::Assessed(&assessment))),
            )
        }
        Err(e) => {
            error!(error = %e, "Prediction failed");
            state.metrics.record_failure();
            (
                StatusCode::OK,
                Html(render_page(&form, Some(&radar), &Outcome::Failed(&e))),
            )
        }
    }
}

/// Inference may hold the session lock, so it runs off the async workers.
async fn run_assessment(
    state: &Arc<AppState>,
    profile: StudentProfile,
) -> Result<Assessment, PredictionError> {
    let predictor = state.predictor.clone();
    tokio::task::spawn_blocking(move || assess(&predictor, &profile))
        .await
        .unwrap_or_else(|e| {
            Err(PredictionError {
                message: e.to_string(),
            })
        })
}

pub async fn health_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        model: state.predictor.model_name().to_string(),
        probability_support: state.predictor.supports_probability(),
        uptime_seconds: state.metrics.uptime_seconds(),
        predictions: state.metrics.snapshot(),
    })
}
