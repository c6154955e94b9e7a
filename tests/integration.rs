//! Integration tests for the placement predictor HTTP server and pipeline.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Result};
use tokio::net::TcpListener;

use placement_predictor::feature_extractor::FeatureRecord;
use placement_predictor::insights::MAINTENANCE_RECOMMENDATIONS;
use placement_predictor::models::{Classifier, ModelError, ModelLoader, Predictor};
use placement_predictor::server::{build_router, AppState};
use placement_predictor::types::prediction::ConfidenceSource;
use placement_predictor::{assess, StudentProfile};

// ---------------------------------------------------------------------------
// Stub classifiers
// ---------------------------------------------------------------------------

/// Placed when academics and communication are both at least 7
struct Rules;

impl Classifier for Rules {
    fn name(&self) -> &str {
        "rules"
    }

    fn predict(&self, record: &FeatureRecord) -> Result<bool> {
        let academics = record.get("Academic_Performance").unwrap_or(0.0);
        let communication = record.get("Communication_Skills").unwrap_or(0.0);
        Ok(academics >= 7.0 && communication >= 7.0)
    }
}

/// Reports a fixed positive-class probability
struct Calibrated(f64);

impl Classifier for Calibrated {
    fn name(&self) -> &str {
        "calibrated"
    }

    fn predict(&self, _record: &FeatureRecord) -> Result<bool> {
        Ok(self.0 > 0.5)
    }

    fn supports_probability(&self) -> bool {
        true
    }

    fn predict_proba(&self, _record: &FeatureRecord) -> Result<[f64; 2]> {
        Ok([1.0 - self.0, self.0])
    }
}

struct Broken;

impl Classifier for Broken {
    fn name(&self) -> &str {
        "broken"
    }

    fn predict(&self, _record: &FeatureRecord) -> Result<bool> {
        bail!("input shape mismatch")
    }
}

fn demo_forest_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("models/placement_forest.json")
}

// ---------------------------------------------------------------------------
// Helper: spin up a test server on an ephemeral port
// ---------------------------------------------------------------------------

async fn spawn_test_server(classifier: Box<dyn Classifier>) -> (SocketAddr, Arc<AppState>) {
    let state = Arc::new(AppState::new(Predictor::from_classifier(classifier)));
    let app = build_router(state.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    // Give the server a moment to start
    tokio::time::sleep(Duration::from_millis(50)).await;

    (addr, state)
}

async fn submit(addr: SocketAddr, body: &str) -> reqwest::Response {
    reqwest::Client::new()
        .post(format!("http://{}/", addr))
        .header("content-type", "application/x-www-form-urlencoded")
        .body(body.to_string())
        .send()
        .await
        .unwrap()
}

// ---------------------------------------------------------------------------
// Pipeline
// ---------------------------------------------------------------------------

#[test]
fn test_strong_profile_end_to_end() {
    let predictor = Predictor::from_classifier(Box::new(Rules));
    let profile = StudentProfile::new(150, 9, 9.0, 9, true, 6).unwrap();

    let assessment = assess(&predictor, &profile).unwrap();
    assert!(assessment.prediction.label);
    assert_eq!(assessment.prediction.probability_percent, 85.0);
    assert_eq!(assessment.prediction.source, ConfidenceSource::Fallback);
    assert_eq!(assessment.insights.strengths.len(), 5);
    assert!(assessment.insights.weaknesses.is_empty());
    assert_eq!(
        assessment.insights.recommendations,
        MAINTENANCE_RECOMMENDATIONS.to_vec()
    );
}

#[test]
fn test_weak_profile_end_to_end() {
    let predictor = Predictor::from_classifier(Box::new(Rules));
    let profile = StudentProfile::new(70, 3, 3.0, 3, false, 0).unwrap();

    let assessment = assess(&predictor, &profile).unwrap();
    assert!(!assessment.prediction.label);
    assert_eq!(assessment.prediction.probability_percent, 25.0);
    assert!(assessment.insights.strengths.is_empty());
    assert_eq!(assessment.insights.weaknesses.len(), 5);
    assert_eq!(
        assessment.insights.recommendations,
        vec![
            "Join public speaking clubs or communication workshops",
            "Work on more practical projects in your field",
            "Apply for internships to gain industry experience",
            "Focus on improving academic grades",
        ]
    );
}

#[test]
fn test_model_probability_is_reported() {
    let predictor = Predictor::from_classifier(Box::new(Calibrated(0.732)));
    let assessment = assess(&predictor, &StudentProfile::default()).unwrap();

    assert!(assessment.prediction.label);
    assert!((assessment.prediction.probability_percent - 73.2).abs() < 1e-9);
    assert_eq!(assessment.prediction.source, ConfidenceSource::Model);
}

#[test]
fn test_demo_forest_scores_both_scenarios() {
    let model = ModelLoader::new().load(demo_forest_path()).unwrap();
    let predictor = Predictor::new(model);
    assert!(predictor.supports_probability());

    let strong = StudentProfile::new(150, 9, 9.0, 9, true, 6).unwrap();
    let result = assess(&predictor, &strong).unwrap().prediction;
    assert!(result.label);
    assert!(result.probability_percent > 80.0);

    let weak = StudentProfile::new(70, 3, 3.0, 3, false, 0).unwrap();
    let result = assess(&predictor, &weak).unwrap().prediction;
    assert!(!result.label);
    assert!(result.probability_percent < 30.0);
}

// ---------------------------------------------------------------------------
// Model loading
// ---------------------------------------------------------------------------

#[test]
fn test_loader_reports_missing_model() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("random_forest_model.onnx");

    let err = ModelLoader::new().load(&path).unwrap_err();
    assert!(matches!(err, ModelError::NotFound { .. }));
    assert!(err.to_string().contains("random_forest_model.onnx"));
}

#[test]
fn test_corrupt_json_model_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("model.json");
    std::fs::write(&path, "{\"trees\": 3}").unwrap();

    let err = ModelLoader::new().load(&path).unwrap_err();
    assert!(matches!(err, ModelError::Corrupt { .. }));
}

#[test]
fn test_unknown_extension_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("model.pkl");
    std::fs::write(&path, b"\x80\x04").unwrap();

    let err = ModelLoader::new().load(&path).unwrap_err();
    assert!(matches!(err, ModelError::UnsupportedFormat { .. }));
}

// ---------------------------------------------------------------------------
// HTTP server
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_index_renders_form_with_defaults() {
    let (addr, _state) = spawn_test_server(Box::new(Rules)).await;

    let resp = reqwest::get(format!("http://{}/", addr)).await.unwrap();
    assert_eq!(resp.status(), 200);

    let body = resp.text().await.unwrap();
    assert!(body.contains("Student Placement Predictor"));
    assert!(body.contains("name=\"iq\" value=\"100\""));
    assert!(body.contains("Plotly.newPlot('radar-chart'"));
    assert!(!body.contains("Placement Prediction:"));
}

#[tokio::test]
async fn test_index_prefills_from_query() {
    let (addr, _state) = spawn_test_server(Box::new(Rules)).await;

    let url = format!(
        "http://{}/?iq=140&academic_performance=9&prev_sem_result=8.4&communication_skills=8&internship_experience=Yes&projects_completed=7",
        addr
    );
    let body = reqwest::get(url).await.unwrap().text().await.unwrap();
    assert!(body.contains("name=\"iq\" value=\"140\""));
    assert!(body.contains("<option value=\"Yes\" selected>"));
}

#[tokio::test]
async fn test_submit_renders_verdict_and_insights() {
    let (addr, state) = spawn_test_server(Box::new(Rules)).await;

    let resp = submit(
        addr,
        "iq=150&academic_performance=9&prev_sem_result=9.0&communication_skills=9&internship_experience=Yes&projects_completed=6",
    )
    .await;
    assert_eq!(resp.status(), 200);

    let body = resp.text().await.unwrap();
    assert!(body.contains("LIKELY TO BE PLACED"));
    assert!(body.contains("Probability: 85.0%"));
    assert!(body.contains("High IQ Score"));
    assert!(body.contains("<li>Maintain current performance levels</li>"));
    assert!(body.contains("Plotly.newPlot('bar-chart'"));
    // Submitted values are kept in the form
    assert!(body.contains("name=\"iq\" value=\"150\""));

    let snapshot = state.metrics.snapshot();
    assert_eq!(snapshot.predictions, 1);
    assert_eq!(snapshot.placed, 1);
}

#[tokio::test]
async fn test_invalid_input_is_rejected_inline() {
    let (addr, state) = spawn_test_server(Box::new(Rules)).await;

    let resp = submit(
        addr,
        "iq=250&academic_performance=9&prev_sem_result=9.0&communication_skills=9&internship_experience=Yes&projects_completed=6",
    )
    .await;
    assert_eq!(resp.status(), 422);

    let body = resp.text().await.unwrap();
    assert!(body.contains("iq must be between 50 and 200 (got 250)"));
    assert!(!body.contains("Placement Prediction:"));

    let snapshot = state.metrics.snapshot();
    assert_eq!(snapshot.rejected_inputs, 1);
    assert_eq!(snapshot.predictions, 0);
}

#[tokio::test]
async fn test_prediction_failure_keeps_form_usable() {
    let (addr, state) = spawn_test_server(Box::new(Broken)).await;

    let resp = submit(
        addr,
        "iq=100&academic_performance=7&prev_sem_result=7.0&communication_skills=7&internship_experience=No&projects_completed=3",
    )
    .await;
    assert_eq!(resp.status(), 200);

    let body = resp.text().await.unwrap();
    assert!(body.contains("Error making prediction: input shape mismatch"));
    assert!(body.contains("<form method=\"post\" action=\"/\">"));
    assert!(!body.contains("Recommendations"));

    assert_eq!(state.metrics.snapshot().failures, 1);
}

#[tokio::test]
async fn test_health_endpoint() {
    let (addr, _state) = spawn_test_server(Box::new(Calibrated(0.9))).await;

    let resp = reqwest::get(format!("http://{}/health", addr)).await.unwrap();
    assert_eq!(resp.status(), 200);

    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["model"], "calibrated");
    assert_eq!(body["probability_support"], true);
    assert_eq!(body["predictions"]["predictions"], 0);
    assert!(body["version"].as_str().is_some());
}
