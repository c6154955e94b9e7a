//! HTTP front end for the placement predictor.
//!
//! One page: the input form (GET /), its submission (POST /) and a JSON
//! liveness probe (GET /health). The classifier is loaded before the
//! listener binds and shared read-only across requests.

pub mod handlers;
pub mod render;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use axum::routing::get;
use axum::Router;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::metrics::PredictionMetrics;
use crate::models::Predictor;

/// Shared request state
pub struct AppState {
    pub predictor: Arc<Predictor>,
    pub metrics: PredictionMetrics,
}

impl AppState {
    pub fn new(predictor: Predictor) -> Self {
        Self {
            predictor: Arc::new(predictor),
            metrics: PredictionMetrics::new(),
        }
    }
}

/// Build the application router
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route(
            "/",
            get(handlers::index_handler).post(handlers::predict_handler),
        )
        .route("/health", get(handlers::health_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve until SIGINT/SIGTERM, then log the metrics summary.
pub async fn run_server(bind: SocketAddr, state: Arc<AppState>) -> Result<()> {
    let app = build_router(state.clone());

    let listener = tokio::net::TcpListener::bind(bind).await?;
    info!(bind = %bind, model = state.predictor.model_name(), "Placement predictor listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    state.metrics.print_summary();
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = tokio::signal::ctrl_c();

    #[cfg(unix)]
    let sigterm = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(_) => std::future::pending::<()>().await,
        }
    };
    #[cfg(not(unix))]
    let sigterm = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("received SIGINT, shutting down gracefully"),
        _ = sigterm => info!("received SIGTERM, shutting down gracefully"),
    }
}
