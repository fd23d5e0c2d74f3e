//! Health check endpoint

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

use crate::AppState;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub model_loaded: bool,
    pub preprocessor_loaded: bool,
    pub version: &'static str,
}

/// GET /health
///
/// Always 200; reports whether scoring is available.
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let loaded = state.artifacts.is_some();
    Json(HealthResponse {
        status: "healthy",
        model_loaded: loaded,
        preprocessor_loaded: loaded,
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Build health check routes
pub fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
