//! Attrition scoring endpoint

use axum::{extract::State, routing::post, Json, Router};
use tracing::info;

use super::run_blocking;
use crate::error::{ApiError, ApiResult};
use crate::predict::{self, PredictionReport};
use crate::AppState;

/// POST /predict
///
/// Scores the current session table. A missing upload is reported before a
/// missing model.
pub async fn predict_attrition(
    State(state): State<AppState>,
) -> ApiResult<Json<PredictionReport>> {
    let dataset = state.session.require().await?;
    let artifacts = state.artifacts.clone().ok_or(ApiError::ModelNotLoaded)?;

    let report = run_blocking("Prediction", move || predict::predict(&dataset, &artifacts)).await?;

    let summary = &report.summary;
    info!(
        "Scored {} employees: {} high, {} medium, {} low risk",
        summary.total_employees, summary.high_risk, summary.medium_risk, summary.low_risk
    );
    Ok(Json(report))
}

/// Build prediction routes
pub fn predict_routes() -> Router<AppState> {
    Router::new().route("/predict", post(predict_attrition))
}
