//! Headline summary endpoint

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

use crate::error::ApiResult;
use crate::explore::{headline, HeadlineSummary};
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct SummaryResponse {
    pub status: &'static str,
    pub summary: HeadlineSummary,
}

/// GET /summary
pub async fn get_summary(State(state): State<AppState>) -> ApiResult<Json<SummaryResponse>> {
    let dataset = state.session.require().await?;
    Ok(Json(SummaryResponse {
        status: "success",
        summary: headline(&dataset)?,
    }))
}

/// Build summary routes
pub fn summary_routes() -> Router<AppState> {
    Router::new().route("/summary", get(get_summary))
}
