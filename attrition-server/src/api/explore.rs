//! Exploratory statistics endpoint

use axum::{extract::State, routing::get, Json, Router};

use super::run_blocking;
use crate::error::ApiResult;
use crate::explore::{self, ExploreReport};
use crate::AppState;

/// GET /explore
pub async fn explore_data(State(state): State<AppState>) -> ApiResult<Json<ExploreReport>> {
    let dataset = state.session.require().await?;
    let report = run_blocking("Exploration", move || explore::explore(&dataset)).await?;
    Ok(Json(report))
}

/// Build exploration routes
pub fn explore_routes() -> Router<AppState> {
    Router::new().route("/explore", get(explore_data))
}
