//! HTTP API handlers for attrition-server
//!
//! Handlers only extract, delegate and serialize. Table parsing, statistics
//! and scoring run on the blocking pool so large uploads do not stall the
//! async workers.

pub mod explore;
pub mod health;
pub mod predict;
pub mod summary;
pub mod upload;

pub use explore::explore_routes;
pub use health::health_routes;
pub use predict::predict_routes;
pub use summary::summary_routes;
pub use upload::upload_routes;

use crate::error::{ApiError, ApiResult};

/// Run a CPU-bound pipeline stage off the async runtime
///
/// Server-side failures come back wrapped in [`ApiError::Stage`].
pub(crate) async fn run_blocking<T, F>(stage: &'static str, work: F) -> ApiResult<T>
where
    F: FnOnce() -> ApiResult<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| ApiError::Internal(format!("worker task aborted: {}", e)))
        .and_then(|result| result)
        .map_err(|e| e.in_stage(stage))
}
