//! attrition-server library - HR attrition analytics service
//!
//! Holds one uploaded employee table per process, computes exploratory
//! statistics over it and scores it with a pre-trained attrition model.

use std::sync::Arc;

use attrition_common::config::TomlConfig;
use axum::{extract::DefaultBodyLimit, http::HeaderValue, Router};
use tower::ServiceBuilder;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

pub mod api;
pub mod dataset;
pub mod error;
pub mod explore;
pub mod format;
pub mod model;
pub mod predict;
pub mod session;

use model::ModelArtifacts;
use session::SessionStore;

/// Transport settings applied by [`build_router`]
#[derive(Debug, Clone)]
pub struct HttpSettings {
    /// Browser origins allowed to call the API
    pub cors_origins: Vec<String>,
    /// Request body cap, which bounds upload size
    pub max_upload_bytes: usize,
}

impl From<&TomlConfig> for HttpSettings {
    fn from(config: &TomlConfig) -> Self {
        Self {
            cors_origins: config.cors_origins.clone(),
            max_upload_bytes: config.max_upload_bytes,
        }
    }
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self::from(&TomlConfig::default())
    }
}

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Current uploaded table
    pub session: SessionStore,
    /// Preprocessor + classifier; `None` only when running without a model
    pub artifacts: Option<Arc<ModelArtifacts>>,
    pub http: HttpSettings,
}

impl AppState {
    /// Create new application state with an empty session
    pub fn new(artifacts: Option<Arc<ModelArtifacts>>, http: HttpSettings) -> Self {
        Self {
            session: SessionStore::new(),
            artifacts,
            http,
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    let cors = cors_layer(&state.http.cors_origins);
    let body_limit = state.http.max_upload_bytes;

    Router::new()
        .merge(api::health_routes())
        .merge(api::upload_routes())
        .merge(api::explore_routes())
        .merge(api::predict_routes())
        .merge(api::summary_routes())
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors)
                .layer(DefaultBodyLimit::max(body_limit)),
        )
        .with_state(state)
}

/// Credentialed CORS for the configured origins, any method or header
fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            // A wildcard cannot be combined with credentials
            Ok(value) if value != "*" => Some(value),
            _ => {
                warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_credentials(true)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
}
