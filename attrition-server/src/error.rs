//! Error types for attrition-server
//!
//! Validation and upload parse failures map to 400 with a specific message.
//! Everything else is an internal error: logged with its source chain,
//! returned as 500.

use attrition_common::Error as CommonError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use polars::prelude::PolarsError;
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// No table uploaded in this session yet (400)
    #[error("No file uploaded yet")]
    NoData,

    /// Model or preprocessor artifact unavailable (400)
    #[error("Model not loaded")]
    ModelNotLoaded,

    /// Upload extension is neither .csv nor .xlsx (400)
    #[error("Only CSV and XLSX files supported")]
    UnsupportedFormat,

    /// Table lacks required schema columns (400)
    #[error("Missing columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    /// Invalid request, e.g. a malformed multipart body (400)
    #[error("{0}")]
    BadRequest(String),

    /// Internal server error (500)
    #[error("{0}")]
    Internal(String),

    /// attrition-common error; `Parse` is 400, everything else 500
    #[error(transparent)]
    Common(#[from] attrition_common::Error),

    /// Table computation failed (500)
    #[error(transparent)]
    Frame(#[from] PolarsError),

    /// Server-side failure inside a named pipeline stage
    #[error("{stage} failed: {source}")]
    Stage {
        stage: &'static str,
        #[source]
        source: Box<ApiError>,
    },
}

impl ApiError {
    /// Attach the pipeline stage to server-side failures
    ///
    /// The original error stays reachable through `source()`.
    pub fn in_stage(self, stage: &'static str) -> Self {
        if self.status().is_server_error() && !matches!(self, ApiError::Stage { .. }) {
            ApiError::Stage {
                stage,
                source: Box::new(self),
            }
        } else {
            self
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NoData
            | ApiError::ModelNotLoaded
            | ApiError::UnsupportedFormat
            | ApiError::MissingColumns(_)
            | ApiError::BadRequest(_)
            | ApiError::Common(CommonError::Parse(_)) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) | ApiError::Common(_) | ApiError::Frame(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            ApiError::Stage { source, .. } => source.status(),
        }
    }

    fn code(&self) -> &'static str {
        match self {
            ApiError::NoData => "NO_DATA",
            ApiError::ModelNotLoaded => "MODEL_NOT_LOADED",
            ApiError::UnsupportedFormat => "UNSUPPORTED_FORMAT",
            ApiError::MissingColumns(_) => "MISSING_COLUMNS",
            ApiError::BadRequest(_) | ApiError::Common(CommonError::Parse(_)) => "BAD_REQUEST",
            ApiError::Internal(_) | ApiError::Common(_) | ApiError::Frame(_) => "INTERNAL_ERROR",
            ApiError::Stage { source, .. } => source.code(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = ?self, "Request failed: {}", self);
        }

        let body = Json(json!({
            "status": "error",
            "detail": self.to_string(),
            "code": self.code(),
        }));

        (status, body).into_response()
    }
}

/// Result type for API handlers and pipeline stages
pub type ApiResult<T> = Result<T, ApiError>;
