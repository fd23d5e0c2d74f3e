//! Dataset upload endpoint

use axum::{
    extract::{Multipart, State},
    routing::post,
    Json, Router,
};
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, info};

use super::run_blocking;
use crate::dataset::{ingest, OrderedMap};
use crate::error::{ApiError, ApiResult};
use crate::AppState;

/// Multipart field carrying the file
pub const FILE_FIELD: &str = "file";

/// Rows echoed back after an upload
pub const PREVIEW_ROWS: usize = 5;

#[derive(Debug, Serialize)]
pub struct Shape {
    pub rows: usize,
    pub cols: usize,
}

/// POST /upload response
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub status: &'static str,
    pub message: String,
    pub rows: usize,
    pub columns: Vec<String>,
    pub shape: Shape,
    pub missing_values: OrderedMap<usize>,
    pub preview: Vec<Map<String, Value>>,
}

/// POST /upload
///
/// Parses and validates the file, then replaces the session table. A
/// rejected upload leaves the previous table in place.
pub async fn upload_file(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> ApiResult<Json<UploadResponse>> {
    let (filename, bytes) = read_file_field(&mut multipart).await?;
    debug!("Received upload {} ({} bytes)", filename, bytes.len());

    let name = filename.clone();
    let dataset = run_blocking("Upload", move || ingest::load_upload(&name, &bytes)).await?;
    let dataset = state.session.replace(dataset).await;

    info!(
        "Session table replaced from {}: {} rows x {} columns",
        filename,
        dataset.n_rows(),
        dataset.n_cols()
    );

    Ok(Json(UploadResponse {
        status: "success",
        message: format!("File uploaded: {}", filename),
        rows: dataset.n_rows(),
        columns: dataset.columns(),
        shape: Shape {
            rows: dataset.n_rows(),
            cols: dataset.n_cols(),
        },
        missing_values: dataset.missing_counts(),
        preview: dataset.preview(PREVIEW_ROWS),
    }))
}

/// Pull the file name and contents of the `file` field
async fn read_file_field(multipart: &mut Multipart) -> ApiResult<(String, Vec<u8>)> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(e.body_text()))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        let filename = field.file_name().unwrap_or_default().to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::BadRequest(e.body_text()))?;
        return Ok((filename, bytes.to_vec()));
    }

    Err(ApiError::BadRequest(format!(
        "Missing multipart field '{}'",
        FILE_FIELD
    )))
}

/// Build upload routes
pub fn upload_routes() -> Router<AppState> {
    Router::new().route("/upload", post(upload_file))
}
