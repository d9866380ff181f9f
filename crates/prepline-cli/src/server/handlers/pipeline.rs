//! Full pipeline handler.

use std::path::PathBuf;

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use prepline::PipelineResult;
use serde::Deserialize;
use tracing::info;

use crate::server::error::ApiError;
use crate::server::state::AppState;

/// Request body naming a file on the server.
#[derive(Debug, Deserialize)]
pub struct FilePathRequest {
    pub file_path: PathBuf,
}

/// Run ingest, clean and transform on a server-side file.
pub async fn run_pipeline(
    State(state): State<AppState>,
    payload: Result<Json<FilePathRequest>, JsonRejection>,
) -> Result<Json<PipelineResult>, ApiError> {
    let Json(request) = payload?;
    info!(file = %request.file_path.display(), "Running pipeline");

    let pipeline = state.pipeline.clone();
    let result = tokio::task::spawn_blocking(move || pipeline.run(&request.file_path))
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))??;

    Ok(Json(result))
}
