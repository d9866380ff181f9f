//! Single-stage handlers operating on a table sent in the request.

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use prepline::{CleaningReport, PreplineError, Stage, Table, TransformReport};
use serde::{Deserialize, Serialize};

use crate::server::error::ApiError;
use crate::server::state::AppState;

/// Request body carrying a table; an absent table is a `no_input` error.
#[derive(Debug, Default, Deserialize)]
pub struct TableRequest {
    #[serde(default)]
    pub table: Option<Table>,
}

/// Response for the clean endpoint.
#[derive(Serialize)]
pub struct CleanResponse {
    pub table: Table,
    pub report: CleaningReport,
}

/// Response for the transform endpoint.
#[derive(Serialize)]
pub struct TransformResponse {
    pub table: Table,
    pub report: TransformReport,
}

fn require_table(request: TableRequest, stage: Stage) -> Result<Table, ApiError> {
    request
        .table
        .ok_or(ApiError::Pipeline(PreplineError::NoInput { stage }))
}

/// Fill missing values and drop duplicates.
pub async fn clean_table(
    State(state): State<AppState>,
    payload: Result<Json<TableRequest>, JsonRejection>,
) -> Result<Json<CleanResponse>, ApiError> {
    let Json(request) = payload?;
    let table = require_table(request, Stage::Clean)?;

    let pipeline = state.pipeline.clone();
    let (table, report) = tokio::task::spawn_blocking(move || pipeline.clean(&table))
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))??;

    Ok(Json(CleanResponse { table, report }))
}

/// Scale numeric columns and one-hot encode categorical ones.
pub async fn transform_table(
    State(state): State<AppState>,
    payload: Result<Json<TableRequest>, JsonRejection>,
) -> Result<Json<TransformResponse>, ApiError> {
    let Json(request) = payload?;
    let table = require_table(request, Stage::Transform)?;

    let pipeline = state.pipeline.clone();
    let (table, report) = tokio::task::spawn_blocking(move || pipeline.transform(&table))
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))??;

    Ok(Json(TransformResponse { table, report }))
}
