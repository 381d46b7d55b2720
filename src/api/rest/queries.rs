//! Query endpoints

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;

use super::{error_response, ApiError, ApiResponse};
use crate::api::AppState;
use crate::avro::to_avro_schema;
use crate::store::ModelStore;
use crate::types::{FileId, VersionId};

/// GET /api/file-models/:versionId - point lookup
pub async fn get_by_version(
    State(state): State<Arc<AppState>>,
    Path(version_id): Path<VersionId>,
) -> impl IntoResponse {
    match state.store.get_by_version(version_id) {
        Ok(Some(version)) => {
            let sequence_id = state.events.current_sequence_id();
            (StatusCode::OK, Json(ApiResponse::new(version, sequence_id))).into_response()
        }
        Ok(None) => not_found(version_id),
        Err(err) => error_response(err),
    }
}

/// GET /api/file-models/:versionId/avro - exported Avro schema
pub async fn get_avro_schema(
    State(state): State<Arc<AppState>>,
    Path(version_id): Path<VersionId>,
) -> impl IntoResponse {
    match state.store.get_by_version(version_id) {
        Ok(Some(version)) => {
            (StatusCode::OK, Json(to_avro_schema(version.file_model()))).into_response()
        }
        Ok(None) => not_found(version_id),
        Err(err) => error_response(err),
    }
}

/// GET /api/files/:fileId/versions - version history in creation order
pub async fn list_versions(
    State(state): State<Arc<AppState>>,
    Path(file_id): Path<FileId>,
) -> impl IntoResponse {
    match state.store.list_versions(file_id) {
        Ok(versions) => {
            let sequence_id = state.events.current_sequence_id();
            (StatusCode::OK, Json(ApiResponse::new(versions, sequence_id))).into_response()
        }
        Err(err) => error_response(err),
    }
}

/// Query parameters for temporal resolution
#[derive(Debug, Deserialize)]
pub struct ActiveAsOfParams {
    /// Reconciliation date to resolve, `YYYY-MM-DD`
    pub date: NaiveDate,
}

/// GET /api/files/:fileId/active?date= - version governing the given date
pub async fn get_active_as_of(
    State(state): State<Arc<AppState>>,
    Path(file_id): Path<FileId>,
    Query(params): Query<ActiveAsOfParams>,
) -> impl IntoResponse {
    match state.store.get_active_as_of(file_id, params.date) {
        Ok(Some(version)) => {
            let sequence_id = state.events.current_sequence_id();
            (StatusCode::OK, Json(ApiResponse::new(version, sequence_id))).into_response()
        }
        Ok(None) => {
            let error = ApiError::not_found(format!(
                "no version of file {} is active as of {}",
                file_id, params.date
            ));
            (StatusCode::NOT_FOUND, Json(error)).into_response()
        }
        Err(err) => error_response(err),
    }
}

fn not_found(version_id: VersionId) -> axum::response::Response {
    let error = ApiError::not_found(format!("file model version {} not found", version_id));
    (StatusCode::NOT_FOUND, Json(error)).into_response()
}
