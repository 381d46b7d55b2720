//! Command endpoints

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::error_response;
use crate::api::AppState;
use crate::types::{
    CreateFileModel, FileId, FileModel, InactivateFileModel, SetActiveReconDate, UpdateFileModel,
    VersionId,
};

/// Accepted command result carrying the assigned version id
#[derive(Debug, Serialize)]
pub struct CommandAccepted {
    #[serde(rename = "versionId")]
    pub version_id: VersionId,
}

fn default_active() -> bool {
    true
}

/// Body of `POST /api/file-models`
#[derive(Debug, Deserialize)]
pub struct CreateFileModelRequest {
    pub username: String,
    #[serde(default)]
    pub note: String,
    #[serde(rename = "fileId")]
    pub file_id: FileId,
    #[serde(rename = "activeReconDate")]
    pub active_recon_date: NaiveDate,
    #[serde(default = "default_active")]
    pub active: bool,
    #[serde(rename = "fileModel")]
    pub file_model: FileModel,
}

/// POST /api/file-models - register a new file model version
pub async fn create_file_model(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateFileModelRequest>,
) -> impl IntoResponse {
    let cmd = CreateFileModel::new(
        req.username,
        req.note,
        req.file_id,
        req.active_recon_date,
        req.active,
        req.file_model,
    );

    match state.registry.create_file_model(cmd) {
        Ok(version_id) => (
            StatusCode::CREATED,
            Json(CommandAccepted { version_id }),
        )
            .into_response(),
        Err(err) => error_response(err),
    }
}

/// Body of `POST /api/file-models/:versionId/update`
#[derive(Debug, Deserialize)]
pub struct UpdateFileModelRequest {
    pub username: String,
    #[serde(default)]
    pub note: String,
    #[serde(rename = "activeReconDate", default)]
    pub active_recon_date: Option<NaiveDate>,
    #[serde(default)]
    pub active: Option<bool>,
    #[serde(rename = "fileModel", default)]
    pub file_model: Option<FileModel>,
}

/// POST /api/file-models/:versionId/update - supersede a version
pub async fn update_file_model(
    State(state): State<Arc<AppState>>,
    Path(version_id): Path<VersionId>,
    Json(req): Json<UpdateFileModelRequest>,
) -> impl IntoResponse {
    let cmd = UpdateFileModel::new(
        req.username,
        req.note,
        version_id,
        req.active_recon_date,
        req.active,
        req.file_model,
    );

    match state.registry.update_file_model(cmd) {
        Ok(version_id) => (
            StatusCode::CREATED,
            Json(CommandAccepted { version_id }),
        )
            .into_response(),
        Err(err) => error_response(err),
    }
}

/// Body of `POST /api/file-models/:versionId/recon-date`
#[derive(Debug, Deserialize)]
pub struct SetReconDateRequest {
    pub username: String,
    #[serde(default)]
    pub note: String,
    #[serde(rename = "activeReconDate")]
    pub active_recon_date: NaiveDate,
}

/// POST /api/file-models/:versionId/recon-date - change the effective date
pub async fn set_active_recon_date(
    State(state): State<Arc<AppState>>,
    Path(version_id): Path<VersionId>,
    Json(req): Json<SetReconDateRequest>,
) -> impl IntoResponse {
    let cmd = SetActiveReconDate::new(req.username, req.note, version_id, req.active_recon_date);

    match state.registry.set_active_recon_date(cmd) {
        Ok(version_id) => (
            StatusCode::CREATED,
            Json(CommandAccepted { version_id }),
        )
            .into_response(),
        Err(err) => error_response(err),
    }
}

/// Body of `POST /api/file-models/:versionId/inactivate`
#[derive(Debug, Deserialize)]
pub struct InactivateRequest {
    pub username: String,
    #[serde(default)]
    pub note: String,
}

/// POST /api/file-models/:versionId/inactivate - retire a version
pub async fn inactivate_file_model(
    State(state): State<Arc<AppState>>,
    Path(version_id): Path<VersionId>,
    Json(req): Json<InactivateRequest>,
) -> impl IntoResponse {
    let cmd = InactivateFileModel::new(req.username, req.note, version_id);

    match state.registry.inactivate_file_model(cmd) {
        Ok(version_id) => (
            StatusCode::CREATED,
            Json(CommandAccepted { version_id }),
        )
            .into_response(),
        Err(err) => error_response(err),
    }
}
