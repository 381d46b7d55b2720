//! REST API module for HTTP endpoints
//!
//! Command and query endpoints over the registry:
//! - `POST /api/file-models` - register a new file model version
//! - `POST /api/file-models/:versionId/update` - supersede a version
//! - `POST /api/file-models/:versionId/recon-date` - change effective date
//! - `POST /api/file-models/:versionId/inactivate` - retire a version
//! - `GET /api/file-models/:versionId` - point lookup
//! - `GET /api/file-models/:versionId/avro` - exported Avro schema
//! - `GET /api/files/:fileId/versions` - version history
//! - `GET /api/files/:fileId/active?date=` - temporal resolution

pub mod commands;
pub mod queries;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::error::RegistryError;

/// Standard API response wrapper
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    /// Response data
    pub data: T,
    /// Current event sequence id for cache invalidation
    pub sequence_id: u64,
}

impl<T> ApiResponse<T> {
    pub fn new(data: T, sequence_id: u64) -> Self {
        Self { data, sequence_id }
    }
}

/// API error response
#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: String,
    pub code: String,
}

impl ApiError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
            code: "NOT_FOUND".to_string(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
            code: "BAD_REQUEST".to_string(),
        }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
            code: "CONFLICT".to_string(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
            code: "INTERNAL_ERROR".to_string(),
        }
    }
}

/// Map a registry error to its HTTP representation
pub(crate) fn error_response(err: RegistryError) -> Response {
    let (status, body) = match &err {
        RegistryError::Validation(_) => {
            (StatusCode::BAD_REQUEST, ApiError::bad_request(err.to_string()))
        }
        RegistryError::VersionNotFound(_) => {
            (StatusCode::NOT_FOUND, ApiError::not_found(err.to_string()))
        }
        RegistryError::Superseded(_) => (StatusCode::CONFLICT, ApiError::conflict(err.to_string())),
        RegistryError::Storage(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::internal(err.to_string()),
        ),
    };
    (status, Json(body)).into_response()
}
