//! HTTP server setup with Axum

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};

use super::rest::{commands, queries};
use super::ws::ws_handler;
use super::AppState;

/// Create the Axum router with all endpoints
pub fn create_router(state: Arc<AppState>) -> Router {
    // CORS configuration - allow all origins for development
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // WebSocket event stream
        .route("/ws", get(ws_handler))
        // Health check
        .route("/health", get(health_check))
        // Commands
        .route("/api/file-models", post(commands::create_file_model))
        .route(
            "/api/file-models/:versionId/update",
            post(commands::update_file_model),
        )
        .route(
            "/api/file-models/:versionId/recon-date",
            post(commands::set_active_recon_date),
        )
        .route(
            "/api/file-models/:versionId/inactivate",
            post(commands::inactivate_file_model),
        )
        // Queries
        .route("/api/file-models/:versionId", get(queries::get_by_version))
        .route(
            "/api/file-models/:versionId/avro",
            get(queries::get_avro_schema),
        )
        .route("/api/files/:fileId/versions", get(queries::list_versions))
        .route("/api/files/:fileId/active", get(queries::get_active_as_of))
        .layer(cors)
        .with_state(state)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::FileModelRegistry;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::util::ServiceExt;

    fn test_state() -> Arc<AppState> {
        let registry = Arc::new(FileModelRegistry::new());
        Arc::new(AppState::new(registry))
    }

    #[tokio::test]
    async fn test_health_check() {
        let app = create_router(test_state());

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_create_then_get() {
        let state = test_state();
        let app = create_router(state);

        let body = serde_json::json!({
            "username": "dg",
            "note": "initial layout",
            "fileId": 231,
            "activeReconDate": "2018-01-31",
            "active": true,
            "fileModel": {
                "type": "csv",
                "numHeaderLines": 1,
                "numFooterLines": 0,
                "delimiter": ",",
                "columns": [
                    {"name": "accountId", "type": {"type": "int"}, "isIdentifier": true}
                ]
            }
        });

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/file-models")
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/file-models/0")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_unknown_version_is_404() {
        let app = create_router(test_state());

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/file-models/999")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
