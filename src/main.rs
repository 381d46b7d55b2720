//! File Model Registry - Binary Entry Point
//!
//! Wires the registry context, optionally swaps the query path onto a
//! SQLite backing store, and serves the HTTP/WebSocket API until Ctrl+C.

use std::env;
use std::sync::Arc;

use filemodel_registry::api::{create_router, AppState};
use filemodel_registry::store::ModelStore;
use filemodel_registry::{FileModelRegistry, SqlModelStore};

#[tokio::main]
async fn main() {
    env_logger::init();

    let bind_addr =
        env::var("FILEMODEL_BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:3000".to_string());

    let registry = Arc::new(FileModelRegistry::new());

    // Queries go to the in-memory read model unless a relational backing
    // store is configured.
    let state = match env::var("FILEMODEL_DB_PATH") {
        Ok(path) => {
            log::info!("serving queries from relational store at {}", path);
            let store = match SqlModelStore::open(&path) {
                Ok(store) => store,
                Err(err) => {
                    log::error!("failed to open {}: {}", path, err);
                    std::process::exit(1);
                }
            };
            if let Err(err) = store.init_schema() {
                log::error!("failed to initialize schema in {}: {}", path, err);
                std::process::exit(1);
            }
            let store: Arc<dyn ModelStore> = Arc::new(store);
            Arc::new(AppState::with_store(registry, store))
        }
        Err(_) => Arc::new(AppState::new(registry)),
    };

    let app = create_router(state);

    let listener = match tokio::net::TcpListener::bind(&bind_addr).await {
        Ok(listener) => listener,
        Err(err) => {
            log::error!("failed to bind {}: {}", bind_addr, err);
            std::process::exit(1);
        }
    };
    log::info!("file model registry listening on {}", bind_addr);

    if let Err(err) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        log::error!("server error: {}", err);
        std::process::exit(1);
    }
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    log::info!("shutting down");
}
