//! API module for HTTP and WebSocket endpoints
//!
//! Thin adapter over the registry core: REST endpoints submit commands and
//! run queries, the WebSocket endpoint streams committed events. No domain
//! logic lives here.

pub mod http;
pub mod rest;
pub mod ws;

use std::sync::Arc;

use crate::registry::FileModelRegistry;
use crate::store::ModelStore;
use ws::EventBroadcaster;

pub use http::create_router;

/// Shared application state, wired once at startup
pub struct AppState {
    /// Command processor and event source
    pub registry: Arc<FileModelRegistry>,

    /// Read model answering the query endpoints; the registry's own
    /// in-memory store by default, a relational store when configured
    pub store: Arc<dyn ModelStore>,

    /// Bridge from the event bus to WebSocket clients
    pub events: Arc<EventBroadcaster>,
}

impl AppState {
    /// State backed by the registry's in-memory read model
    pub fn new(registry: Arc<FileModelRegistry>) -> Self {
        let store = registry.read_model();
        Self::with_store(registry, store)
    }

    /// State with an explicit query-side store
    pub fn with_store(registry: Arc<FileModelRegistry>, store: Arc<dyn ModelStore>) -> Self {
        let events = Arc::new(EventBroadcaster::new(1024));
        registry.event_bus().subscribe(events.clone());
        Self {
            registry,
            store,
            events,
        }
    }
}
