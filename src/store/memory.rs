//! In-memory read model fed by the event bus
//!
//! Keeps the primary version map and the per-file creation-order index
//! under one lock, so each event applies atomically with respect to
//! concurrent readers: a query never observes a supersession half-applied.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::NaiveDate;
use parking_lot::RwLock;

use crate::bus::{EventBus, EventSubscriber};
use crate::error::RegistryResult;
use crate::store::ModelStore;
use crate::types::{FileId, FileModelEvent, VersionId, VersionedFileModel};

#[derive(Default)]
struct StoreState {
    versions: HashMap<VersionId, VersionedFileModel>,
    by_file: HashMap<FileId, Vec<VersionId>>,
}

impl StoreState {
    fn insert(&mut self, version: VersionedFileModel) {
        let file_id = version.file_id();
        let version_id = version.version_id();
        if self.versions.insert(version_id, version).is_none() {
            self.by_file.entry(file_id).or_default().push(version_id);
        }
    }
}

/// Event-driven in-memory store
#[derive(Default)]
pub struct MemoryModelStore {
    state: RwLock<StoreState>,
}

impl MemoryModelStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store and register it on the bus
    pub fn subscribed_to(bus: &EventBus) -> Arc<Self> {
        let store = Arc::new(Self::new());
        bus.subscribe(store.clone());
        store
    }

    /// Apply one event. Supersessions replace the retired entry and insert
    /// the successor under a single write lock.
    pub fn apply(&self, event: &FileModelEvent) {
        match event {
            FileModelEvent::Created { version } => {
                self.state.write().insert(version.clone());
            }
            FileModelEvent::Superseded { retired, successor } => {
                let mut state = self.state.write();
                state.insert(retired.clone());
                state.insert(successor.clone());
            }
            FileModelEvent::CommandRejected { command, reason } => {
                log::debug!("command {} rejected: {}", command.id(), reason);
            }
        }
    }

    /// Number of versions held across all file ids
    pub fn len(&self) -> usize {
        self.state.read().versions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.read().versions.is_empty()
    }
}

impl EventSubscriber for MemoryModelStore {
    fn name(&self) -> &str {
        "memory-model-store"
    }

    fn on_event(&self, event: &FileModelEvent) {
        self.apply(event);
    }
}

impl ModelStore for MemoryModelStore {
    fn get_by_version(&self, version_id: VersionId) -> RegistryResult<Option<VersionedFileModel>> {
        Ok(self.state.read().versions.get(&version_id).cloned())
    }

    fn get_active_as_of(
        &self,
        file_id: FileId,
        date: NaiveDate,
    ) -> RegistryResult<Option<VersionedFileModel>> {
        let state = self.state.read();
        let ids = match state.by_file.get(&file_id) {
            Some(ids) => ids,
            None => return Ok(None),
        };

        let best = ids
            .iter()
            .filter_map(|id| state.versions.get(id))
            .filter(|v| v.active_recon_date() <= date)
            .max_by_key(|v| (v.active_recon_date(), v.created_at()));

        Ok(best.cloned())
    }

    fn list_versions(&self, file_id: FileId) -> RegistryResult<Vec<VersionedFileModel>> {
        let state = self.state.read();
        let versions = state
            .by_file
            .get(&file_id)
            .map(|ids| {
                ids.iter()
                    .filter_map(|id| state.versions.get(id))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        Ok(versions)
    }
}
