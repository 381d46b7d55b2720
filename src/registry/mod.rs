//! File model registry - command processing core
//!
//! The registry is the single explicitly constructed context object holding
//! the process-wide mutable state: the shared version-id counter, the event
//! bus, and the event-driven read model. It is the sole writer of domain
//! state; every mutation goes through a command, allocates exactly one
//! version id, and publishes exactly one event before returning.

mod commands;

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::NaiveDate;
use parking_lot::Mutex;

use crate::bus::EventBus;
use crate::error::RegistryResult;
use crate::store::{MemoryModelStore, ModelStore};
use crate::types::{
    CreateFileModel, FileId, FileModelCommand, InactivateFileModel, SetActiveReconDate,
    UpdateFileModel, VersionId, VersionedFileModel,
};

/// Command processor and query front for versioned file models
pub struct FileModelRegistry {
    pub(crate) bus: Arc<EventBus>,
    pub(crate) read_model: Arc<MemoryModelStore>,
    next_version_id: AtomicU64,
    /// Serializes command handling end to end (lookup, derive, publish), so
    /// two updates can never both supersede the same version.
    pub(crate) command_guard: Mutex<()>,
}

impl FileModelRegistry {
    /// Create a registry with its own bus and read model
    pub fn new() -> Self {
        Self::with_bus(Arc::new(EventBus::new()))
    }

    /// Create a registry publishing on an existing bus. The read model is
    /// subscribed before any command can run, so it observes every event.
    pub fn with_bus(bus: Arc<EventBus>) -> Self {
        let read_model = MemoryModelStore::subscribed_to(&bus);
        Self {
            bus,
            read_model,
            next_version_id: AtomicU64::new(0),
            command_guard: Mutex::new(()),
        }
    }

    /// The bus this registry publishes on
    pub fn event_bus(&self) -> &Arc<EventBus> {
        &self.bus
    }

    /// The event-driven read model fed by this registry
    pub fn read_model(&self) -> Arc<MemoryModelStore> {
        self.read_model.clone()
    }

    /// Atomic fetch-and-increment of the shared version counter
    pub(crate) fn allocate_version_id(&self) -> VersionId {
        self.next_version_id.fetch_add(1, Ordering::SeqCst)
    }

    // Commands ---------------

    /// Dispatch any command to its typed handler
    pub fn submit(&self, command: FileModelCommand) -> RegistryResult<VersionId> {
        match command {
            FileModelCommand::CreateFileModel(cmd) => self.create_file_model(cmd),
            FileModelCommand::UpdateFileModel(cmd) => self.update_file_model(cmd),
            FileModelCommand::SetActiveReconDate(cmd) => self.set_active_recon_date(cmd),
            FileModelCommand::InactivateFileModel(cmd) => self.inactivate_file_model(cmd),
        }
    }

    /// Register a new version; returns its freshly assigned id
    pub fn create_file_model(&self, cmd: CreateFileModel) -> RegistryResult<VersionId> {
        commands::create_file_model(self, cmd)
    }

    /// Supersede a version with a copy carrying the command's overrides
    pub fn update_file_model(&self, cmd: UpdateFileModel) -> RegistryResult<VersionId> {
        commands::update_file_model(self, cmd)
    }

    /// Supersede a version, changing only its effective date
    pub fn set_active_recon_date(&self, cmd: SetActiveReconDate) -> RegistryResult<VersionId> {
        commands::set_active_recon_date(self, cmd)
    }

    /// Supersede a version, turning it inactive
    pub fn inactivate_file_model(&self, cmd: InactivateFileModel) -> RegistryResult<VersionId> {
        commands::inactivate_file_model(self, cmd)
    }

    // Queries ----------------

    pub fn get_by_version(&self, version_id: VersionId) -> RegistryResult<Option<VersionedFileModel>> {
        self.read_model.get_by_version(version_id)
    }

    pub fn get_active_as_of(
        &self,
        file_id: FileId,
        date: NaiveDate,
    ) -> RegistryResult<Option<VersionedFileModel>> {
        self.read_model.get_active_as_of(file_id, date)
    }

    pub fn list_versions(&self, file_id: FileId) -> RegistryResult<Vec<VersionedFileModel>> {
        self.read_model.list_versions(file_id)
    }
}

impl Default for FileModelRegistry {
    fn default() -> Self {
        Self::new()
    }
}
