//! Versioned model stores (read model)
//!
//! A model store answers point and temporal queries over versioned file
//! models. Two backings exist behind the same trait: the event-driven
//! in-memory store (`MemoryModelStore`) that subscribes to the bus, and the
//! relational store (`SqlModelStore` in [`crate::db`]) that adapts rows from
//! a backing database.

mod memory;

use chrono::NaiveDate;

use crate::error::RegistryResult;
use crate::types::{FileId, VersionId, VersionedFileModel};

pub use memory::MemoryModelStore;

/// Read-only queries over versioned file models
pub trait ModelStore: Send + Sync {
    /// Look up one version by id; `None` when the id is unknown
    fn get_by_version(&self, version_id: VersionId) -> RegistryResult<Option<VersionedFileModel>>;

    /// Resolve the version of `file_id` governing `date`: the one with the
    /// greatest active recon date not after `date`, ties broken by latest
    /// creation timestamp. `None` when no version qualifies.
    fn get_active_as_of(
        &self,
        file_id: FileId,
        date: NaiveDate,
    ) -> RegistryResult<Option<VersionedFileModel>>;

    /// All versions of `file_id` in creation order; empty when the file id
    /// is unknown
    fn list_versions(&self, file_id: FileId) -> RegistryResult<Vec<VersionedFileModel>>;
}
