//! Versioned file model records
//!
//! A `VersionedFileModel` is the append-only unit of record: one immutable,
//! timestamped instance of a file model for a given file id, with its own
//! effective-date window. Revising a version never edits it in place; the
//! registry creates a successor and retires the original.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::file_model::FileModel;

/// Logical identifier of a data file
pub type FileId = u64;

/// Globally unique, monotonically increasing version identifier
pub type VersionId = u64;

/// One immutable version of a file model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionedFileModel {
    #[serde(rename = "fileId")]
    file_id: FileId,
    #[serde(rename = "versionId")]
    version_id: VersionId,
    active: bool,
    #[serde(rename = "activeReconDate")]
    active_recon_date: NaiveDate,
    #[serde(
        rename = "inactiveReconDate",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    inactive_recon_date: Option<NaiveDate>,
    #[serde(rename = "createdAt")]
    created_at: DateTime<Utc>,
    #[serde(rename = "createdBy")]
    created_by: String,
    #[serde(rename = "fileModel")]
    file_model: FileModel,
}

impl VersionedFileModel {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        file_id: FileId,
        version_id: VersionId,
        active: bool,
        active_recon_date: NaiveDate,
        inactive_recon_date: Option<NaiveDate>,
        created_at: DateTime<Utc>,
        created_by: impl Into<String>,
        file_model: FileModel,
    ) -> Self {
        Self {
            file_id,
            version_id,
            active,
            active_recon_date,
            inactive_recon_date,
            created_at,
            created_by: created_by.into(),
            file_model,
        }
    }

    pub fn file_id(&self) -> FileId {
        self.file_id
    }

    pub fn version_id(&self) -> VersionId {
        self.version_id
    }

    /// Whether this version is currently marked active
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// First reconciliation date this version governs
    pub fn active_recon_date(&self) -> NaiveDate {
        self.active_recon_date
    }

    /// Date this version stopped governing, set when it was superseded
    pub fn inactive_recon_date(&self) -> Option<NaiveDate> {
        self.inactive_recon_date
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn created_by(&self) -> &str {
        &self.created_by
    }

    pub fn file_model(&self) -> &FileModel {
        &self.file_model
    }

    /// A version is superseded once its inactive date has been recorded
    pub fn is_superseded(&self) -> bool {
        self.inactive_recon_date.is_some()
    }

    /// Copy of this version retired as of the given date: inactive, with the
    /// inactive recon date recorded. The original is left untouched.
    pub fn retired(&self, as_of: NaiveDate) -> Self {
        Self {
            active: false,
            inactive_recon_date: Some(as_of),
            ..self.clone()
        }
    }
}
