//! Commands accepted by the registry
//!
//! Every command carries a client-generated id plus the submitting user and
//! a free-form note. The update family references an existing version and
//! derives a successor from it; none of them ever edit a version in place.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::file_model::FileModel;
use super::version::{FileId, VersionId};

/// Register the first (or another parallel) version of a file's layout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateFileModel {
    pub id: Uuid,
    pub username: String,
    pub note: String,
    #[serde(rename = "fileId")]
    pub file_id: FileId,
    #[serde(rename = "activeReconDate")]
    pub active_recon_date: NaiveDate,
    pub active: bool,
    #[serde(rename = "fileModel")]
    pub file_model: FileModel,
}

impl CreateFileModel {
    pub fn new(
        username: impl Into<String>,
        note: impl Into<String>,
        file_id: FileId,
        active_recon_date: NaiveDate,
        active: bool,
        file_model: FileModel,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            username: username.into(),
            note: note.into(),
            file_id,
            active_recon_date,
            active,
            file_model,
        }
    }
}

/// Supersede an existing version with a copy carrying the given overrides
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateFileModel {
    pub id: Uuid,
    pub username: String,
    pub note: String,
    #[serde(rename = "versionId")]
    pub version_id: VersionId,
    #[serde(
        rename = "activeReconDate",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub active_recon_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
    #[serde(rename = "fileModel", default, skip_serializing_if = "Option::is_none")]
    pub file_model: Option<FileModel>,
}

impl UpdateFileModel {
    pub fn new(
        username: impl Into<String>,
        note: impl Into<String>,
        version_id: VersionId,
        active_recon_date: Option<NaiveDate>,
        active: Option<bool>,
        file_model: Option<FileModel>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            username: username.into(),
            note: note.into(),
            version_id,
            active_recon_date,
            active,
            file_model,
        }
    }
}

/// Supersede an existing version, changing only its effective date
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetActiveReconDate {
    pub id: Uuid,
    pub username: String,
    pub note: String,
    #[serde(rename = "versionId")]
    pub version_id: VersionId,
    #[serde(rename = "activeReconDate")]
    pub active_recon_date: NaiveDate,
}

impl SetActiveReconDate {
    pub fn new(
        username: impl Into<String>,
        note: impl Into<String>,
        version_id: VersionId,
        active_recon_date: NaiveDate,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            username: username.into(),
            note: note.into(),
            version_id,
            active_recon_date,
        }
    }
}

/// Supersede an existing version, turning it inactive
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InactivateFileModel {
    pub id: Uuid,
    pub username: String,
    pub note: String,
    #[serde(rename = "versionId")]
    pub version_id: VersionId,
}

impl InactivateFileModel {
    pub fn new(
        username: impl Into<String>,
        note: impl Into<String>,
        version_id: VersionId,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            username: username.into(),
            note: note.into(),
            version_id,
        }
    }
}

/// Any command the registry accepts, tagged by kind on the wire
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FileModelCommand {
    CreateFileModel(CreateFileModel),
    UpdateFileModel(UpdateFileModel),
    SetActiveReconDate(SetActiveReconDate),
    InactivateFileModel(InactivateFileModel),
}

impl FileModelCommand {
    /// Client-generated command id
    pub fn id(&self) -> Uuid {
        match self {
            FileModelCommand::CreateFileModel(c) => c.id,
            FileModelCommand::UpdateFileModel(c) => c.id,
            FileModelCommand::SetActiveReconDate(c) => c.id,
            FileModelCommand::InactivateFileModel(c) => c.id,
        }
    }

    /// User the command was submitted by
    pub fn username(&self) -> &str {
        match self {
            FileModelCommand::CreateFileModel(c) => &c.username,
            FileModelCommand::UpdateFileModel(c) => &c.username,
            FileModelCommand::SetActiveReconDate(c) => &c.username,
            FileModelCommand::InactivateFileModel(c) => &c.username,
        }
    }

    /// Free-form note attached to the command
    pub fn note(&self) -> &str {
        match self {
            FileModelCommand::CreateFileModel(c) => &c.note,
            FileModelCommand::UpdateFileModel(c) => &c.note,
            FileModelCommand::SetActiveReconDate(c) => &c.note,
            FileModelCommand::InactivateFileModel(c) => &c.note,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ColumnType, CsvColumn, CsvFileModel};

    #[test]
    fn test_command_serialization_tag() {
        let cmd = FileModelCommand::InactivateFileModel(InactivateFileModel::new("dg", "", 7));
        let json = serde_json::to_string(&cmd).unwrap();
        assert!(json.contains(r#""type":"inactivate_file_model""#));
        assert!(json.contains(r#""versionId":7"#));

        let parsed: FileModelCommand = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.id(), cmd.id());
    }

    #[test]
    fn test_fresh_commands_get_distinct_ids() {
        let model = FileModel::Csv(
            CsvFileModel::new(
                0,
                0,
                ",",
                vec![CsvColumn::new("accountId", ColumnType::int(), true).unwrap()],
            )
            .unwrap(),
        );
        let a = CreateFileModel::new(
            "dg",
            "",
            1,
            chrono::NaiveDate::from_ymd_opt(2018, 1, 1).unwrap(),
            true,
            model.clone(),
        );
        let b = CreateFileModel::new(
            "dg",
            "",
            1,
            chrono::NaiveDate::from_ymd_opt(2018, 1, 1).unwrap(),
            true,
            model,
        );
        assert_ne!(a.id, b.id);
    }
}
