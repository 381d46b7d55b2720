//! Domain events published by the registry
//!
//! Events are immutable notifications of committed transitions. A
//! supersession travels as one composite event so subscribers can apply the
//! retirement and the successor atomically.

use serde::{Deserialize, Serialize};

use super::command::FileModelCommand;
use super::version::{FileId, VersionedFileModel};

/// Notification of a registry state transition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FileModelEvent {
    /// A new version was registered
    Created { version: VersionedFileModel },

    /// An update retired one version and created its successor. Both sides
    /// of the transition are carried together; subscribers must apply them
    /// as one unit.
    Superseded {
        retired: VersionedFileModel,
        successor: VersionedFileModel,
    },

    /// A command was rejected; carries the offending command and the reason
    CommandRejected {
        command: FileModelCommand,
        reason: String,
    },
}

impl FileModelEvent {
    /// File id the event concerns, when it concerns one
    pub fn file_id(&self) -> Option<FileId> {
        match self {
            FileModelEvent::Created { version } => Some(version.file_id()),
            FileModelEvent::Superseded { successor, .. } => Some(successor.file_id()),
            FileModelEvent::CommandRejected { command, .. } => match command {
                FileModelCommand::CreateFileModel(c) => Some(c.file_id),
                _ => None,
            },
        }
    }
}
