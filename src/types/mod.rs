//! Data types for the file model registry
//!
//! This module contains all the core data structures used throughout the
//! application: column and file model descriptions, versioned records, and
//! the command/event vocabulary.

mod column;
mod command;
mod event;
mod file_model;
mod version;

pub use column::{ColumnType, DEFAULT_DATE_FORMAT};
pub use command::{
    CreateFileModel, FileModelCommand, InactivateFileModel, SetActiveReconDate, UpdateFileModel,
};
pub use event::FileModelEvent;
pub use file_model::{
    CsvColumn, CsvFileModel, FileModel, FixedWidthColumn, FixedWidthFileModel, ValidationError,
};
pub use version::{FileId, VersionId, VersionedFileModel};
