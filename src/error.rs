//! Error types for registry operations

use thiserror::Error;

use crate::db::DbError;
use crate::types::{ValidationError, VersionId};

/// Result type for registry operations
pub type RegistryResult<T> = Result<T, RegistryError>;

/// Errors surfaced by commands and queries
#[derive(Debug, Error)]
pub enum RegistryError {
    /// A file model invariant was violated before any side effect
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A command or query referenced a version id that does not exist
    #[error("file model version {0} not found")]
    VersionNotFound(VersionId),

    /// An update referenced a version that another update already retired
    #[error("file model version {0} has already been superseded")]
    Superseded(VersionId),

    /// The backing store failed while reading or adapting rows
    #[error("storage error: {0}")]
    Storage(#[from] DbError),
}
