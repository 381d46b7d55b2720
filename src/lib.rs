//! File Model Registry
//!
//! A registry of versioned structural descriptions of tabular data files:
//! CSV and fixed-width layouts with typed columns. Clients submit commands
//! to create or supersede a file model version; the registry assigns
//! immutable, strictly increasing version ids, publishes change events, and
//! answers temporal queries such as "which layout governed this file on
//! date D?".
//!
//! # Modules
//!
//! - `types`: Core data structures (file models, columns, versions,
//!   commands, events)
//! - `registry`: Command processing, id assignment, copy-on-write
//!   supersession
//! - `bus`: In-process event bus with subscriber isolation
//! - `store`: Read model - event-driven in-memory store behind the
//!   `ModelStore` trait
//! - `db`: Relational read path (row adaptation, recon-date codec)
//! - `avro`: Export of file models to Avro record schemas
//! - `api`: HTTP/WebSocket adapter over the core
//!
//! # Example
//!
//! ```
//! use chrono::NaiveDate;
//! use filemodel_registry::types::{
//!     ColumnType, CreateFileModel, CsvColumn, CsvFileModel, FileModel,
//! };
//! use filemodel_registry::FileModelRegistry;
//!
//! let registry = FileModelRegistry::new();
//!
//! let layout = FileModel::Csv(
//!     CsvFileModel::new(
//!         1,
//!         0,
//!         ",",
//!         vec![CsvColumn::new("accountId", ColumnType::int(), true).unwrap()],
//!     )
//!     .unwrap(),
//! );
//! let date = NaiveDate::from_ymd_opt(2018, 1, 31).unwrap();
//!
//! let version_id = registry
//!     .create_file_model(CreateFileModel::new("dg", "initial", 231, date, true, layout))
//!     .unwrap();
//! assert_eq!(version_id, 0);
//! assert!(registry.get_by_version(version_id).unwrap().is_some());
//! ```

pub mod api;
pub mod avro;
pub mod bus;
pub mod db;
pub mod error;
pub mod registry;
pub mod store;
pub mod types;

// Re-export commonly used items at crate root
pub use bus::{EventBus, EventSubscriber};
pub use db::SqlModelStore;
pub use error::{RegistryError, RegistryResult};
pub use registry::FileModelRegistry;
pub use store::{MemoryModelStore, ModelStore};
pub use types::{
    ColumnType, CsvColumn, CsvFileModel, FileId, FileModel, FileModelCommand, FileModelEvent,
    FixedWidthColumn, FixedWidthFileModel, ValidationError, VersionId, VersionedFileModel,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
