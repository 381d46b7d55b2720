//! Relational backing for the read model
//!
//! `SqlModelStore` answers the same queries as the in-memory store, but
//! against a relational schema: one header table keyed by version id and one
//! column table keyed by (version, position). Reads adapt rows through
//! [`adapter`] and the recon-date codec in [`recon_date`]; the store never
//! writes domain state.

mod adapter;
pub mod recon_date;

use chrono::{DateTime, NaiveDate, Utc};
use parking_lot::Mutex;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use thiserror::Error;

use crate::error::RegistryResult;
use crate::store::ModelStore;
use crate::types::{FileId, ValidationError, VersionId, VersionedFileModel};

use adapter::{adapt_version, ColumnRow, FileModelRow};

/// Result type for relational store operations
pub type DbResult<T> = Result<T, DbError>;

/// Errors raised while reading or adapting stored rows. Adaptation errors
/// are fatal for the version under adaptation and always name it.
#[derive(Debug, Error)]
pub enum DbError {
    /// CSV-typed header row without a delimiter
    #[error("null delimiter in csv file model  file:{file_id}  version:{version_id}")]
    MissingDelimiter {
        file_id: FileId,
        version_id: VersionId,
    },

    /// Header row with an unrecognized `Type` discriminator
    #[error("unrecognized file model type '{value}'  file:{file_id}  version:{version_id}")]
    UnknownModelType {
        value: String,
        file_id: FileId,
        version_id: VersionId,
    },

    /// Column row with an unrecognized `DataType` value
    #[error("unrecognized column data type '{value}'  file:{file_id}  version:{version_id}")]
    UnknownDataType {
        value: String,
        file_id: FileId,
        version_id: VersionId,
    },

    /// Header row with a NULL active recon date
    #[error("missing active recon date  file:{file_id}  version:{version_id}")]
    MissingReconDate {
        file_id: FileId,
        version_id: VersionId,
    },

    /// Stored rows violate a file model invariant
    #[error("invalid stored file model  file:{file_id}  version:{version_id}: {source}")]
    InvalidModel {
        file_id: FileId,
        version_id: VersionId,
        #[source]
        source: ValidationError,
    },

    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Read-only model store over a relational database
pub struct SqlModelStore {
    conn: Mutex<Connection>,
}

impl SqlModelStore {
    /// Open a store over a database file
    pub fn open(path: impl AsRef<Path>) -> DbResult<Self> {
        Ok(Self::from_connection(Connection::open(path)?))
    }

    /// Open a store over a fresh in-memory database
    pub fn open_in_memory() -> DbResult<Self> {
        Ok(Self::from_connection(Connection::open_in_memory()?))
    }

    /// Wrap an existing connection
    pub fn from_connection(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }

    /// Create the backing tables if they do not exist yet
    pub fn init_schema(&self) -> DbResult<()> {
        let conn = self.conn.lock();
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS FileModelsHistory (
                 Version         INTEGER PRIMARY KEY,
                 FileId          INTEGER NOT NULL,
                 ActiveReconDate INTEGER,
                 Type            TEXT    NOT NULL,
                 Delimiter       TEXT,
                 HeaderLines     INTEGER NOT NULL DEFAULT 0,
                 FooterLines     INTEGER NOT NULL DEFAULT 0,
                 Active          INTEGER NOT NULL DEFAULT 1,
                 Created         TEXT    NOT NULL,
                 Useable         INTEGER NOT NULL DEFAULT 1
             );
             CREATE INDEX IF NOT EXISTS IdxFileModelsHistoryFile
                 ON FileModelsHistory (FileId, ActiveReconDate);
             CREATE TABLE IF NOT EXISTS FileModelColumns (
                 FileModelVersion INTEGER NOT NULL,
                 Position         INTEGER NOT NULL,
                 Name             TEXT    NOT NULL,
                 Identifier       INTEGER NOT NULL DEFAULT 0,
                 Nullable         INTEGER NOT NULL DEFAULT 0,
                 DataType         TEXT    NOT NULL,
                 Length           INTEGER NOT NULL DEFAULT 0,
                 Format           TEXT,
                 PRIMARY KEY (FileModelVersion, Position)
             );",
        )?;
        Ok(())
    }

    fn load_version(
        &self,
        conn: &Connection,
        version_id: VersionId,
    ) -> DbResult<Option<VersionedFileModel>> {
        let header = match self.header_row(conn, version_id)? {
            Some(header) => header,
            None => return Ok(None),
        };
        let columns = self.column_rows(conn, version_id)?;
        Ok(Some(adapt_version(&header, &columns)?))
    }

    fn header_row(
        &self,
        conn: &Connection,
        version_id: VersionId,
    ) -> DbResult<Option<FileModelRow>> {
        let mut stmt = conn.prepare(
            "SELECT FileId, ActiveReconDate, Version, Type, Delimiter,
                    HeaderLines, FooterLines, Active, Created
             FROM FileModelsHistory
             WHERE Version = ?1",
        )?;

        let row = stmt
            .query_row(params![version_id], |row| {
                Ok((
                    row.get::<_, FileId>("FileId")?,
                    row.get::<_, Option<i32>>("ActiveReconDate")?,
                    row.get::<_, VersionId>("Version")?,
                    row.get::<_, String>("Type")?,
                    row.get::<_, Option<String>>("Delimiter")?,
                    row.get::<_, u32>("HeaderLines")?,
                    row.get::<_, u32>("FooterLines")?,
                    row.get::<_, bool>("Active")?,
                    row.get::<_, DateTime<Utc>>("Created")?,
                ))
            })
            .optional()?;

        let Some((
            file_id,
            recon_day,
            version_id,
            model_type,
            delimiter,
            header_lines,
            footer_lines,
            active,
            created,
        )) = row
        else {
            return Ok(None);
        };

        let active_recon_date = recon_date::decode_nullable(recon_day).ok_or(
            DbError::MissingReconDate {
                file_id,
                version_id,
            },
        )?;

        Ok(Some(FileModelRow {
            file_id,
            version_id,
            active,
            active_recon_date,
            model_type,
            delimiter,
            header_lines,
            footer_lines,
            created,
        }))
    }

    fn column_rows(&self, conn: &Connection, version_id: VersionId) -> DbResult<Vec<ColumnRow>> {
        let mut stmt = conn.prepare(
            "SELECT Name, Identifier, Nullable, DataType, Position, Length, Format
             FROM FileModelColumns
             WHERE FileModelVersion = ?1
             ORDER BY Position",
        )?;

        let rows = stmt
            .query_map(params![version_id], |row| {
                Ok(ColumnRow {
                    name: row.get("Name")?,
                    identifier: row.get("Identifier")?,
                    nullable: row.get("Nullable")?,
                    data_type: row.get("DataType")?,
                    position: row.get("Position")?,
                    length: row.get("Length")?,
                    format: row.get("Format")?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    fn active_version_id(
        &self,
        conn: &Connection,
        file_id: FileId,
        date: NaiveDate,
    ) -> DbResult<Option<VersionId>> {
        let mut stmt = conn.prepare(
            "SELECT Version
             FROM FileModelsHistory
             WHERE Useable = 1
               AND Active = 1
               AND FileId = ?1
               AND ActiveReconDate <= ?2
             ORDER BY ActiveReconDate DESC, Created DESC
             LIMIT 1",
        )?;

        let version_id = stmt
            .query_row(params![file_id, recon_date::encode(date)], |row| {
                row.get::<_, VersionId>(0)
            })
            .optional()?;
        Ok(version_id)
    }

    fn file_version_ids(&self, conn: &Connection, file_id: FileId) -> DbResult<Vec<VersionId>> {
        let mut stmt = conn.prepare(
            "SELECT Version
             FROM FileModelsHistory
             WHERE FileId = ?1
             ORDER BY Version",
        )?;

        let ids = stmt
            .query_map(params![file_id], |row| row.get::<_, VersionId>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(ids)
    }
}

impl ModelStore for SqlModelStore {
    fn get_by_version(&self, version_id: VersionId) -> RegistryResult<Option<VersionedFileModel>> {
        let conn = self.conn.lock();
        Ok(self.load_version(&conn, version_id)?)
    }

    fn get_active_as_of(
        &self,
        file_id: FileId,
        date: NaiveDate,
    ) -> RegistryResult<Option<VersionedFileModel>> {
        let conn = self.conn.lock();
        let version_id = match self.active_version_id(&conn, file_id, date)? {
            Some(id) => id,
            None => return Ok(None),
        };
        Ok(self.load_version(&conn, version_id)?)
    }

    fn list_versions(&self, file_id: FileId) -> RegistryResult<Vec<VersionedFileModel>> {
        let conn = self.conn.lock();
        let mut versions = Vec::new();
        for version_id in self.file_version_ids(&conn, file_id)? {
            if let Some(version) = self.load_version(&conn, version_id)? {
                versions.push(version);
            }
        }
        Ok(versions)
    }
}
