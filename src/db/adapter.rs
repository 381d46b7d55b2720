//! Storage row adaptation
//!
//! Translates the relational representation (one header row plus ordered
//! column rows per version) into the domain model. Adaptation is strict: an
//! unrecognized discriminator or a missing required field aborts the read
//! with an error naming the file and version under adaptation, never a
//! silently defaulted model.

use std::sync::OnceLock;

use chrono::{DateTime, NaiveDate, Utc};
use regex::Regex;

use crate::types::{
    ColumnType, CsvColumn, CsvFileModel, FileId, FileModel, FixedWidthColumn, FixedWidthFileModel,
    VersionId, VersionedFileModel, DEFAULT_DATE_FORMAT,
};

use super::DbError;

/// One row of the header table
#[derive(Debug, Clone)]
pub(crate) struct FileModelRow {
    pub file_id: FileId,
    pub version_id: VersionId,
    pub active: bool,
    pub active_recon_date: NaiveDate,
    pub model_type: String,
    pub delimiter: Option<String>,
    pub header_lines: u32,
    pub footer_lines: u32,
    pub created: DateTime<Utc>,
}

/// One row of the column table, already in position order
#[derive(Debug, Clone)]
pub(crate) struct ColumnRow {
    pub name: String,
    pub identifier: bool,
    pub nullable: bool,
    pub data_type: String,
    pub position: u32,
    pub length: u32,
    pub format: Option<String>,
}

/// Build the versioned record for a header row and its columns
pub(crate) fn adapt_version(
    header: &FileModelRow,
    columns: &[ColumnRow],
) -> Result<VersionedFileModel, DbError> {
    let file_model = adapt_file_model(header, columns)?;
    Ok(VersionedFileModel::new(
        header.file_id,
        header.version_id,
        header.active,
        header.active_recon_date,
        None,
        header.created,
        // The backing schema does not record the author
        "unknown",
        file_model,
    ))
}

/// Map the `Type` discriminator and column rows to a file model
pub(crate) fn adapt_file_model(
    header: &FileModelRow,
    columns: &[ColumnRow],
) -> Result<FileModel, DbError> {
    match header.model_type.as_str() {
        "CSV" => adapt_csv(header, columns),
        "FIXED_WIDTH" => adapt_fixed_width(header, columns),
        other => Err(DbError::UnknownModelType {
            value: other.to_string(),
            file_id: header.file_id,
            version_id: header.version_id,
        }),
    }
}

fn adapt_csv(header: &FileModelRow, columns: &[ColumnRow]) -> Result<FileModel, DbError> {
    let delimiter = header
        .delimiter
        .as_deref()
        .ok_or(DbError::MissingDelimiter {
            file_id: header.file_id,
            version_id: header.version_id,
        })?;

    let columns = columns
        .iter()
        .map(|row| {
            let column_type = adapt_column_type(row, header)?;
            CsvColumn::new(row.name.as_str(), column_type, row.identifier).map_err(|source| {
                DbError::InvalidModel {
                    file_id: header.file_id,
                    version_id: header.version_id,
                    source,
                }
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let model = CsvFileModel::new(header.header_lines, header.footer_lines, delimiter, columns)
        .map_err(|source| DbError::InvalidModel {
            file_id: header.file_id,
            version_id: header.version_id,
            source,
        })?;
    Ok(FileModel::Csv(model))
}

fn adapt_fixed_width(header: &FileModelRow, columns: &[ColumnRow]) -> Result<FileModel, DbError> {
    let columns = columns
        .iter()
        .map(|row| {
            let column_type = adapt_column_type(row, header)?;
            FixedWidthColumn::new(
                row.name.as_str(),
                row.position,
                row.length,
                column_type,
                row.identifier,
            )
            .map_err(|source| DbError::InvalidModel {
                file_id: header.file_id,
                version_id: header.version_id,
                source,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let model = FixedWidthFileModel::new(header.header_lines, header.footer_lines, columns)
        .map_err(|source| DbError::InvalidModel {
            file_id: header.file_id,
            version_id: header.version_id,
            source,
        })?;
    Ok(FileModel::FixedWidth(model))
}

fn adapt_column_type(row: &ColumnRow, header: &FileModelRow) -> Result<ColumnType, DbError> {
    // A nullable column means the raw file marks missing values with an
    // empty field; richer sentinel lists are not representable in the
    // backing schema.
    let null_values = if row.nullable {
        vec![String::new()]
    } else {
        Vec::new()
    };

    let column_type = match row.data_type.as_str() {
        "STRING" => ColumnType::string(),
        "INTEGER" => ColumnType::int(),
        "DOUBLE" => ColumnType::float(),
        "DATE" => {
            let format = row.format.as_deref().unwrap_or("");
            ColumnType::date_with_format(extract_date_format(format))
        }
        other => {
            return Err(DbError::UnknownDataType {
                value: other.to_string(),
                file_id: header.file_id,
                version_id: header.version_id,
            })
        }
    };
    Ok(column_type.with_null_values(null_values))
}

fn date_format_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"date:"([^"]+)""#).expect("date format regex is valid"))
}

/// Pull a `date:"<pattern>"` override out of the free-form format string;
/// fall back to the ISO default
fn extract_date_format(format: &str) -> String {
    date_format_re()
        .captures(format)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| DEFAULT_DATE_FORMAT.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(model_type: &str, delimiter: Option<&str>) -> FileModelRow {
        FileModelRow {
            file_id: 4508,
            version_id: 6502,
            active: true,
            active_recon_date: NaiveDate::from_ymd_opt(2018, 4, 10).unwrap(),
            model_type: model_type.to_string(),
            delimiter: delimiter.map(str::to_string),
            header_lines: 1,
            footer_lines: 0,
            created: Utc::now(),
        }
    }

    fn column(name: &str, data_type: &str, nullable: bool, format: Option<&str>) -> ColumnRow {
        ColumnRow {
            name: name.to_string(),
            identifier: false,
            nullable,
            data_type: data_type.to_string(),
            position: 0,
            length: 10,
            format: format.map(str::to_string),
        }
    }

    #[test]
    fn test_csv_adaptation() {
        let rows = vec![
            column("accountId", "INTEGER", false, None),
            column("balance", "DOUBLE", true, None),
        ];
        let model = adapt_file_model(&header("CSV", Some("|")), &rows).unwrap();

        let FileModel::Csv(csv) = model else {
            panic!("expected csv model");
        };
        assert_eq!(csv.delimiter(), "|");
        assert_eq!(csv.columns().len(), 2);
        assert_eq!(csv.columns()[0].name(), "accountId");
        assert!(!csv.columns()[0].column_type().is_nullable());
        assert_eq!(
            csv.columns()[1].column_type().null_values(),
            &[String::new()]
        );
    }

    #[test]
    fn test_fixed_width_uses_position_and_length() {
        let mut first = column("accountId", "INTEGER", false, None);
        first.position = 0;
        first.length = 12;
        let mut second = column("maturityDate", "DATE", false, None);
        second.position = 12;
        second.length = 8;

        let model = adapt_file_model(&header("FIXED_WIDTH", None), &[first, second]).unwrap();

        let FileModel::FixedWidth(fixed) = model else {
            panic!("expected fixed-width model");
        };
        assert_eq!(fixed.columns()[1].offset(), 12);
        assert_eq!(fixed.columns()[1].width(), 8);
    }

    #[test]
    fn test_csv_without_delimiter_is_fatal() {
        let rows = vec![column("accountId", "INTEGER", false, None)];
        let err = adapt_file_model(&header("CSV", None), &rows).unwrap_err();
        assert!(matches!(
            err,
            DbError::MissingDelimiter {
                file_id: 4508,
                version_id: 6502
            }
        ));
    }

    #[test]
    fn test_unknown_discriminators_are_fatal() {
        let rows = vec![column("accountId", "INTEGER", false, None)];
        assert!(matches!(
            adapt_file_model(&header("PARQUET", None), &rows),
            Err(DbError::UnknownModelType { .. })
        ));

        let rows = vec![column("accountId", "DECIMAL", false, None)];
        assert!(matches!(
            adapt_file_model(&header("CSV", Some(",")), &rows),
            Err(DbError::UnknownDataType { .. })
        ));
    }

    #[test]
    fn test_date_format_extraction() {
        let rows = vec![column(
            "maturityDate",
            "DATE",
            false,
            Some(r#"some note date:"dd/MM/yyyy" trailing"#),
        )];
        let model = adapt_file_model(&header("CSV", Some(",")), &rows).unwrap();
        let FileModel::Csv(csv) = model else {
            panic!("expected csv model");
        };
        assert!(matches!(
            csv.columns()[0].column_type(),
            ColumnType::Date { format, .. } if format == "dd/MM/yyyy"
        ));
    }

    #[test]
    fn test_date_format_defaults_when_absent() {
        for format in [None, Some("free text without a pattern")] {
            let rows = vec![column("maturityDate", "DATE", false, format)];
            let model = adapt_file_model(&header("CSV", Some(",")), &rows).unwrap();
            let FileModel::Csv(csv) = model else {
                panic!("expected csv model");
            };
            assert!(matches!(
                csv.columns()[0].column_type(),
                ColumnType::Date { format, .. } if format == "yyyy-MM-dd"
            ));
        }
    }
}
