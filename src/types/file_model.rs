//! File model definitions
//!
//! A file model is the structural description of one tabular data file:
//! either a delimited (CSV) layout or a fixed-width layout, with an ordered
//! list of typed columns. Construction is validating; an instance that
//! violates a layout invariant cannot exist. Deserialization goes through
//! the same constructors, so wire input is validated too.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::column::ColumnType;

/// Violation of a file model invariant, raised at construction time
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Column name is empty or whitespace-only
    #[error("column name cannot be blank")]
    BlankColumnName,
    /// CSV layout with an empty delimiter
    #[error("delimiter cannot be empty")]
    EmptyDelimiter,
    /// Layout with no columns at all
    #[error("columns must not be empty")]
    NoColumns,
}

/// One column of a delimited file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "CsvColumnRaw")]
pub struct CsvColumn {
    name: String,
    #[serde(rename = "type")]
    column_type: ColumnType,
    #[serde(rename = "isIdentifier")]
    is_identifier: bool,
}

#[derive(Deserialize)]
struct CsvColumnRaw {
    name: String,
    #[serde(rename = "type")]
    column_type: ColumnType,
    #[serde(rename = "isIdentifier", default)]
    is_identifier: bool,
}

impl TryFrom<CsvColumnRaw> for CsvColumn {
    type Error = ValidationError;

    fn try_from(raw: CsvColumnRaw) -> Result<Self, Self::Error> {
        CsvColumn::new(raw.name, raw.column_type, raw.is_identifier)
    }
}

impl CsvColumn {
    /// Create a column; fails if the name is blank
    pub fn new(
        name: impl Into<String>,
        column_type: ColumnType,
        is_identifier: bool,
    ) -> Result<Self, ValidationError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ValidationError::BlankColumnName);
        }
        Ok(Self {
            name,
            column_type,
            is_identifier,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn column_type(&self) -> &ColumnType {
        &self.column_type
    }

    pub fn is_identifier(&self) -> bool {
        self.is_identifier
    }
}

/// One column of a fixed-width file, located by byte offset and width
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "FixedWidthColumnRaw")]
pub struct FixedWidthColumn {
    name: String,
    offset: u32,
    width: u32,
    #[serde(rename = "type")]
    column_type: ColumnType,
    #[serde(rename = "isIdentifier")]
    is_identifier: bool,
}

#[derive(Deserialize)]
struct FixedWidthColumnRaw {
    name: String,
    offset: u32,
    width: u32,
    #[serde(rename = "type")]
    column_type: ColumnType,
    #[serde(rename = "isIdentifier", default)]
    is_identifier: bool,
}

impl TryFrom<FixedWidthColumnRaw> for FixedWidthColumn {
    type Error = ValidationError;

    fn try_from(raw: FixedWidthColumnRaw) -> Result<Self, Self::Error> {
        FixedWidthColumn::new(
            raw.name,
            raw.offset,
            raw.width,
            raw.column_type,
            raw.is_identifier,
        )
    }
}

impl FixedWidthColumn {
    /// Create a column; fails if the name is blank
    pub fn new(
        name: impl Into<String>,
        offset: u32,
        width: u32,
        column_type: ColumnType,
        is_identifier: bool,
    ) -> Result<Self, ValidationError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ValidationError::BlankColumnName);
        }
        Ok(Self {
            name,
            offset,
            width,
            column_type,
            is_identifier,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn offset(&self) -> u32 {
        self.offset
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn column_type(&self) -> &ColumnType {
        &self.column_type
    }

    pub fn is_identifier(&self) -> bool {
        self.is_identifier
    }
}

/// Structural description of a tabular data file, tagged `csv` / `fixed`
/// on the wire
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum FileModel {
    #[serde(rename = "csv")]
    Csv(CsvFileModel),
    #[serde(rename = "fixed")]
    FixedWidth(FixedWidthFileModel),
}

impl FileModel {
    /// Number of header lines to skip before data rows
    pub fn num_header_lines(&self) -> u32 {
        match self {
            FileModel::Csv(m) => m.num_header_lines,
            FileModel::FixedWidth(m) => m.num_header_lines,
        }
    }

    /// Number of trailing footer lines after data rows
    pub fn num_footer_lines(&self) -> u32 {
        match self {
            FileModel::Csv(m) => m.num_footer_lines,
            FileModel::FixedWidth(m) => m.num_footer_lines,
        }
    }

    /// Number of columns in the layout
    pub fn column_count(&self) -> usize {
        match self {
            FileModel::Csv(m) => m.columns.len(),
            FileModel::FixedWidth(m) => m.columns.len(),
        }
    }
}

/// Delimited file layout
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "CsvFileModelRaw")]
pub struct CsvFileModel {
    #[serde(rename = "numHeaderLines")]
    num_header_lines: u32,
    #[serde(rename = "numFooterLines")]
    num_footer_lines: u32,
    delimiter: String,
    columns: Vec<CsvColumn>,
}

#[derive(Deserialize)]
struct CsvFileModelRaw {
    #[serde(rename = "numHeaderLines", default)]
    num_header_lines: u32,
    #[serde(rename = "numFooterLines", default)]
    num_footer_lines: u32,
    delimiter: String,
    columns: Vec<CsvColumn>,
}

impl TryFrom<CsvFileModelRaw> for CsvFileModel {
    type Error = ValidationError;

    fn try_from(raw: CsvFileModelRaw) -> Result<Self, Self::Error> {
        CsvFileModel::new(
            raw.num_header_lines,
            raw.num_footer_lines,
            raw.delimiter,
            raw.columns,
        )
    }
}

impl CsvFileModel {
    /// Create a CSV layout; fails on an empty delimiter or an empty column
    /// list
    pub fn new(
        num_header_lines: u32,
        num_footer_lines: u32,
        delimiter: impl Into<String>,
        columns: Vec<CsvColumn>,
    ) -> Result<Self, ValidationError> {
        let delimiter = delimiter.into();
        if delimiter.is_empty() {
            return Err(ValidationError::EmptyDelimiter);
        }
        if columns.is_empty() {
            return Err(ValidationError::NoColumns);
        }
        Ok(Self {
            num_header_lines,
            num_footer_lines,
            delimiter,
            columns,
        })
    }

    pub fn num_header_lines(&self) -> u32 {
        self.num_header_lines
    }

    pub fn num_footer_lines(&self) -> u32 {
        self.num_footer_lines
    }

    pub fn delimiter(&self) -> &str {
        &self.delimiter
    }

    pub fn columns(&self) -> &[CsvColumn] {
        &self.columns
    }
}

/// Fixed-width file layout
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "FixedWidthFileModelRaw")]
pub struct FixedWidthFileModel {
    #[serde(rename = "numHeaderLines")]
    num_header_lines: u32,
    #[serde(rename = "numFooterLines")]
    num_footer_lines: u32,
    columns: Vec<FixedWidthColumn>,
}

#[derive(Deserialize)]
struct FixedWidthFileModelRaw {
    #[serde(rename = "numHeaderLines", default)]
    num_header_lines: u32,
    #[serde(rename = "numFooterLines", default)]
    num_footer_lines: u32,
    columns: Vec<FixedWidthColumn>,
}

impl TryFrom<FixedWidthFileModelRaw> for FixedWidthFileModel {
    type Error = ValidationError;

    fn try_from(raw: FixedWidthFileModelRaw) -> Result<Self, Self::Error> {
        FixedWidthFileModel::new(raw.num_header_lines, raw.num_footer_lines, raw.columns)
    }
}

impl FixedWidthFileModel {
    /// Create a fixed-width layout; fails on an empty column list
    pub fn new(
        num_header_lines: u32,
        num_footer_lines: u32,
        columns: Vec<FixedWidthColumn>,
    ) -> Result<Self, ValidationError> {
        if columns.is_empty() {
            return Err(ValidationError::NoColumns);
        }
        Ok(Self {
            num_header_lines,
            num_footer_lines,
            columns,
        })
    }

    pub fn num_header_lines(&self) -> u32 {
        self.num_header_lines
    }

    pub fn num_footer_lines(&self) -> u32 {
        self.num_footer_lines
    }

    pub fn columns(&self) -> &[FixedWidthColumn] {
        &self.columns
    }
}
