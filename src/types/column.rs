//! Column type definitions
//!
//! A column type describes how a single raw field is interpreted: its coarse
//! data type, an optional parse format, and the sentinel strings that stand
//! for a missing value in the raw file.

use serde::{Deserialize, Serialize};

/// Default parse pattern for date columns (ISO-8601 day pattern)
pub const DEFAULT_DATE_FORMAT: &str = "yyyy-MM-dd";

fn default_date_format() -> String {
    DEFAULT_DATE_FORMAT.to_string()
}

/// Data type of a single column, tagged `string` / `int` / `float` / `date`
/// on the wire.
///
/// Every variant carries `null_values`: the ordered list of raw strings that
/// represent a missing value. A column is nullable exactly when that list is
/// non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ColumnType {
    String {
        #[serde(
            rename = "nullValues",
            default,
            skip_serializing_if = "Vec::is_empty"
        )]
        null_values: Vec<String>,
    },
    Int {
        #[serde(default, skip_serializing_if = "String::is_empty")]
        format: String,
        #[serde(
            rename = "nullValues",
            default,
            skip_serializing_if = "Vec::is_empty"
        )]
        null_values: Vec<String>,
    },
    Float {
        #[serde(default, skip_serializing_if = "String::is_empty")]
        format: String,
        #[serde(
            rename = "nullValues",
            default,
            skip_serializing_if = "Vec::is_empty"
        )]
        null_values: Vec<String>,
    },
    Date {
        #[serde(default = "default_date_format")]
        format: String,
        #[serde(
            rename = "nullValues",
            default,
            skip_serializing_if = "Vec::is_empty"
        )]
        null_values: Vec<String>,
    },
}

impl ColumnType {
    /// A non-nullable string column
    pub fn string() -> Self {
        ColumnType::String {
            null_values: Vec::new(),
        }
    }

    /// A non-nullable integer column without a parse format
    pub fn int() -> Self {
        ColumnType::Int {
            format: String::new(),
            null_values: Vec::new(),
        }
    }

    /// A non-nullable float column without a parse format
    pub fn float() -> Self {
        ColumnType::Float {
            format: String::new(),
            null_values: Vec::new(),
        }
    }

    /// A non-nullable date column with the default ISO format
    pub fn date() -> Self {
        ColumnType::Date {
            format: default_date_format(),
            null_values: Vec::new(),
        }
    }

    /// A non-nullable date column with a custom parse format
    pub fn date_with_format(format: impl Into<String>) -> Self {
        ColumnType::Date {
            format: format.into(),
            null_values: Vec::new(),
        }
    }

    /// Replace the null-value sentinels, keeping the rest of the type
    pub fn with_null_values(self, null_values: Vec<String>) -> Self {
        match self {
            ColumnType::String { .. } => ColumnType::String { null_values },
            ColumnType::Int { format, .. } => ColumnType::Int {
                format,
                null_values,
            },
            ColumnType::Float { format, .. } => ColumnType::Float {
                format,
                null_values,
            },
            ColumnType::Date { format, .. } => ColumnType::Date {
                format,
                null_values,
            },
        }
    }

    /// The raw strings that stand for a missing value, in order
    pub fn null_values(&self) -> &[String] {
        match self {
            ColumnType::String { null_values }
            | ColumnType::Int { null_values, .. }
            | ColumnType::Float { null_values, .. }
            | ColumnType::Date { null_values, .. } => null_values,
        }
    }

    /// A column is nullable exactly when it has at least one null sentinel
    pub fn is_nullable(&self) -> bool {
        !self.null_values().is_empty()
    }
}
