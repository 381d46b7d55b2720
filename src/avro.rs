//! Export of file models to Avro record schemas
//!
//! A pure mapping from a file model to a record-shaped schema descriptor:
//! fixed namespace and record name, one field per column in column order.
//! Nullable columns export as a `["null", base]` union.

use serde_json::{json, Value};

use crate::types::{ColumnType, FileModel};

const NAMESPACE: &str = "registry.filemodel";
const RECORD_NAME: &str = "FileModelRecord";

/// Build the Avro record schema describing one file model
pub fn to_avro_schema(model: &FileModel) -> Value {
    let fields: Vec<Value> = match model {
        FileModel::Csv(csv) => csv
            .columns()
            .iter()
            .map(|col| avro_field(col.name(), col.column_type()))
            .collect(),
        FileModel::FixedWidth(fixed) => fixed
            .columns()
            .iter()
            .map(|col| avro_field(col.name(), col.column_type()))
            .collect(),
    };

    json!({
        "namespace": NAMESPACE,
        "type": "record",
        "name": RECORD_NAME,
        "fields": fields,
    })
}

fn avro_field(name: &str, column_type: &ColumnType) -> Value {
    json!({ "name": name, "type": avro_type(column_type) })
}

fn avro_type(column_type: &ColumnType) -> Value {
    let base = match column_type {
        ColumnType::String { .. } => json!("string"),
        ColumnType::Int { .. } => json!("int"),
        ColumnType::Float { .. } => json!("double"),
        ColumnType::Date { .. } => json!({ "type": "int", "logicalType": "date" }),
    };

    if column_type.is_nullable() {
        json!(["null", base])
    } else {
        base
    }
}
