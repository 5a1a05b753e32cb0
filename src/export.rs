//! Result table materialization: the column-ordering contract.
//!
//! The exporter is deliberately thin. It owns exactly one decision: the body
//! columns are the user-declared order intersected with the columns actually
//! present, the identifier column is excluded from the body and reinstated
//! as the leading key of every row. Columns absent from the order list are
//! silently dropped.

use serde::Serialize;
use serde_json::{json, Value};

use crate::result::ResultTable;

/// The name under which the sample identifier is reinstated.
pub const SAMPLE_ID_HEADER: &str = "sample_id";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportRow {
    pub sample_id: String,
    /// Values parallel to the table's `columns`; missing entries are empty.
    pub values: Vec<String>,
}

/// An ordered, rectangular rendering of a [`ResultTable`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportTable {
    pub columns: Vec<String>,
    pub rows: Vec<ExportRow>,
}

impl ExportTable {
    /// Apply the ordering contract to a result table.
    pub fn build(table: &ResultTable, order: &[String]) -> ExportTable {
        let columns = ordered_columns(table, order);

        let rows = table
            .iter()
            .map(|(sample_id, record)| ExportRow {
                sample_id: sample_id.to_string(),
                values: columns
                    .iter()
                    .map(|col| record.get(col).unwrap_or_default().to_string())
                    .collect(),
            })
            .collect();

        ExportTable { columns, rows }
    }

    /// The first `limit` rows, for result previews.
    pub fn preview(table: &ResultTable, order: &[String], limit: usize) -> ExportTable {
        let mut export = ExportTable::build(table, order);
        export.rows.truncate(limit);
        export
    }

    /// Render as an array of JSON objects, identifier first, one per sample.
    pub fn to_json_records(&self) -> Value {
        let records: Vec<Value> = self
            .rows
            .iter()
            .map(|row| {
                let mut record = serde_json::Map::new();
                record.insert(SAMPLE_ID_HEADER.to_string(), json!(row.sample_id));
                for (col, value) in self.columns.iter().zip(&row.values) {
                    record.insert(col.clone(), json!(value));
                }
                Value::Object(record)
            })
            .collect();
        Value::Array(records)
    }
}

/// The user-declared column order restricted to columns actually present in
/// the table. The identifier column never appears in the body.
pub fn ordered_columns(table: &ResultTable, order: &[String]) -> Vec<String> {
    order
        .iter()
        .filter(|col| col.as_str() != SAMPLE_ID_HEADER)
        .filter(|col| table.iter().any(|(_, record)| record.get(col).is_some()))
        .cloned()
        .collect()
}

pub fn serialize_export(export: &ExportTable) -> serde_json::Result<String> {
    serde_json::to_string(&export.to_json_records())
}
