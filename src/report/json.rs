//! JSON report of collected differences

use std::collections::BTreeSet;
use std::io::Write;

use serde::Serialize;

use crate::error::Result;
use crate::model::Value;

use super::CollectedDifference;

/// JSON report formatter
pub struct JsonReport {
    pretty: bool,
}

impl JsonReport {
    pub fn new() -> Self {
        Self { pretty: true }
    }

    pub fn compact() -> Self {
        Self { pretty: false }
    }

    /// Write the report for `differences` to `writer`
    pub fn render(
        &self,
        differences: &[CollectedDifference],
        writer: &mut dyn Write,
    ) -> Result<()> {
        let output = JsonDiffOutput::from_differences(differences);

        if self.pretty {
            serde_json::to_writer_pretty(&mut *writer, &output)?;
        } else {
            serde_json::to_writer(&mut *writer, &output)?;
        }
        writeln!(writer)?;

        Ok(())
    }

    pub fn render_to_string(&self, differences: &[CollectedDifference]) -> Result<String> {
        let mut buffer = Vec::new();
        self.render(differences, &mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }
}

impl Default for JsonReport {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Serialize)]
struct JsonDiffOutput {
    summary: JsonSummary,
    differences: Vec<JsonDifference>,
}

#[derive(Serialize)]
struct JsonSummary {
    differences: usize,
    tables: usize,
    rows: usize,
}

#[derive(Serialize)]
struct JsonDifference {
    table: String,
    row: usize,
    column: String,
    data_type: String,
    expected: serde_json::Value,
    actual: serde_json::Value,
    #[serde(skip_serializing_if = "String::is_empty")]
    detail: String,
    message: String,
}

impl JsonDiffOutput {
    fn from_differences(differences: &[CollectedDifference]) -> Self {
        let tables: BTreeSet<&str> = differences.iter().map(|d| d.table.as_str()).collect();
        let rows: BTreeSet<(&str, usize)> = differences
            .iter()
            .map(|d| (d.table.as_str(), d.row))
            .collect();

        Self {
            summary: JsonSummary {
                differences: differences.len(),
                tables: tables.len(),
                rows: rows.len(),
            },
            differences: differences
                .iter()
                .map(|d| JsonDifference {
                    table: d.table.clone(),
                    row: d.row,
                    column: d.column.clone(),
                    data_type: d.data_type.to_string(),
                    expected: value_to_json(&d.expected),
                    actual: value_to_json(&d.actual),
                    detail: d.detail.clone(),
                    message: d.message.clone(),
                })
                .collect(),
        }
    }
}

fn value_to_json(value: &Value) -> serde_json::Value {
    match value {
        Value::Null => serde_json::Value::Null,
        Value::Bool(b) => serde_json::Value::Bool(*b),
        Value::Int(i) => serde_json::json!(*i),
        Value::Float(f) => serde_json::json!(*f),
        Value::String(s) => serde_json::Value::String(s.to_string()),
        other => serde_json::Value::String(other.display().into_owned()),
    }
}
