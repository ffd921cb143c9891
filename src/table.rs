//! Minimal read-only tabular data
//!
//! Stands in for the upstream data loader's frames: a list of uniform
//! rows keyed by column name, with defaulting accessors so missing
//! fields degrade to zero/empty instead of erroring.

use serde_json::{Map, Value};
use std::collections::HashSet;

pub type Row = Map<String, Value>;

/// A read-only table of financial rows.
#[derive(Debug, Clone, Default)]
pub struct DataTable {
    rows: Vec<Row>,
}

impl DataTable {
    pub fn new(rows: Vec<Row>) -> Self {
        Self { rows }
    }

    /// Build from a JSON array of record objects; non-object elements
    /// are ignored.
    pub fn from_records(value: &Value) -> Self {
        let rows = value
            .as_array()
            .map(|arr| {
                arr.iter()
                    .filter_map(|v| v.as_object().cloned())
                    .collect()
            })
            .unwrap_or_default();
        Self { rows }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn first(&self) -> Option<&Row> {
        self.rows.first()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.rows.first().is_some_and(|row| row.contains_key(name))
    }

    /// First row whose `column` string value equals `value`.
    pub fn find_row(&self, column: &str, value: &str) -> Option<&Row> {
        self.rows
            .iter()
            .find(|row| row.get(column).and_then(Value::as_str) == Some(value))
    }

    /// Unique string values of a column, in first-seen order.
    pub fn distinct_strings(&self, column: &str) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut values = Vec::new();
        for row in &self.rows {
            if let Some(v) = row.get(column).and_then(Value::as_str) {
                if seen.insert(v.to_string()) {
                    values.push(v.to_string());
                }
            }
        }
        values
    }

    /// Number of distinct values (string or numeric) in a column.
    pub fn distinct_count(&self, column: &str) -> usize {
        let mut seen = HashSet::new();
        for row in &self.rows {
            if let Some(v) = row.get(column) {
                seen.insert(v.to_string());
            }
        }
        seen.len()
    }
}

/// Numeric cell value, defaulting to 0.0 when absent or non-numeric.
pub fn num(row: &Row, column: &str) -> f64 {
    match row.get(column) {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => s.parse().unwrap_or(0.0),
        _ => 0.0,
    }
}

/// Numeric cell value only when present and finite.
pub fn num_opt(row: &Row, column: &str) -> Option<f64> {
    match row.get(column) {
        Some(Value::Number(n)) => n.as_f64().filter(|v| v.is_finite()),
        _ => None,
    }
}

/// String cell value, defaulting to empty when absent.
pub fn text(row: &Row, column: &str) -> String {
    row.get(column)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

/// Integer cell value when present (fiscal years and the like).
pub fn int_opt(row: &Row, column: &str) -> Option<i64> {
    row.get(column).and_then(Value::as_i64)
}
