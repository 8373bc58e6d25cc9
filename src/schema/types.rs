//! Column schema types

use serde::Serialize;

/// Ordered column list for a CSV table
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ColumnSchema {
    columns: Vec<String>,
}

impl ColumnSchema {
    /// Create a schema from column names
    pub fn new(columns: Vec<String>) -> Self {
        Self { columns }
    }

    /// Create a schema from a fixed column set
    pub fn fixed(columns: &[&str]) -> Self {
        Self {
            columns: columns.iter().map(ToString::to_string).collect(),
        }
    }

    /// Create a schema with no columns
    pub fn empty() -> Self {
        Self::default()
    }

    /// Column names in header order
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Number of columns
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Whether the schema has no columns
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Check if a column exists
    pub fn contains(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }

    /// Field names not covered by this schema
    pub fn uncovered<'a>(&self, fields: impl Iterator<Item = &'a str>) -> Vec<&'a str> {
        fields.filter(|f| !self.contains(f)).collect()
    }
}
