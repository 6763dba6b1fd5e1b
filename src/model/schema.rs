//! Column metadata and table metadata

use serde::{Deserialize, Serialize};

use super::datatype::DataType;

/// Column metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    /// Column name
    pub name: String,
    /// Declared data type
    pub data_type: DataType,
    /// Whether the column accepts nulls
    pub nullable: bool,
}

impl Column {
    /// Create a nullable column of unknown type
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data_type: DataType::Unknown,
            nullable: true,
        }
    }

    /// Create a nullable column with a specified type
    pub fn with_type(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
            nullable: true,
        }
    }

    pub fn not_null(mut self) -> Self {
        self.nullable = false;
        self
    }
}

/// Name and columns of a table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableMetadata {
    pub table_name: String,
    pub columns: Vec<Column>,
    /// Names of the primary key columns, in key order
    pub primary_keys: Vec<String>,
}

impl TableMetadata {
    pub fn new(table_name: impl Into<String>, columns: Vec<Column>) -> Self {
        Self {
            table_name: table_name.into(),
            columns,
            primary_keys: Vec::new(),
        }
    }

    pub fn with_primary_keys<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.primary_keys = keys.into_iter().map(Into::into).collect();
        self
    }

    /// Get column index by exact name
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    /// Get column index ignoring ASCII case
    pub fn column_index_ignore_case(&self, name: &str) -> Option<usize> {
        self.columns
            .iter()
            .position(|c| c.name.eq_ignore_ascii_case(name))
    }

    /// Get column by exact name
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Primary key columns; names missing from the column list are skipped
    pub fn primary_key_columns(&self) -> Vec<&Column> {
        self.primary_keys
            .iter()
            .filter_map(|key| self.column(key))
            .collect()
    }

    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    /// Number of columns
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup() {
        let meta = TableMetadata::new(
            "USERS",
            vec![
                Column::with_type("id", DataType::Integer).not_null(),
                Column::new("Name"),
            ],
        )
        .with_primary_keys(["id", "missing"]);

        assert_eq!(meta.column_index("Name"), Some(1));
        assert_eq!(meta.column_index("name"), None);
        assert_eq!(meta.column_index_ignore_case("name"), Some(1));
        assert_eq!(meta.primary_key_columns().len(), 1);
        assert!(!meta.columns[0].nullable);
    }
}
