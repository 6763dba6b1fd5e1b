//! Table sources and the in-memory table

use crate::error::{AssertError, Result};

use super::schema::{Column, TableMetadata};
use super::value::Value;

/// Read-only access to a table's metadata and values
///
/// Implementations may be backed by a query result, an in-memory fixture or a
/// view over another table. Row order is whatever the source produces.
pub trait Table {
    fn metadata(&self) -> &TableMetadata;

    fn row_count(&self) -> usize;

    /// Value at `row` for the column named `column`
    fn value(&self, row: usize, column: &str) -> Result<Value>;

    /// The table this one filters columns from, if it is a column-filtered view
    fn unfiltered(&self) -> Option<&dyn Table> {
        None
    }

    fn table_name(&self) -> &str {
        &self.metadata().table_name
    }
}

impl<T: Table + ?Sized> Table for &T {
    fn metadata(&self) -> &TableMetadata {
        (**self).metadata()
    }

    fn row_count(&self) -> usize {
        (**self).row_count()
    }

    fn value(&self, row: usize, column: &str) -> Result<Value> {
        (**self).value(row, column)
    }

    fn unfiltered(&self) -> Option<&dyn Table> {
        (**self).unfiltered()
    }
}

impl<T: Table + ?Sized> Table for Box<T> {
    fn metadata(&self) -> &TableMetadata {
        (**self).metadata()
    }

    fn row_count(&self) -> usize {
        (**self).row_count()
    }

    fn value(&self, row: usize, column: &str) -> Result<Value> {
        (**self).value(row, column)
    }

    fn unfiltered(&self) -> Option<&dyn Table> {
        (**self).unfiltered()
    }
}

/// Fail with `RowOutOfBounds` unless `row` is a valid index of `table`
pub fn check_row(table: &dyn Table, row: usize) -> Result<()> {
    let row_count = table.row_count();
    if row >= row_count {
        return Err(AssertError::RowOutOfBounds {
            table: table.table_name().to_string(),
            row,
            row_count,
        });
    }
    Ok(())
}

/// A table held in memory
#[derive(Debug, Clone)]
pub struct DefaultTable {
    metadata: TableMetadata,
    /// Cell values in column order
    rows: Vec<Vec<Value>>,
}

impl DefaultTable {
    /// Create a new empty table
    pub fn new(metadata: TableMetadata) -> Self {
        Self {
            metadata,
            rows: Vec::new(),
        }
    }

    /// Create a new empty table from a name and column definitions
    pub fn with_columns(table_name: impl Into<String>, columns: Vec<Column>) -> Self {
        Self::new(TableMetadata::new(table_name, columns))
    }

    /// Create a table and add every row
    pub fn from_rows(metadata: TableMetadata, rows: Vec<Vec<Value>>) -> Result<Self> {
        let mut table = Self::new(metadata);
        for row in rows {
            table.add_row(row)?;
        }
        Ok(table)
    }

    /// Add a row; it must have one value per column
    pub fn add_row(&mut self, cells: Vec<Value>) -> Result<()> {
        let expected = self.metadata.column_count();
        if cells.len() != expected {
            return Err(AssertError::RowWidth {
                table: self.metadata.table_name.clone(),
                expected,
                actual: cells.len(),
            });
        }
        self.rows.push(cells);
        Ok(())
    }

    /// All rows in insertion order
    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }
}

impl Table for DefaultTable {
    fn metadata(&self) -> &TableMetadata {
        &self.metadata
    }

    fn row_count(&self) -> usize {
        self.rows.len()
    }

    fn value(&self, row: usize, column: &str) -> Result<Value> {
        check_row(self, row)?;
        let index = self
            .metadata
            .column_index(column)
            .or_else(|| self.metadata.column_index_ignore_case(column))
            .ok_or_else(|| AssertError::no_such_column(&self.metadata.table_name, column))?;
        Ok(self.rows[row][index].clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::DataType;

    fn users() -> DefaultTable {
        let mut table = DefaultTable::with_columns(
            "USERS",
            vec![
                Column::with_type("id", DataType::Integer),
                Column::with_type("name", DataType::Varchar),
            ],
        );
        table.add_row(vec![Value::Int(1), Value::from("Ann")]).unwrap();
        table.add_row(vec![Value::Int(2), Value::Null]).unwrap();
        table
    }

    #[test]
    fn test_value_lookup() {
        let table = users();
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.value(0, "name").unwrap(), Value::from("Ann"));
        assert_eq!(table.value(1, "NAME").unwrap(), Value::Null);
        assert_eq!(table.table_name(), "USERS");
    }

    #[test]
    fn test_missing_column_and_row() {
        let table = users();
        assert!(matches!(
            table.value(0, "email"),
            Err(AssertError::NoSuchColumn { .. })
        ));
        assert!(matches!(
            table.value(2, "id"),
            Err(AssertError::RowOutOfBounds { row: 2, row_count: 2, .. })
        ));
    }

    #[test]
    fn test_row_width_checked() {
        let mut table = users();
        assert!(matches!(
            table.add_row(vec![Value::Int(3)]),
            Err(AssertError::RowWidth { expected: 2, actual: 1, .. })
        ));
    }

    #[test]
    fn test_reference_and_box_delegate() {
        let table = users();
        let boxed: Box<dyn Table> = Box::new(table.clone());
        assert_eq!(boxed.row_count(), 2);
        assert_eq!((&table).value(0, "id").unwrap(), Value::Int(1));
    }
}
