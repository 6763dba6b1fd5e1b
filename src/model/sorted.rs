//! Sorted table views for order-independent comparison
//!
//! Two tables produced independently (a hand-written fixture and a fresh query
//! result, say) rarely emit rows in the same order. Wrapping both sides in a
//! [`SortedTable`] over the same key gives them a canonical row order, so rows
//! can then be aligned by position.

use std::cmp::Ordering;
use std::fmt;
use std::sync::{Arc, OnceLock};

use crate::error::{AssertError, Result};

use super::schema::{Column, TableMetadata};
use super::table::{check_row, Table};
use super::value::Value;

/// Ordering of two non-null values of a sort column
pub type ValueOrdering = Arc<dyn Fn(&Column, &Value, &Value) -> Ordering + Send + Sync>;

/// How sort-column values are ordered against each other
#[derive(Clone, Default)]
pub enum RowOrdering {
    /// Compare display strings, so `"10"` sorts before `"2"`
    #[default]
    Lexical,
    /// Cast to the column's data type and compare natively
    Typed,
    Custom(ValueOrdering),
}

impl fmt::Debug for RowOrdering {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RowOrdering::Lexical => write!(f, "Lexical"),
            RowOrdering::Typed => write!(f, "Typed"),
            RowOrdering::Custom(_) => write!(f, "Custom(..)"),
        }
    }
}

/// A table whose rows are presented in sort-key order
///
/// The row permutation is computed on first access and kept for the lifetime
/// of the view. Share a view across threads only after it has been sorted.
pub struct SortedTable<T: Table> {
    table: T,
    sort_columns: Vec<Column>,
    ordering: RowOrdering,
    order: OnceLock<Vec<usize>>,
}

impl<T: Table> SortedTable<T> {
    /// Sort by every column, in metadata order
    pub fn new(table: T) -> Self {
        let sort_columns = table.metadata().columns.clone();
        Self::from_parts(table, sort_columns)
    }

    /// Sort by the named columns, which must all exist in the table
    pub fn with_columns<S: AsRef<str>>(table: T, names: &[S]) -> Result<Self> {
        let sort_columns = names
            .iter()
            .map(|name| resolve_column(table.metadata(), name.as_ref()))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::from_parts(table, sort_columns))
    }

    /// Sort by the given columns; each must be a column of the table
    pub fn with_sort_columns(table: T, columns: Vec<Column>) -> Result<Self> {
        for column in &columns {
            resolve_column(table.metadata(), &column.name)?;
        }
        Ok(Self::from_parts(table, columns))
    }

    /// Sort by the table's primary key columns
    pub fn by_primary_keys(table: T) -> Result<Self> {
        let metadata = table.metadata();
        if metadata.primary_keys.is_empty() {
            return Err(AssertError::sort_configuration(format!(
                "table {} declares no primary keys",
                metadata.table_name
            )));
        }
        let keys = metadata.primary_keys.clone();
        Self::with_columns(table, &keys[..])
    }

    fn from_parts(table: T, sort_columns: Vec<Column>) -> Self {
        Self {
            table,
            sort_columns,
            ordering: RowOrdering::default(),
            order: OnceLock::new(),
        }
    }

    /// Replace the value ordering; only allowed before the rows were sorted
    pub fn set_ordering(&mut self, ordering: RowOrdering) -> Result<()> {
        if self.order.get().is_some() {
            return Err(AssertError::sort_configuration(format!(
                "cannot change the ordering of table {} after its rows were sorted",
                self.table.table_name()
            )));
        }
        self.ordering = ordering;
        Ok(())
    }

    /// Builder form of [`SortedTable::set_ordering`]
    pub fn with_ordering(mut self, ordering: RowOrdering) -> Result<Self> {
        self.set_ordering(ordering)?;
        Ok(self)
    }

    /// Switch between typed (`true`) and lexical (`false`) ordering
    pub fn set_use_typed_ordering(&mut self, typed: bool) -> Result<()> {
        self.set_ordering(if typed {
            RowOrdering::Typed
        } else {
            RowOrdering::Lexical
        })
    }

    pub fn sort_columns(&self) -> &[Column] {
        &self.sort_columns
    }

    pub fn ordering(&self) -> &RowOrdering {
        &self.ordering
    }

    pub fn is_sorted(&self) -> bool {
        self.order.get().is_some()
    }

    /// Force the permutation to be computed now
    pub fn sort(&self) -> Result<()> {
        self.order().map(|_| ())
    }

    /// Row of the wrapped table shown at `row` of this view
    pub fn original_row(&self, row: usize) -> Result<usize> {
        check_row(self, row)?;
        Ok(self.order()?[row])
    }

    pub fn inner(&self) -> &T {
        &self.table
    }

    fn order(&self) -> Result<&[usize]> {
        if let Some(order) = self.order.get() {
            return Ok(order);
        }
        let computed = self.compute_order()?;
        Ok(self.order.get_or_init(|| computed))
    }

    fn compute_order(&self) -> Result<Vec<usize>> {
        let row_count = self.table.row_count();

        // Fetch (and cast, for typed ordering) every key up front so the sort
        // itself cannot fail
        let mut keys: Vec<Vec<Value>> = Vec::with_capacity(row_count);
        for row in 0..row_count {
            let mut key = Vec::with_capacity(self.sort_columns.len());
            for column in &self.sort_columns {
                let value = self.table.value(row, &column.name)?;
                let value = match self.ordering {
                    RowOrdering::Typed => column.data_type.cast(&value)?,
                    _ => value,
                };
                key.push(value);
            }
            keys.push(key);
        }

        let mut order: Vec<usize> = (0..row_count).collect();
        order.sort_by(|&a, &b| self.compare_keys(&keys[a], &keys[b]));

        log::debug!(
            "Sorted {} rows of table {} by {:?} ({:?})",
            row_count,
            self.table.table_name(),
            self.sort_columns.iter().map(|c| &c.name).collect::<Vec<_>>(),
            self.ordering
        );
        Ok(order)
    }

    fn compare_keys(&self, a: &[Value], b: &[Value]) -> Ordering {
        for (column, (va, vb)) in self.sort_columns.iter().zip(a.iter().zip(b)) {
            let result = match (va.is_null(), vb.is_null()) {
                (true, true) => continue,
                (true, false) => Ordering::Less,
                (false, true) => Ordering::Greater,
                (false, false) => match &self.ordering {
                    RowOrdering::Lexical => va.display().cmp(&vb.display()),
                    RowOrdering::Typed => va.canonical_cmp(vb),
                    RowOrdering::Custom(compare) => compare(column, va, vb),
                },
            };
            if result != Ordering::Equal {
                return result;
            }
        }
        Ordering::Equal
    }
}

fn resolve_column(metadata: &TableMetadata, name: &str) -> Result<Column> {
    metadata
        .column_index(name)
        .or_else(|| metadata.column_index_ignore_case(name))
        .map(|i| metadata.columns[i].clone())
        .ok_or_else(|| AssertError::no_such_column(&metadata.table_name, name))
}

impl<T: Table> Table for SortedTable<T> {
    fn metadata(&self) -> &TableMetadata {
        self.table.metadata()
    }

    fn row_count(&self) -> usize {
        self.table.row_count()
    }

    fn value(&self, row: usize, column: &str) -> Result<Value> {
        let physical = self.original_row(row)?;
        self.table.value(physical, column)
    }
}
