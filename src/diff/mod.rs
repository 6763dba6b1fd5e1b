//! Assertion engine comparing expected and actual tables

mod columns;

use crate::compare::{CellContext, ComparerResolver};
use crate::config::AssertConfig;
use crate::error::{AssertError, Result};
use crate::model::{normalize_name, ColumnFilterTable, DataSet, Table};
use crate::report::{DefaultFailureHandler, Difference, FailureHandler};

pub use columns::{reconcile_columns, reconcile_type, ComparisonColumn};

/// Compares tables and data sets cell by cell
///
/// Structural problems (table names, row counts, column sets, types) abort the
/// comparison with a structural [`AssertError`]. Each differing cell is passed
/// to the [`FailureHandler`], which decides whether to stop or carry on.
#[derive(Debug, Clone, Default)]
pub struct Assertion {
    config: AssertConfig,
}

impl Assertion {
    /// Create an assertion engine with configuration
    pub fn new(config: AssertConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AssertConfig {
        &self.config
    }

    /// Fail on the first difference between two tables
    pub fn assert_equals(&self, expected: &dyn Table, actual: &dyn Table) -> Result<()> {
        self.assert_tables(expected, actual, &mut DefaultFailureHandler::new())
    }

    /// Fail on the first difference, ignoring columns matching `ignore`
    /// in addition to the configured ones
    pub fn assert_equals_ignore_cols(
        &self,
        expected: &dyn Table,
        actual: &dyn Table,
        ignore: &[String],
    ) -> Result<()> {
        let expected = ColumnFilterTable::excluding(expected, ignore);
        let actual = ColumnFilterTable::excluding(actual, ignore);
        self.assert_equals(&expected, &actual)
    }

    /// Fail on the first difference between two data sets
    pub fn assert_data_sets_equal(
        &self,
        expected: &dyn DataSet,
        actual: &dyn DataSet,
    ) -> Result<()> {
        self.assert_data_sets(expected, actual, &mut DefaultFailureHandler::new())
    }

    /// Compare two tables, reporting differences to `handler`
    pub fn assert_tables(
        &self,
        expected: &dyn Table,
        actual: &dyn Table,
        handler: &mut dyn FailureHandler,
    ) -> Result<()> {
        if same_instance(expected, actual) {
            log::debug!(
                "Table {} compared with itself, nothing to do",
                expected.table_name()
            );
            return Ok(());
        }

        if self.config.ignore_columns.is_empty() {
            return self.compare_tables(expected, actual, handler);
        }

        let expected = ColumnFilterTable::excluding(expected, &self.config.ignore_columns);
        let actual = ColumnFilterTable::excluding(actual, &self.config.ignore_columns);
        self.compare_tables(&expected, &actual, handler)
    }

    /// Compare two data sets table by table, in sorted table-name order
    pub fn assert_data_sets(
        &self,
        expected: &dyn DataSet,
        actual: &dyn DataSet,
        handler: &mut dyn FailureHandler,
    ) -> Result<()> {
        if same_instance(expected, actual) {
            log::debug!("Data set compared with itself, nothing to do");
            return Ok(());
        }

        let expected_names = sorted_table_names(expected);
        let actual_names = sorted_table_names(actual);
        if expected_names != actual_names {
            return Err(AssertError::TableNamesMismatch {
                expected: expected_names,
                actual: actual_names,
            });
        }

        for name in &expected_names {
            let expected_table = expected.table(name)?;
            let actual_table = actual.table(name)?;
            self.assert_tables(expected_table, actual_table, handler)?;
        }
        Ok(())
    }

    fn compare_tables(
        &self,
        expected: &dyn Table,
        actual: &dyn Table,
        handler: &mut dyn FailureHandler,
    ) -> Result<()> {
        let table_name = expected.table_name();
        let row_count = expected.row_count();

        if row_count != actual.row_count() {
            return Err(AssertError::RowCountMismatch {
                table: table_name.to_string(),
                expected: row_count,
                actual: actual.row_count(),
            });
        }

        // Empty tables often come without usable column metadata
        if row_count == 0 {
            log::debug!("Table {} is empty on both sides", table_name);
            return Ok(());
        }

        let columns = reconcile_columns(
            expected.metadata(),
            actual.metadata(),
            self.config.column_names,
        )?;

        let resolver: ComparerResolver<'_> = self.config.resolver();
        let comparers: Vec<_> = columns
            .iter()
            .map(|column| resolver.resolve(table_name, &column.name))
            .collect();

        log::debug!(
            "Comparing table {} ({} rows, {} columns)",
            table_name,
            row_count,
            columns.len()
        );

        for row in 0..row_count {
            for (column, comparer) in columns.iter().zip(&comparers) {
                let expected_value = expected.value(row, &column.name)?;
                let actual_value = actual.value(row, &column.actual_name)?;

                let cell = CellContext {
                    expected_table: expected,
                    actual_table: actual,
                    row,
                    column: &column.name,
                    data_type: column.data_type,
                    expected: &expected_value,
                    actual: &actual_value,
                };
                if let Some(skip) = &self.config.skip {
                    if skip(&cell) {
                        continue;
                    }
                }

                if let Some(detail) = comparer.compare(&cell)? {
                    log::trace!(
                        "Difference in {} row {} column {}: expected {} but was {}",
                        table_name,
                        row,
                        column.name,
                        expected_value,
                        actual_value
                    );
                    handler.handle(Difference {
                        expected_table: expected,
                        actual_table: actual,
                        row,
                        column: &column.name,
                        data_type: column.data_type,
                        expected: expected_value,
                        actual: actual_value,
                        detail,
                    })?;
                }
            }
        }

        Ok(())
    }
}

/// Whether two references point at the same object
fn same_instance<T: ?Sized>(a: &T, b: &T) -> bool {
    std::ptr::eq(a as *const T as *const (), b as *const T as *const ())
}

/// Table names normalized per the data set's sensitivity, sorted
fn sorted_table_names(data_set: &dyn DataSet) -> Vec<String> {
    let case_sensitive = data_set.case_sensitive_table_names();
    let mut names: Vec<String> = data_set
        .table_names()
        .iter()
        .map(|name| normalize_name(name, case_sensitive))
        .collect();
    names.sort();
    names
}

/// Fail on the first difference between two tables, with default configuration
pub fn assert_equals(expected: &dyn Table, actual: &dyn Table) -> Result<()> {
    Assertion::default().assert_equals(expected, actual)
}

/// Compare two tables with `config`, reporting differences to `handler`
pub fn assert_with_config(
    expected: &dyn Table,
    actual: &dyn Table,
    config: &AssertConfig,
    handler: &mut dyn FailureHandler,
) -> Result<()> {
    Assertion::new(config.clone()).assert_tables(expected, actual, handler)
}
