//! Turning differences into failures

mod collect;
mod handler;
pub mod json;

use crate::error::{AssertError, AssertionFailure, Result};
use crate::model::{DataType, Table, Value};

pub use collect::{CollectedDifference, DiffCollectingFailureHandler};
pub use handler::DefaultFailureHandler;

/// One cell whose actual value the resolved comparer rejected
pub struct Difference<'a> {
    pub expected_table: &'a dyn Table,
    pub actual_table: &'a dyn Table,
    pub row: usize,
    pub column: &'a str,
    pub data_type: DataType,
    pub expected: Value,
    pub actual: Value,
    /// Comparer's detail; empty for the default comparer
    pub detail: String,
}

impl Difference<'_> {
    pub fn table_name(&self) -> &str {
        self.expected_table.table_name()
    }
}

/// Creates the error raised for a failure, letting a host test framework
/// substitute its own error (wrapped in [`AssertError::Host`])
pub trait FailureFactory: Send + Sync {
    fn create_failure(&self, message: &str, expected: &str, actual: &str) -> AssertError;

    fn create_message_failure(&self, message: &str) -> AssertError;
}

/// Produces [`AssertError::Failure`]
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultFailureFactory;

impl FailureFactory for DefaultFailureFactory {
    fn create_failure(&self, message: &str, expected: &str, actual: &str) -> AssertError {
        AssertError::Failure(AssertionFailure::new(message, expected, actual))
    }

    fn create_message_failure(&self, message: &str) -> AssertError {
        AssertError::Failure(AssertionFailure::message(message))
    }
}

/// Receives every difference found during a comparison
///
/// Returning an error aborts the comparison; returning `Ok` continues the scan.
pub trait FailureHandler {
    fn handle(&mut self, difference: Difference<'_>) -> Result<()>;
}

/// Descend through column-filtered views to the table they filter
fn unfiltered_table(table: &dyn Table) -> &dyn Table {
    let mut current = table;
    while let Some(inner) = current.unfiltered() {
        current = inner;
    }
    current
}

/// Describe identifying columns of the row a difference sits on
///
/// Columns are read from the unfiltered tables so that columns excluded from
/// the comparison can still be shown. A column that cannot be read is reported
/// inline instead of failing.
pub fn additional_row_info(
    expected_table: &dyn Table,
    actual_table: &dyn Table,
    row: usize,
    columns: &[String],
) -> String {
    if columns.is_empty() {
        return String::new();
    }

    let expected_table = unfiltered_table(expected_table);
    let actual_table = unfiltered_table(actual_table);

    let parts: Vec<String> = columns
        .iter()
        .map(|column| {
            match (
                expected_table.value(row, column),
                actual_table.value(row, column),
            ) {
                (Ok(expected), Ok(actual)) => format!(
                    "('{}': expected=<{}>, actual=<{}>)",
                    column, expected, actual
                ),
                (Err(e), _) | (_, Err(e)) => {
                    log::warn!("Cannot read identifying column {} at row {}: {}", column, row, e);
                    format!("('{}': <{}>)", column, e)
                }
            }
        })
        .collect();

    format!("Additional row info: {}", parts.join(", "))
}

/// Message locating a difference:
/// `<detail>: value (table=<t>, row=<r>, col=<c>[, Additional row info: ...])`
pub fn build_message(difference: &Difference<'_>, additional_columns: &[String]) -> String {
    let mut location = format!(
        "value (table={}, row={}, col={}",
        difference.table_name(),
        difference.row,
        difference.column
    );

    let info = additional_row_info(
        difference.expected_table,
        difference.actual_table,
        difference.row,
        additional_columns,
    );
    if !info.is_empty() {
        location.push_str(", ");
        location.push_str(&info);
    }
    location.push(')');

    if difference.detail.is_empty() {
        location
    } else {
        format!("{}: {}", difference.detail, location)
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::{name_difference, users};
    use super::*;
    use crate::model::ColumnFilterTable;

    #[test]
    fn test_message_without_detail() {
        let (e, a) = (users(&[(1, "Ann")]), users(&[(1, "Bob")]));
        let diff = name_difference(&e, &a, "");
        assert_eq!(build_message(&diff, &[]), "value (table=USERS, row=0, col=name)");
    }

    #[test]
    fn test_message_with_detail_and_row_info() {
        let (e, a) = (users(&[(1, "Ann")]), users(&[(1, "Bob")]));
        let diff = name_difference(
            &e,
            &a,
            "Actual value='Bob' is not equal to expected value='Ann'",
        );
        assert_eq!(
            build_message(&diff, &["id".to_string()]),
            "Actual value='Bob' is not equal to expected value='Ann': value (table=USERS, row=0, col=name, \
             Additional row info: ('id': expected=<1>, actual=<1>))"
        );
    }

    #[test]
    fn test_row_info_reads_through_filtered_view() {
        let (e, a) = (users(&[(7, "Ann")]), users(&[(8, "Bob")]));
        let ignore = vec!["id".to_string()];
        let (fe, fa) = (
            ColumnFilterTable::excluding(&e, &ignore),
            ColumnFilterTable::excluding(&a, &ignore),
        );
        let info = additional_row_info(&fe, &fa, 0, &["id".to_string()]);
        assert_eq!(info, "Additional row info: ('id': expected=<7>, actual=<8>)");
    }

    #[test]
    fn test_row_info_degrades_on_missing_column() {
        let (e, a) = (users(&[(1, "Ann")]), users(&[(1, "Bob")]));
        let info = additional_row_info(&e, &a, 0, &["email".to_string()]);
        assert!(info.starts_with("Additional row info: ('email': <No such column 'email'"));
    }
}
