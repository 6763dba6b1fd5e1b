//! Column set and column type reconciliation

use crate::config::NameMatching;
use crate::error::{AssertError, Result};
use crate::model::{Column, DataType, TableMetadata};

/// A column present on both sides, with the type used to compare it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComparisonColumn {
    /// Name on the expected side
    pub name: String,
    /// Name on the actual side; differs from `name` only in case
    pub actual_name: String,
    pub data_type: DataType,
}

/// Pick the type a column is compared under
///
/// Identical types, or a type and its specialisation, resolve to the more
/// specific one. `Unknown` defers to the other side. Different types of the
/// same family resolve to the expected side's type. Anything else is
/// incompatible.
pub fn reconcile_type(
    table: &str,
    column: &str,
    expected: DataType,
    actual: DataType,
) -> Result<DataType> {
    if expected == actual {
        return Ok(expected);
    }
    if expected.is_unknown() {
        return Ok(actual);
    }
    if actual.is_unknown() {
        return Ok(expected);
    }
    if actual.specializes(expected) {
        return Ok(actual);
    }
    if expected.specializes(actual) || expected.is_compatible_with(actual) {
        return Ok(expected);
    }
    Err(AssertError::IncompatibleTypes {
        table: table.to_string(),
        column: column.to_string(),
        expected,
        actual,
    })
}

fn sorted_by_key<'a>(columns: &'a [Column], matching: NameMatching) -> Vec<(String, &'a Column)> {
    let mut keyed: Vec<_> = columns
        .iter()
        .map(|c| (matching.key(&c.name), c))
        .collect();
    keyed.sort_by(|a, b| a.0.cmp(&b.0));
    keyed
}

fn has_duplicate_keys(keyed: &[(String, &Column)]) -> bool {
    keyed.windows(2).any(|pair| pair[0].0 == pair[1].0)
}

/// Match the two column sets and resolve a type for every column
///
/// Declaration order is irrelevant; the result is sorted by name. A differing
/// name set or an incompatible type on any column fails the whole table. So do
/// two columns of one side that share a name under `matching`, such as `a` and
/// `A` when case is ignored.
pub fn reconcile_columns(
    expected: &TableMetadata,
    actual: &TableMetadata,
    matching: NameMatching,
) -> Result<Vec<ComparisonColumn>> {
    let table = &expected.table_name;
    let expected_columns = sorted_by_key(&expected.columns, matching);
    let actual_columns = sorted_by_key(&actual.columns, matching);

    let same_names = !has_duplicate_keys(&expected_columns)
        && !has_duplicate_keys(&actual_columns)
        && expected_columns.len() == actual_columns.len()
        && expected_columns
            .iter()
            .zip(&actual_columns)
            .all(|((a, _), (b, _))| a == b);
    if !same_names {
        return Err(AssertError::ColumnMismatch {
            table: table.clone(),
            expected: expected_columns.iter().map(|(_, c)| c.name.clone()).collect(),
            actual: actual_columns.iter().map(|(_, c)| c.name.clone()).collect(),
        });
    }

    expected_columns
        .iter()
        .zip(&actual_columns)
        .map(|((_, e), (_, a))| {
            let data_type = reconcile_type(table, &e.name, e.data_type, a.data_type)?;
            Ok(ComparisonColumn {
                name: e.name.clone(),
                actual_name: a.name.clone(),
                data_type,
            })
        })
        .collect()
}
