//! Comparer lookup: table overrides, then column overrides, then the default

use super::{ColumnComparers, Comparer, TableColumnComparers};

/// Comparer for `column`: its override if one exists, otherwise `default`
pub fn resolve_comparer(
    column: &str,
    default: &Comparer,
    overrides: Option<&ColumnComparers>,
) -> Comparer {
    overrides
        .and_then(|comparers| comparers.get(column))
        .unwrap_or(default)
        .clone()
}

/// Resolves comparers for one comparison run
///
/// Lookups are exact-name. Resolution happens once per (table, column) pair;
/// the returned comparer is then applied to every row.
pub struct ComparerResolver<'a> {
    default: Comparer,
    table_comparers: &'a TableColumnComparers,
    column_comparers: &'a ColumnComparers,
}

impl<'a> ComparerResolver<'a> {
    pub fn new(
        default: Comparer,
        table_comparers: &'a TableColumnComparers,
        column_comparers: &'a ColumnComparers,
    ) -> Self {
        Self {
            default,
            table_comparers,
            column_comparers,
        }
    }

    pub fn default_comparer(&self) -> &Comparer {
        &self.default
    }

    /// Per-column overrides registered for `table`, if any
    pub fn table_overrides(&self, table: &str) -> Option<&'a ColumnComparers> {
        self.table_comparers.get(table)
    }

    pub fn resolve(&self, table: &str, column: &str) -> Comparer {
        if let Some(comparer) = self
            .table_overrides(table)
            .and_then(|comparers| comparers.get(column))
        {
            return comparer.clone();
        }
        resolve_comparer(column, &self.default, Some(self.column_comparers))
    }
}
