//! Per-cell comparison strategies
//!
//! A [`ValueComparer`] decides whether an actual cell value is acceptable for
//! an expected one. It returns `Ok(None)` on a pass and `Ok(Some(detail))` on a
//! mismatch, where `detail` is a short sentence of the form
//! `Actual value='<actual>' is <phrase> expected value='<expected>'`.
//! Errors are reserved for configuration problems (a value that cannot be cast
//! or a selector with no registered comparer), never for differing data.

mod builtin;
mod conditional;
mod resolver;

use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::error::Result;
use crate::model::{DataType, Table, Value};

pub use builtin::{
    contains, equal, equal_with_empty_message, greater_or_equal, greater_than, less_or_equal,
    less_than, never_fails, not_equal, timestamp_within_tolerance, NeverFails, Relation,
    RelationComparer, StringContains, TimestampTolerance,
};
pub use conditional::{
    column_value_factory, conditional_by_selector, conditional_by_set, ConditionalBySelector,
    ConditionalBySet, ValueFactory,
};
pub use resolver::{resolve_comparer, ComparerResolver};

/// Everything a comparer may look at for one cell
#[derive(Clone, Copy)]
pub struct CellContext<'a> {
    pub expected_table: &'a dyn Table,
    pub actual_table: &'a dyn Table,
    pub row: usize,
    pub column: &'a str,
    /// Type reconciled from both sides' column metadata
    pub data_type: DataType,
    pub expected: &'a Value,
    pub actual: &'a Value,
}

impl CellContext<'_> {
    /// Failure detail for this cell using the standard template
    pub fn fail_message(&self, phrase: &str) -> String {
        format!(
            "Actual value='{}' is {} expected value='{}'",
            self.actual, phrase, self.expected
        )
    }
}

/// Equivalence rule for a pair of cell values
///
/// Implementations hold no mutable state and may be shared across threads.
pub trait ValueComparer: Send + Sync {
    fn compare(&self, cell: &CellContext<'_>) -> Result<Option<String>>;
}

impl<F> ValueComparer for F
where
    F: Fn(&CellContext<'_>) -> Result<Option<String>> + Send + Sync,
{
    fn compare(&self, cell: &CellContext<'_>) -> Result<Option<String>> {
        self(cell)
    }
}

/// Shared handle to a comparer
pub type Comparer = Arc<dyn ValueComparer>;

/// Column name to comparer overrides
pub type ColumnComparers = FxHashMap<String, Comparer>;

/// Table name to per-column comparer overrides
pub type TableColumnComparers = FxHashMap<String, ColumnComparers>;

/// Wrap a closure as a comparer
pub fn custom<F>(f: F) -> Comparer
where
    F: Fn(&CellContext<'_>) -> Result<Option<String>> + Send + Sync + 'static,
{
    Arc::new(f)
}
