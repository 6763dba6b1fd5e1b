//! Comparers that pick another comparer per row

use std::fmt::Debug;
use std::hash::Hash;
use std::sync::Arc;

use rustc_hash::{FxHashMap, FxHashSet};

use crate::error::{AssertError, Result};
use crate::model::{Table, Value};

use super::{CellContext, Comparer, ValueComparer};

/// Computes a probe value from a table row
pub type ValueFactory = Arc<dyn Fn(&dyn Table, usize) -> Result<Value> + Send + Sync>;

/// Probe that reads `column` from the row
pub fn column_value_factory(column: impl Into<String>) -> ValueFactory {
    let column = column.into();
    Arc::new(move |table: &dyn Table, row: usize| table.value(row, &column))
}

/// Dispatches on whether a value probed from the actual row is in a set
pub struct ConditionalBySet {
    factory: ValueFactory,
    values: FxHashSet<Value>,
    in_set: Comparer,
    not_in_set: Comparer,
}

impl ConditionalBySet {
    pub fn new(
        factory: ValueFactory,
        values: FxHashSet<Value>,
        in_set: Comparer,
        not_in_set: Comparer,
    ) -> Self {
        Self {
            factory,
            values,
            in_set,
            not_in_set,
        }
    }
}

impl ValueComparer for ConditionalBySet {
    fn compare(&self, cell: &CellContext<'_>) -> Result<Option<String>> {
        let probe = (self.factory)(cell.actual_table, cell.row)?;
        if self.values.contains(&probe) {
            self.in_set.compare(cell)
        } else {
            self.not_in_set.compare(cell)
        }
    }
}

pub fn conditional_by_set<I>(
    factory: ValueFactory,
    values: I,
    in_set: Comparer,
    not_in_set: Comparer,
) -> Comparer
where
    I: IntoIterator<Item = Value>,
{
    Arc::new(ConditionalBySet::new(
        factory,
        values.into_iter().collect(),
        in_set,
        not_in_set,
    ))
}

/// Picks a comparer from a map using a key chosen per cell
///
/// A key with no registered comparer is a configuration error.
pub struct ConditionalBySelector<K> {
    comparers: FxHashMap<K, Comparer>,
    selector: Arc<dyn Fn(&CellContext<'_>) -> Result<K> + Send + Sync>,
}

impl<K> ConditionalBySelector<K>
where
    K: Eq + Hash + Debug + Send + Sync,
{
    pub fn new<F>(comparers: FxHashMap<K, Comparer>, selector: F) -> Self
    where
        F: Fn(&CellContext<'_>) -> Result<K> + Send + Sync + 'static,
    {
        Self {
            comparers,
            selector: Arc::new(selector),
        }
    }
}

impl<K> ValueComparer for ConditionalBySelector<K>
where
    K: Eq + Hash + Debug + Send + Sync,
{
    fn compare(&self, cell: &CellContext<'_>) -> Result<Option<String>> {
        let key = (self.selector)(cell)?;
        match self.comparers.get(&key) {
            Some(comparer) => comparer.compare(cell),
            None => Err(AssertError::ComparerNotFound {
                table: cell.expected_table.table_name().to_string(),
                row: cell.row,
                column: cell.column.to_string(),
                key: format!("{:?}", key),
            }),
        }
    }
}

pub fn conditional_by_selector<K, F>(comparers: FxHashMap<K, Comparer>, selector: F) -> Comparer
where
    K: Eq + Hash + Debug + Send + Sync + 'static,
    F: Fn(&CellContext<'_>) -> Result<K> + Send + Sync + 'static,
{
    Arc::new(ConditionalBySelector::new(comparers, selector))
}
