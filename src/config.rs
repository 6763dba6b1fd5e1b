//! Configuration for table assertions

use std::fmt;
use std::sync::Arc;

use crate::compare::{
    self, CellContext, ColumnComparers, Comparer, ComparerResolver, TableColumnComparers,
};

/// How column names are matched between the expected and actual tables
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NameMatching {
    #[default]
    CaseSensitive,
    CaseInsensitive,
}

impl NameMatching {
    /// Key under which a name is compared
    pub fn key(self, name: &str) -> String {
        match self {
            NameMatching::CaseSensitive => name.to_string(),
            NameMatching::CaseInsensitive => name.to_uppercase(),
        }
    }
}

impl std::str::FromStr for NameMatching {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sensitive" | "case-sensitive" => Ok(NameMatching::CaseSensitive),
            "insensitive" | "case-insensitive" => Ok(NameMatching::CaseInsensitive),
            _ => Err(format!("Unknown name matching: {}", s)),
        }
    }
}

/// Per-cell veto: returning `true` skips the comparison of that cell
pub type SkipPredicate = Arc<dyn Fn(&CellContext<'_>) -> bool + Send + Sync>;

/// Configuration for one assertion call
///
/// Built by the caller, read-only while comparing, then discarded.
#[derive(Clone, Default)]
pub struct AssertConfig {
    /// Comparer used when no override applies; `None` means
    /// [`compare::equal_with_empty_message`]
    pub default_comparer: Option<Comparer>,
    /// Column name to comparer overrides, for every table
    pub column_comparers: ColumnComparers,
    /// Table name to column name to comparer overrides, consulted first
    pub table_comparers: TableColumnComparers,
    /// Column name matching between the two sides
    pub column_names: NameMatching,
    /// Wildcard patterns of columns left out of the comparison
    pub ignore_columns: Vec<String>,
    /// Cells for which this returns `true` are not compared
    pub skip: Option<SkipPredicate>,
}

impl fmt::Debug for AssertConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut tables: Vec<_> = self.table_comparers.keys().collect();
        tables.sort();
        let mut columns: Vec<_> = self.column_comparers.keys().collect();
        columns.sort();

        f.debug_struct("AssertConfig")
            .field("default_comparer", &self.default_comparer.is_some())
            .field("column_comparers", &columns)
            .field("table_comparers", &tables)
            .field("column_names", &self.column_names)
            .field("ignore_columns", &self.ignore_columns)
            .field("skip", &self.skip.is_some())
            .finish()
    }
}

impl AssertConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the comparer used when no override applies
    pub fn with_default_comparer(mut self, comparer: Comparer) -> Self {
        self.default_comparer = Some(comparer);
        self
    }

    /// Override the comparer for a column of any table
    pub fn with_column_comparer(mut self, column: impl Into<String>, comparer: Comparer) -> Self {
        self.column_comparers.insert(column.into(), comparer);
        self
    }

    pub fn with_column_comparers(mut self, comparers: ColumnComparers) -> Self {
        self.column_comparers = comparers;
        self
    }

    /// Override the comparer for one column of one table
    pub fn with_table_comparer(
        mut self,
        table: impl Into<String>,
        column: impl Into<String>,
        comparer: Comparer,
    ) -> Self {
        self.table_comparers
            .entry(table.into())
            .or_default()
            .insert(column.into(), comparer);
        self
    }

    pub fn with_table_comparers(mut self, comparers: TableColumnComparers) -> Self {
        self.table_comparers = comparers;
        self
    }

    /// Set column name matching
    pub fn with_column_names(mut self, matching: NameMatching) -> Self {
        self.column_names = matching;
        self
    }

    /// Leave columns matching these wildcard patterns out of the comparison
    pub fn with_ignore_columns<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ignore_columns = patterns.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_skip<F>(mut self, skip: F) -> Self
    where
        F: Fn(&CellContext<'_>) -> bool + Send + Sync + 'static,
    {
        self.skip = Some(Arc::new(skip));
        self
    }

    /// The configured default comparer, or the documented baseline
    pub fn default_comparer(&self) -> Comparer {
        self.default_comparer
            .clone()
            .unwrap_or_else(compare::equal_with_empty_message)
    }

    pub fn resolver(&self) -> ComparerResolver<'_> {
        ComparerResolver::new(
            self.default_comparer(),
            &self.table_comparers,
            &self.column_comparers,
        )
    }
}
