//! Column-filtered table views

use crate::error::{AssertError, Result};

use super::schema::{Column, TableMetadata};
use super::table::Table;
use super::value::Value;

/// Include/exclude rules over column names
///
/// Patterns match case-insensitively; `*` matches any run of characters and
/// `?` matches exactly one. With no include patterns every column is included.
#[derive(Debug, Clone, Default)]
pub struct ColumnFilter {
    includes: Vec<String>,
    excludes: Vec<String>,
}

impl ColumnFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn include(mut self, pattern: impl Into<String>) -> Self {
        self.includes.push(pattern.into());
        self
    }

    pub fn exclude(mut self, pattern: impl Into<String>) -> Self {
        self.excludes.push(pattern.into());
        self
    }

    /// Filter that drops every column matching one of `patterns`
    pub fn excluding<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            includes: Vec::new(),
            excludes: patterns.into_iter().map(Into::into).collect(),
        }
    }

    /// Filter that keeps only columns matching one of `patterns`
    pub fn including<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            includes: patterns.into_iter().map(Into::into).collect(),
            excludes: Vec::new(),
        }
    }

    pub fn accept(&self, column: &Column) -> bool {
        let included = self.includes.is_empty()
            || self
                .includes
                .iter()
                .any(|p| wildcard_match(p, &column.name));
        included
            && !self
                .excludes
                .iter()
                .any(|p| wildcard_match(p, &column.name))
    }
}

/// Case-insensitive wildcard match supporting `*` and `?`
pub fn wildcard_match(pattern: &str, text: &str) -> bool {
    let pattern: Vec<char> = pattern.to_lowercase().chars().collect();
    let text: Vec<char> = text.to_lowercase().chars().collect();

    let (mut p, mut t) = (0, 0);
    let mut star: Option<usize> = None;
    let mut star_text = 0;

    while t < text.len() {
        if p < pattern.len() && (pattern[p] == '?' || pattern[p] == text[t]) {
            p += 1;
            t += 1;
        } else if p < pattern.len() && pattern[p] == '*' {
            star = Some(p);
            star_text = t;
            p += 1;
        } else if let Some(s) = star {
            p = s + 1;
            star_text += 1;
            t = star_text;
        } else {
            return false;
        }
    }

    while p < pattern.len() && pattern[p] == '*' {
        p += 1;
    }
    p == pattern.len()
}

/// View of a table exposing only the columns a filter accepts
pub struct ColumnFilterTable<T: Table> {
    original: T,
    metadata: TableMetadata,
}

impl<T: Table> ColumnFilterTable<T> {
    pub fn new(original: T, filter: &ColumnFilter) -> Self {
        let source = original.metadata();
        let columns: Vec<Column> = source
            .columns
            .iter()
            .filter(|c| filter.accept(c))
            .cloned()
            .collect();
        let primary_keys = source
            .primary_keys
            .iter()
            .filter(|key| columns.iter().any(|c| &c.name == *key))
            .cloned()
            .collect::<Vec<_>>();
        let metadata =
            TableMetadata::new(source.table_name.clone(), columns).with_primary_keys(primary_keys);

        Self { original, metadata }
    }

    /// View without the columns matching `patterns`
    pub fn excluding(original: T, patterns: &[String]) -> Self {
        Self::new(original, &ColumnFilter::excluding(patterns.iter().cloned()))
    }

    /// View with only the columns matching `patterns`
    pub fn including(original: T, patterns: &[String]) -> Self {
        Self::new(original, &ColumnFilter::including(patterns.iter().cloned()))
    }

    pub fn original(&self) -> &T {
        &self.original
    }
}

impl<T: Table> Table for ColumnFilterTable<T> {
    fn metadata(&self) -> &TableMetadata {
        &self.metadata
    }

    fn row_count(&self) -> usize {
        self.original.row_count()
    }

    fn value(&self, row: usize, column: &str) -> Result<Value> {
        let index = self
            .metadata
            .column_index(column)
            .or_else(|| self.metadata.column_index_ignore_case(column))
            .ok_or_else(|| AssertError::no_such_column(&self.metadata.table_name, column))?;
        self.original.value(row, &self.metadata.columns[index].name)
    }

    fn unfiltered(&self) -> Option<&dyn Table> {
        Some(&self.original)
    }
}
