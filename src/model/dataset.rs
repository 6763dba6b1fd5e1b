//! Named collections of tables

use indexmap::IndexMap;

use crate::error::{AssertError, Result};

use super::table::Table;

/// A named collection of tables
pub trait DataSet {
    /// Table names in the data set's own order
    fn table_names(&self) -> Vec<String>;

    /// Look up a table, honouring the data set's name sensitivity
    fn table(&self, name: &str) -> Result<&dyn Table>;

    fn case_sensitive_table_names(&self) -> bool;
}

/// Normalize a table name for lookup under the given sensitivity
pub fn normalize_name(name: &str, case_sensitive: bool) -> String {
    if case_sensitive {
        name.to_string()
    } else {
        name.to_uppercase()
    }
}

/// Data set held in memory, keeping declaration order
#[derive(Default)]
pub struct DefaultDataSet {
    tables: IndexMap<String, Box<dyn Table>>,
    case_sensitive: bool,
}

impl DefaultDataSet {
    /// Create an empty data set with case-insensitive table names
    pub fn new() -> Self {
        Self::default()
    }

    pub fn case_sensitive(case_sensitive: bool) -> Self {
        Self {
            tables: IndexMap::new(),
            case_sensitive,
        }
    }

    /// Add a table; fails if a table with the same (normalized) name exists
    pub fn add_table(&mut self, table: impl Table + 'static) -> Result<()> {
        let name = table.table_name().to_string();
        let key = normalize_name(&name, self.case_sensitive);
        if self.tables.contains_key(&key) {
            return Err(AssertError::DuplicateTable { name });
        }
        self.tables.insert(key, Box::new(table));
        Ok(())
    }

    pub fn with_table(mut self, table: impl Table + 'static) -> Result<Self> {
        self.add_table(table)?;
        Ok(self)
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

impl DataSet for DefaultDataSet {
    fn table_names(&self) -> Vec<String> {
        self.tables
            .values()
            .map(|t| t.table_name().to_string())
            .collect()
    }

    fn table(&self, name: &str) -> Result<&dyn Table> {
        self.tables
            .get(&normalize_name(name, self.case_sensitive))
            .map(|t| t.as_ref())
            .ok_or_else(|| AssertError::NoSuchTable {
                name: name.to_string(),
            })
    }

    fn case_sensitive_table_names(&self) -> bool {
        self.case_sensitive
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Column, DefaultTable};

    fn empty(name: &str) -> DefaultTable {
        DefaultTable::with_columns(name, vec![Column::new("id")])
    }

    #[test]
    fn test_lookup_ignores_case_by_default() {
        let ds = DefaultDataSet::new()
            .with_table(empty("Users"))
            .unwrap()
            .with_table(empty("orders"))
            .unwrap();
        assert_eq!(ds.table_names(), vec!["Users", "orders"]);
        assert_eq!(ds.table("USERS").unwrap().table_name(), "Users");
        assert!(matches!(ds.table("items"), Err(AssertError::NoSuchTable { .. })));
    }

    #[test]
    fn test_duplicates_rejected() {
        let mut ds = DefaultDataSet::new();
        ds.add_table(empty("users")).unwrap();
        assert!(matches!(
            ds.add_table(empty("USERS")),
            Err(AssertError::DuplicateTable { .. })
        ));

        let mut sensitive = DefaultDataSet::case_sensitive(true);
        sensitive.add_table(empty("users")).unwrap();
        sensitive.add_table(empty("USERS")).unwrap();
        assert_eq!(sensitive.len(), 2);
        assert!(sensitive.table("Users").is_err());
    }
}
