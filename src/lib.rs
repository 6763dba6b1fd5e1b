//! tablecmp - Fixture-based assertions for tabular data
//!
//! Compares an expected relation with an actual one cell by cell. Row order is
//! aligned with [`model::SortedTable`], columns can be left out with
//! [`model::ColumnFilterTable`], and the equivalence rule of every cell is a
//! pluggable [`compare::ValueComparer`].
//!
//! ```no_run
//! use tablecmp::compare;
//! use tablecmp::{AssertConfig, Assertion, DefaultTable, SortedTable};
//!
//! # fn run(expected: DefaultTable, actual: DefaultTable) -> tablecmp::Result<()> {
//! let config = AssertConfig::new()
//!     .with_column_comparer("updated_at", compare::timestamp_within_tolerance(0, 500));
//! let expected = SortedTable::by_primary_keys(expected)?;
//! let actual = SortedTable::by_primary_keys(actual)?;
//! Assertion::new(config).assert_equals(&expected, &actual)?;
//! # Ok(())
//! # }
//! ```

pub mod compare;
pub mod config;
pub mod diff;
pub mod error;
pub mod model;
pub mod report;

pub use config::{AssertConfig, NameMatching};
pub use diff::{assert_equals, assert_with_config, Assertion};
pub use error::{AssertError, AssertionFailure, Result};
pub use model::{
    Column, ColumnFilterTable, DataSet, DataType, DefaultDataSet, DefaultTable, SortedTable,
    Table, TableMetadata, Value,
};
pub use report::{DefaultFailureHandler, DiffCollectingFailureHandler, FailureHandler};
