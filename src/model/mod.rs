//! Data model for tables, values and table views

mod datatype;
mod dataset;
mod filter;
mod schema;
mod sorted;
mod table;
mod value;

pub use datatype::{DataType, TypeFamily};
pub use dataset::{normalize_name, DataSet, DefaultDataSet};
pub use filter::{wildcard_match, ColumnFilter, ColumnFilterTable};
pub use schema::{Column, TableMetadata};
pub use sorted::{RowOrdering, SortedTable, ValueOrdering};
pub use table::{check_row, DefaultTable, Table};
pub use value::Value;
