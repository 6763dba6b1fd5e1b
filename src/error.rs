//! Error types for table assertions

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::DataType;

pub type Result<T> = std::result::Result<T, AssertError>;

/// A reported mismatch between an expected and an actual value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssertionFailure {
    /// Human readable location and reason
    pub message: String,
    /// Rendered expected value, if the failure compares two values
    pub expected: Option<String>,
    /// Rendered actual value, if the failure compares two values
    pub actual: Option<String>,
}

impl AssertionFailure {
    /// Failure comparing an expected and an actual value
    pub fn new(
        message: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self {
            message: message.into(),
            expected: Some(expected.into()),
            actual: Some(actual.into()),
        }
    }

    /// Failure carrying only a message
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            expected: None,
            actual: None,
        }
    }
}

impl fmt::Display for AssertionFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.expected, &self.actual) {
            (Some(expected), Some(actual)) => write!(
                f,
                "{}: expected:<{}> but was:<{}>",
                self.message, expected, actual
            ),
            _ => write!(f, "{}", self.message),
        }
    }
}

#[derive(Error, Debug)]
pub enum AssertError {
    #[error(
        "Table names differ: expected:<[{}]> but was:<[{}]>",
        .expected.join(", "),
        .actual.join(", ")
    )]
    TableNamesMismatch {
        expected: Vec<String>,
        actual: Vec<String>,
    },

    #[error("Row count mismatch (table={table}): expected:<{expected}> but was:<{actual}>")]
    RowCountMismatch {
        table: String,
        expected: usize,
        actual: usize,
    },

    #[error(
        "Column mismatch (table={table}, expectedColCount={}, actualColCount={}): expected:<[{}]> but was:<[{}]>",
        .expected.len(),
        .actual.len(),
        .expected.join(", "),
        .actual.join(", ")
    )]
    ColumnMismatch {
        table: String,
        expected: Vec<String>,
        actual: Vec<String>,
    },

    #[error("Incompatible data types (table={table}, col={column}): expected:<{expected}> but was:<{actual}>")]
    IncompatibleTypes {
        table: String,
        column: String,
        expected: DataType,
        actual: DataType,
    },

    #[error("No comparer registered for selector key {key} (table={table}, row={row}, col={column})")]
    ComparerNotFound {
        table: String,
        row: usize,
        column: String,
        key: String,
    },

    #[error("Sort configuration error: {message}")]
    SortConfiguration { message: String },

    #[error("No such column '{column}' in table {table}")]
    NoSuchColumn { table: String, column: String },

    #[error("No such table: {name}")]
    NoSuchTable { name: String },

    #[error("Duplicate table name: {name}")]
    DuplicateTable { name: String },

    #[error("Row {row} out of bounds (table={table}, rowCount={row_count})")]
    RowOutOfBounds {
        table: String,
        row: usize,
        row_count: usize,
    },

    #[error("Row has {actual} values but table {table} has {expected} columns")]
    RowWidth {
        table: String,
        expected: usize,
        actual: usize,
    },

    #[error("Cannot cast '{value}' to {data_type}: {reason}")]
    TypeCast {
        value: String,
        data_type: DataType,
        reason: String,
    },

    #[error("{0}")]
    Failure(AssertionFailure),

    #[error(
        "{count} difference(s) found:\n{}",
        .failures.iter().map(ToString::to_string).collect::<Vec<_>>().join("\n")
    )]
    Differences {
        count: usize,
        failures: Vec<AssertionFailure>,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Host(#[from] anyhow::Error),
}

impl AssertError {
    /// Whether this error describes a fixture setup problem rather than differing data
    pub fn is_structural(&self) -> bool {
        !matches!(
            self,
            Self::Failure(_)
                | Self::Differences { .. }
                | Self::Io(_)
                | Self::Json(_)
                | Self::Host(_)
        )
    }

    pub fn sort_configuration(msg: impl Into<String>) -> Self {
        Self::SortConfiguration {
            message: msg.into(),
        }
    }

    pub fn no_such_column(table: impl Into<String>, column: impl Into<String>) -> Self {
        Self::NoSuchColumn {
            table: table.into(),
            column: column.into(),
        }
    }

    pub fn type_cast(
        value: impl fmt::Display,
        data_type: DataType,
        reason: impl Into<String>,
    ) -> Self {
        Self::TypeCast {
            value: value.to_string(),
            data_type,
            reason: reason.into(),
        }
    }

    /// The reported failure, if this error is a single cell mismatch
    pub fn as_failure(&self) -> Option<&AssertionFailure> {
        match self {
            Self::Failure(failure) => Some(failure),
            _ => None,
        }
    }
}
