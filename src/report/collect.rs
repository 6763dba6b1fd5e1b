//! Collecting every difference before failing

use serde::Serialize;

use crate::error::{AssertError, AssertionFailure, Result};
use crate::model::{DataType, Value};

use super::{build_message, Difference, FailureFactory, FailureHandler};

/// An owned record of one difference
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CollectedDifference {
    pub table: String,
    pub row: usize,
    pub column: String,
    pub data_type: DataType,
    pub expected: Value,
    pub actual: Value,
    pub detail: String,
    /// Full location message, including any additional row info
    pub message: String,
}

impl CollectedDifference {
    pub fn to_failure(&self) -> AssertionFailure {
        AssertionFailure::new(
            self.message.clone(),
            self.expected.to_string(),
            self.actual.to_string(),
        )
    }
}

/// Records every difference and lets the scan continue
///
/// Call [`DiffCollectingFailureHandler::raise_if_any`] after the assertion to
/// fail once with all differences.
#[derive(Default)]
pub struct DiffCollectingFailureHandler {
    additional_columns: Vec<String>,
    factory: Option<Box<dyn FailureFactory>>,
    differences: Vec<CollectedDifference>,
}

impl DiffCollectingFailureHandler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_additional_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.additional_columns = columns.into_iter().map(Into::into).collect();
        self
    }

    /// Raise through a host factory instead of [`AssertError::Differences`]
    pub fn with_factory(mut self, factory: impl FailureFactory + 'static) -> Self {
        self.factory = Some(Box::new(factory));
        self
    }

    pub fn differences(&self) -> &[CollectedDifference] {
        &self.differences
    }

    pub fn into_differences(self) -> Vec<CollectedDifference> {
        self.differences
    }

    pub fn is_empty(&self) -> bool {
        self.differences.is_empty()
    }

    pub fn clear(&mut self) {
        self.differences.clear();
    }

    /// Fail with every collected difference, if there are any
    pub fn raise_if_any(&self) -> Result<()> {
        if self.differences.is_empty() {
            return Ok(());
        }

        let failures: Vec<AssertionFailure> = self
            .differences
            .iter()
            .map(CollectedDifference::to_failure)
            .collect();
        let error = AssertError::Differences {
            count: failures.len(),
            failures,
        };
        match &self.factory {
            Some(factory) => Err(factory.create_message_failure(&error.to_string())),
            None => Err(error),
        }
    }
}

impl FailureHandler for DiffCollectingFailureHandler {
    fn handle(&mut self, difference: Difference<'_>) -> Result<()> {
        let message = build_message(&difference, &self.additional_columns);
        self.differences.push(CollectedDifference {
            table: difference.table_name().to_string(),
            row: difference.row,
            column: difference.column.to_string(),
            data_type: difference.data_type,
            expected: difference.expected,
            actual: difference.actual,
            detail: difference.detail,
            message,
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{name_difference, users};
    use super::super::DefaultFailureFactory;
    use super::*;

    #[test]
    fn test_collects_and_raises_once() {
        let (e, a) = (users(&[(1, "Ann")]), users(&[(1, "Bob")]));
        let mut handler = DiffCollectingFailureHandler::new();
        assert!(handler.raise_if_any().is_ok());

        handler.handle(name_difference(&e, &a, "")).unwrap();
        handler.handle(name_difference(&e, &a, "again")).unwrap();
        assert_eq!(handler.differences().len(), 2);
        assert_eq!(handler.differences()[1].message, "again: value (table=USERS, row=0, col=name)");

        match handler.raise_if_any().unwrap_err() {
            AssertError::Differences { count, failures } => {
                assert_eq!(count, 2);
                assert_eq!(failures[0].expected.as_deref(), Some("Ann"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_raise_through_factory() {
        let (e, a) = (users(&[(1, "Ann")]), users(&[(1, "Bob")]));
        let mut handler = DiffCollectingFailureHandler::new().with_factory(DefaultFailureFactory);
        handler.handle(name_difference(&e, &a, "")).unwrap();

        let err = handler.raise_if_any().unwrap_err();
        let failure = err.as_failure().unwrap();
        assert!(failure.message.starts_with("1 difference(s) found:"));
        assert!(failure.expected.is_none());
    }
}
