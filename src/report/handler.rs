//! Fail-fast failure handling

use crate::error::Result;

use super::{build_message, DefaultFailureFactory, Difference, FailureFactory, FailureHandler};

/// Raises a failure for the first difference it receives
pub struct DefaultFailureHandler {
    additional_columns: Vec<String>,
    factory: Box<dyn FailureFactory>,
}

impl Default for DefaultFailureHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl DefaultFailureHandler {
    pub fn new() -> Self {
        Self {
            additional_columns: Vec::new(),
            factory: Box::new(DefaultFailureFactory),
        }
    }

    /// Report these columns of the failing row alongside the failure
    pub fn with_additional_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.additional_columns = columns.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_factory(mut self, factory: impl FailureFactory + 'static) -> Self {
        self.factory = Box::new(factory);
        self
    }

    pub fn additional_columns(&self) -> &[String] {
        &self.additional_columns
    }
}

impl FailureHandler for DefaultFailureHandler {
    fn handle(&mut self, difference: Difference<'_>) -> Result<()> {
        let message = build_message(&difference, &self.additional_columns);
        Err(self.factory.create_failure(
            &message,
            &difference.expected.to_string(),
            &difference.actual.to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{name_difference, users};
    use super::*;
    use crate::error::AssertError;

    #[test]
    fn test_raises_first_difference() {
        let (e, a) = (users(&[(1, "Ann")]), users(&[(1, "Bob")]));
        let mut handler = DefaultFailureHandler::new().with_additional_columns(["id"]);
        let err = handler.handle(name_difference(&e, &a, "")).unwrap_err();

        let failure = err.as_failure().unwrap();
        assert_eq!(failure.expected.as_deref(), Some("Ann"));
        assert_eq!(failure.actual.as_deref(), Some("Bob"));
        assert_eq!(
            err.to_string(),
            "value (table=USERS, row=0, col=name, Additional row info: ('id': expected=<1>, actual=<1>)): \
             expected:<Ann> but was:<Bob>"
        );
    }

    struct HostFactory;

    impl FailureFactory for HostFactory {
        fn create_failure(&self, message: &str, expected: &str, actual: &str) -> AssertError {
            anyhow::anyhow!("HOST {} [{} != {}]", message, expected, actual).into()
        }

        fn create_message_failure(&self, message: &str) -> AssertError {
            anyhow::anyhow!("HOST {}", message).into()
        }
    }

    #[test]
    fn test_host_factory_substitutes_error() {
        let (e, a) = (users(&[(1, "Ann")]), users(&[(1, "Bob")]));
        let mut handler = DefaultFailureHandler::new().with_factory(HostFactory);
        let err = handler.handle(name_difference(&e, &a, "")).unwrap_err();
        assert!(matches!(err, AssertError::Host(_)));
        assert_eq!(
            err.to_string(),
            "HOST value (table=USERS, row=0, col=name) [Ann != Bob]"
        );
    }
}
