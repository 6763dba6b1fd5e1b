//! Built-in comparers

use std::cmp::Ordering;
use std::sync::Arc;

use crate::error::{AssertError, Result};
use crate::model::{DataType, Value};

use super::{CellContext, Comparer, ValueComparer};

/// Required relation of the actual value to the expected value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relation {
    Equal,
    NotEqual,
    GreaterThan,
    GreaterOrEqual,
    LessThan,
    LessOrEqual,
}

impl Relation {
    /// Whether `compare(actual, expected)` satisfies the relation
    pub fn holds(self, ordering: Ordering) -> bool {
        match self {
            Relation::Equal => ordering == Ordering::Equal,
            Relation::NotEqual => ordering != Ordering::Equal,
            Relation::GreaterThan => ordering == Ordering::Greater,
            Relation::GreaterOrEqual => ordering != Ordering::Less,
            Relation::LessThan => ordering == Ordering::Less,
            Relation::LessOrEqual => ordering != Ordering::Greater,
        }
    }

    pub fn fail_phrase(self) -> &'static str {
        match self {
            Relation::Equal => "not equal to",
            Relation::NotEqual => "equal to",
            Relation::GreaterThan => "not greater than",
            Relation::GreaterOrEqual => "not greater than or equal to",
            Relation::LessThan => "not less than",
            Relation::LessOrEqual => "not less than or equal to",
        }
    }
}

/// Compares cells with the reconciled column type's ordering
#[derive(Debug, Clone, Copy)]
pub struct RelationComparer {
    relation: Relation,
    /// An empty detail keeps failure messages in the bare `value (...)` form
    empty_message: bool,
}

impl RelationComparer {
    pub fn new(relation: Relation) -> Self {
        Self {
            relation,
            empty_message: false,
        }
    }

    pub fn with_empty_message(relation: Relation) -> Self {
        Self {
            relation,
            empty_message: true,
        }
    }

    pub fn relation(&self) -> Relation {
        self.relation
    }
}

impl ValueComparer for RelationComparer {
    fn compare(&self, cell: &CellContext<'_>) -> Result<Option<String>> {
        let ordering = cell.data_type.compare(cell.actual, cell.expected)?;
        if self.relation.holds(ordering) {
            return Ok(None);
        }
        if self.empty_message {
            Ok(Some(String::new()))
        } else {
            Ok(Some(cell.fail_message(self.relation.fail_phrase())))
        }
    }
}

/// Passes when two timestamps lie between `low` and `high` milliseconds apart,
/// both bounds inclusive
#[derive(Debug, Clone, Copy)]
pub struct TimestampTolerance {
    low_millis: u64,
    high_millis: u64,
}

impl TimestampTolerance {
    pub fn new(low_millis: u64, high_millis: u64) -> Self {
        Self {
            low_millis,
            high_millis,
        }
    }

    fn millis(value: &Value) -> Result<i64> {
        match DataType::Timestamp.cast(value)? {
            Value::DateTime(dt) => Ok(dt.and_utc().timestamp_millis()),
            other => Err(AssertError::type_cast(
                other,
                DataType::Timestamp,
                "not a timestamp",
            )),
        }
    }

    fn phrase(&self) -> String {
        format!(
            "not within tolerance range of {} - {} milliseconds of",
            self.low_millis, self.high_millis
        )
    }
}

impl ValueComparer for TimestampTolerance {
    fn compare(&self, cell: &CellContext<'_>) -> Result<Option<String>> {
        if cell.expected.is_null() || cell.actual.is_null() {
            return Ok(if cell.expected.is_null() && cell.actual.is_null() {
                None
            } else {
                Some(cell.fail_message(&self.phrase()))
            });
        }

        let diff = Self::millis(cell.actual)?.abs_diff(Self::millis(cell.expected)?);
        if (self.low_millis..=self.high_millis).contains(&diff) {
            Ok(None)
        } else {
            Ok(Some(cell.fail_message(&self.phrase())))
        }
    }
}

/// Passes when the actual value's text contains the expected value's text
#[derive(Debug, Clone, Copy, Default)]
pub struct StringContains;

impl ValueComparer for StringContains {
    fn compare(&self, cell: &CellContext<'_>) -> Result<Option<String>> {
        let passed = match (cell.expected.is_null(), cell.actual.is_null()) {
            (true, true) => true,
            (false, false) => cell
                .actual
                .display()
                .contains(cell.expected.display().as_ref()),
            _ => false,
        };
        Ok((!passed).then(|| cell.fail_message("not containing")))
    }
}

/// Accepts every pair of values
#[derive(Debug, Clone, Copy, Default)]
pub struct NeverFails;

impl ValueComparer for NeverFails {
    fn compare(&self, _cell: &CellContext<'_>) -> Result<Option<String>> {
        Ok(None)
    }
}

/// Actual must equal expected; nulls equal each other
pub fn equal() -> Comparer {
    Arc::new(RelationComparer::new(Relation::Equal))
}

/// `equal()` reporting an empty detail, the default when none is configured
pub fn equal_with_empty_message() -> Comparer {
    Arc::new(RelationComparer::with_empty_message(Relation::Equal))
}

pub fn not_equal() -> Comparer {
    Arc::new(RelationComparer::new(Relation::NotEqual))
}

pub fn greater_than() -> Comparer {
    Arc::new(RelationComparer::new(Relation::GreaterThan))
}

pub fn greater_or_equal() -> Comparer {
    Arc::new(RelationComparer::new(Relation::GreaterOrEqual))
}

pub fn less_than() -> Comparer {
    Arc::new(RelationComparer::new(Relation::LessThan))
}

pub fn less_or_equal() -> Comparer {
    Arc::new(RelationComparer::new(Relation::LessOrEqual))
}

pub fn timestamp_within_tolerance(low_millis: u64, high_millis: u64) -> Comparer {
    Arc::new(TimestampTolerance::new(low_millis, high_millis))
}

pub fn contains() -> Comparer {
    Arc::new(StringContains)
}

pub fn never_fails() -> Comparer {
    Arc::new(NeverFails)
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{cell, table};
    use super::*;
    use chrono::{Duration, NaiveDate};

    fn check(
        comparer: &Comparer,
        data_type: DataType,
        expected: Value,
        actual: Value,
    ) -> Option<String> {
        let t = table();
        comparer
            .compare(&cell(&t, data_type, &expected, &actual))
            .unwrap()
    }

    #[test]
    fn test_equal_null_symmetry() {
        let eq = equal();
        assert_eq!(check(&eq, DataType::Integer, Value::Null, Value::Null), None);
        assert!(check(&eq, DataType::Integer, Value::Null, Value::Int(1)).is_some());
        assert!(check(&eq, DataType::Integer, Value::Int(1), Value::Null).is_some());
        assert_eq!(
            check(&eq, DataType::Integer, Value::Int(1), Value::Int(2)).as_deref(),
            Some("Actual value='2' is not equal to expected value='1'")
        );
    }

    #[test]
    fn test_equal_uses_reconciled_type() {
        let eq = equal();
        assert_eq!(check(&eq, DataType::Integer, Value::from("7.0"), Value::Int(7)), None);
        assert!(check(&eq, DataType::Varchar, Value::from("7.0"), Value::Int(7)).is_some());
    }

    #[test]
    fn test_empty_message_variant() {
        let eq = equal_with_empty_message();
        assert_eq!(
            check(&eq, DataType::Integer, Value::Int(1), Value::Int(2)).as_deref(),
            Some("")
        );
    }

    #[test]
    fn test_ordering_relations() {
        let ge = greater_or_equal();
        assert_eq!(check(&ge, DataType::Integer, Value::Int(5), Value::Int(5)), None);
        assert_eq!(check(&ge, DataType::Integer, Value::Int(5), Value::Int(6)), None);
        assert_eq!(
            check(&ge, DataType::Integer, Value::Int(5), Value::Int(4)).as_deref(),
            Some("Actual value='4' is not greater than or equal to expected value='5'")
        );

        let le = less_or_equal();
        assert_eq!(check(&le, DataType::Integer, Value::Int(5), Value::Int(4)), None);
        assert!(check(&le, DataType::Integer, Value::Int(5), Value::Int(6)).is_some());

        let gt = greater_than();
        assert!(check(&gt, DataType::Integer, Value::Int(5), Value::Int(5)).is_some());
        let lt = less_than();
        assert_eq!(check(&lt, DataType::Integer, Value::Int(5), Value::Int(4)), None);

        let ne = not_equal();
        assert_eq!(
            check(&ne, DataType::Integer, Value::Int(4), Value::Int(4)).as_deref(),
            Some("Actual value='4' is equal to expected value='4'")
        );
    }

    #[test]
    fn test_timestamp_tolerance_bounds_inclusive() {
        let base = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        let within = timestamp_within_tolerance(200, 400);
        let at = |ms: i64| Value::DateTime(base + Duration::milliseconds(ms));

        assert_eq!(check(&within, DataType::Timestamp, at(0), at(200)), None);
        assert_eq!(check(&within, DataType::Timestamp, at(0), at(400)), None);
        assert_eq!(check(&within, DataType::Timestamp, at(400), at(0)), None);
        assert!(check(&within, DataType::Timestamp, at(0), at(199)).is_some());
        assert!(check(&within, DataType::Timestamp, at(0), at(401)).is_some());
    }

    #[test]
    fn test_timestamp_tolerance_nulls() {
        let within = timestamp_within_tolerance(0, 10);
        assert_eq!(check(&within, DataType::Timestamp, Value::Null, Value::Null), None);
        let detail = check(
            &within,
            DataType::Timestamp,
            Value::Null,
            Value::from("2024-01-01 00:00:00"),
        )
        .unwrap();
        assert!(detail.contains("not within tolerance range of 0 - 10 milliseconds of"));
    }

    #[test]
    fn test_timestamp_tolerance_parses_text() {
        let within = timestamp_within_tolerance(0, 1000);
        assert_eq!(
            check(
                &within,
                DataType::Unknown,
                Value::from("2024-01-01 00:00:00"),
                Value::from("2024-01-01T00:00:00.500"),
            ),
            None
        );
    }

    #[test]
    fn test_contains() {
        let c = contains();
        assert_eq!(check(&c, DataType::Varchar, Value::from("ell"), Value::from("hello")), None);
        assert_eq!(check(&c, DataType::Varchar, Value::Null, Value::Null), None);
        assert!(check(&c, DataType::Varchar, Value::Null, Value::from("x")).is_some());
        assert!(check(&c, DataType::Varchar, Value::from("x"), Value::Null).is_some());
        assert_eq!(
            check(&c, DataType::Varchar, Value::from("xyz"), Value::from("hello")).as_deref(),
            Some("Actual value='hello' is not containing expected value='xyz'")
        );
    }

    #[test]
    fn test_never_fails() {
        let n = never_fails();
        assert_eq!(check(&n, DataType::Integer, Value::Int(1), Value::from("x")), None);
    }
}
