//! Column data types and value casting

use std::borrow::Cow;
use std::cmp::Ordering;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use super::value::{exact_int, Value};
use crate::error::{AssertError, Result};

/// Group of data types whose values can be compared with each other
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TypeFamily {
    Unknown,
    Text,
    Integer,
    Decimal,
    Boolean,
    Date,
    Time,
    Timestamp,
    Binary,
}

/// Declared type of a column
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataType {
    /// Type could not be determined from the source metadata
    #[default]
    Unknown,
    Varchar,
    Char,
    LongVarchar,
    NChar,
    NVarchar,
    Clob,
    TinyInt,
    SmallInt,
    Integer,
    BigInt,
    Numeric,
    Decimal,
    Real,
    Float,
    Double,
    Boolean,
    Date,
    Time,
    Timestamp,
    Binary,
    VarBinary,
    Blob,
}

impl DataType {
    pub fn family(self) -> TypeFamily {
        match self {
            DataType::Unknown => TypeFamily::Unknown,
            DataType::Varchar
            | DataType::Char
            | DataType::LongVarchar
            | DataType::NChar
            | DataType::NVarchar
            | DataType::Clob => TypeFamily::Text,
            DataType::TinyInt | DataType::SmallInt | DataType::Integer | DataType::BigInt => {
                TypeFamily::Integer
            }
            DataType::Numeric
            | DataType::Decimal
            | DataType::Real
            | DataType::Float
            | DataType::Double => TypeFamily::Decimal,
            DataType::Boolean => TypeFamily::Boolean,
            DataType::Date => TypeFamily::Date,
            DataType::Time => TypeFamily::Time,
            DataType::Timestamp => TypeFamily::Timestamp,
            DataType::Binary | DataType::VarBinary | DataType::Blob => TypeFamily::Binary,
        }
    }

    /// The general type of the family this type specialises, if any
    pub fn parent(self) -> Option<DataType> {
        match self {
            DataType::Char
            | DataType::LongVarchar
            | DataType::NChar
            | DataType::NVarchar
            | DataType::Clob => Some(DataType::Varchar),
            DataType::TinyInt | DataType::SmallInt | DataType::Integer => Some(DataType::BigInt),
            DataType::Decimal | DataType::Real | DataType::Float | DataType::Double => {
                Some(DataType::Numeric)
            }
            DataType::Binary | DataType::Blob => Some(DataType::VarBinary),
            _ => None,
        }
    }

    pub fn is_unknown(self) -> bool {
        self == DataType::Unknown
    }

    /// Whether `self` is `other` or a specialisation of it
    pub fn specializes(self, other: DataType) -> bool {
        self == other || self.parent() == Some(other)
    }

    /// Whether values of the two types can be compared under one of them
    pub fn is_compatible_with(self, other: DataType) -> bool {
        self.is_unknown() || other.is_unknown() || self.family() == other.family()
    }

    /// Convert a raw value into this type's canonical value
    pub fn cast(self, value: &Value) -> Result<Value> {
        if value.is_null() {
            return Ok(Value::Null);
        }

        match self.family() {
            TypeFamily::Unknown => Ok(value.clone()),
            TypeFamily::Text => match value {
                Value::String(_) => Ok(value.clone()),
                other => Ok(Value::String(Cow::Owned(other.display().into_owned()))),
            },
            TypeFamily::Integer => self.cast_integer(value),
            TypeFamily::Decimal => match value {
                Value::Int(_) | Value::Float(_) => Ok(value.clone()),
                Value::String(s) => s
                    .trim()
                    .parse::<f64>()
                    .map(Value::Float)
                    .map_err(|e| AssertError::type_cast(value, self, e.to_string())),
                other => Err(AssertError::type_cast(other, self, "not a number")),
            },
            TypeFamily::Boolean => match value {
                Value::Bool(_) => Ok(value.clone()),
                Value::Int(0) => Ok(Value::Bool(false)),
                Value::Int(1) => Ok(Value::Bool(true)),
                Value::String(s) => parse_bool(s)
                    .map(Value::Bool)
                    .ok_or_else(|| AssertError::type_cast(value, self, "not a boolean")),
                other => Err(AssertError::type_cast(other, self, "not a boolean")),
            },
            TypeFamily::Date => match value {
                Value::Date(_) => Ok(value.clone()),
                Value::DateTime(dt) => Ok(Value::Date(dt.date())),
                Value::String(s) => NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
                    .ok()
                    .or_else(|| parse_timestamp(s).map(|dt| dt.date()))
                    .map(Value::Date)
                    .ok_or_else(|| AssertError::type_cast(value, self, "not a date")),
                other => Err(AssertError::type_cast(other, self, "not a date")),
            },
            TypeFamily::Time => match value {
                Value::Time(_) => Ok(value.clone()),
                Value::DateTime(dt) => Ok(Value::Time(dt.time())),
                Value::String(s) => parse_time(s)
                    .map(Value::Time)
                    .ok_or_else(|| AssertError::type_cast(value, self, "not a time")),
                other => Err(AssertError::type_cast(other, self, "not a time")),
            },
            TypeFamily::Timestamp => match value {
                Value::DateTime(_) => Ok(value.clone()),
                Value::Date(d) => Ok(Value::DateTime(d.and_time(NaiveTime::MIN))),
                Value::Int(millis) => DateTime::from_timestamp_millis(*millis)
                    .map(|dt| Value::DateTime(dt.naive_utc()))
                    .ok_or_else(|| {
                        AssertError::type_cast(value, self, "epoch millis out of range")
                    }),
                Value::String(s) => parse_timestamp(s)
                    .map(Value::DateTime)
                    .ok_or_else(|| AssertError::type_cast(value, self, "not a timestamp")),
                other => Err(AssertError::type_cast(other, self, "not a timestamp")),
            },
            TypeFamily::Binary => match value {
                Value::Bytes(_) => Ok(value.clone()),
                Value::String(s) => Ok(Value::Bytes(s.as_bytes().to_vec())),
                other => Err(AssertError::type_cast(other, self, "not binary")),
            },
        }
    }

    /// Integer for a float without fraction; never saturates at the i64 limits
    fn integral_float(self, value: &Value, f: f64) -> Result<Value> {
        if !f.is_finite() || f.fract() != 0.0 {
            return Err(AssertError::type_cast(value, self, "not an integer"));
        }
        exact_int(f)
            .map(Value::Int)
            .ok_or_else(|| AssertError::type_cast(value, self, "integer out of range"))
    }

    fn cast_integer(self, value: &Value) -> Result<Value> {
        match value {
            Value::Int(_) => Ok(value.clone()),
            Value::Float(f) => self.integral_float(value, *f),
            Value::Bool(b) => Ok(Value::Int(i64::from(*b))),
            Value::String(s) => {
                let trimmed = s.trim();
                if let Ok(i) = trimmed.parse::<i64>() {
                    return Ok(Value::Int(i));
                }
                match trimmed.parse::<f64>() {
                    Ok(f) => self.integral_float(value, f),
                    Err(_) => Err(AssertError::type_cast(value, self, "not an integer")),
                }
            }
            other => Err(AssertError::type_cast(other, self, "not an integer")),
        }
    }

    /// Compare two values under this type. Nulls are equal to each other and
    /// lower than any other value.
    pub fn compare(self, a: &Value, b: &Value) -> Result<Ordering> {
        match (a.is_null(), b.is_null()) {
            (true, true) => return Ok(Ordering::Equal),
            (true, false) => return Ok(Ordering::Less),
            (false, true) => return Ok(Ordering::Greater),
            (false, false) => {}
        }
        let a = self.cast(a)?;
        let b = self.cast(b)?;
        Ok(a.canonical_cmp(&b))
    }

    /// Render a value in this type's canonical display form
    pub fn render(self, value: &Value) -> Result<String> {
        Ok(self.cast(value)?.display().into_owned())
    }
}

impl std::fmt::Display for DataType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            DataType::Unknown => "UNKNOWN",
            DataType::Varchar => "VARCHAR",
            DataType::Char => "CHAR",
            DataType::LongVarchar => "LONGVARCHAR",
            DataType::NChar => "NCHAR",
            DataType::NVarchar => "NVARCHAR",
            DataType::Clob => "CLOB",
            DataType::TinyInt => "TINYINT",
            DataType::SmallInt => "SMALLINT",
            DataType::Integer => "INTEGER",
            DataType::BigInt => "BIGINT",
            DataType::Numeric => "NUMERIC",
            DataType::Decimal => "DECIMAL",
            DataType::Real => "REAL",
            DataType::Float => "FLOAT",
            DataType::Double => "DOUBLE",
            DataType::Boolean => "BOOLEAN",
            DataType::Date => "DATE",
            DataType::Time => "TIME",
            DataType::Timestamp => "TIMESTAMP",
            DataType::Binary => "BINARY",
            DataType::VarBinary => "VARBINARY",
            DataType::Blob => "BLOB",
        };
        write!(f, "{}", name)
    }
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "true" | "t" | "yes" | "y" | "1" => Some(true),
        "false" | "f" | "no" | "n" | "0" => Some(false),
        _ => None,
    }
}

fn parse_time(s: &str) -> Option<NaiveTime> {
    let s = s.trim();
    NaiveTime::parse_from_str(s, "%H:%M:%S%.f")
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M"))
        .ok()
}

fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    const FORMATS: [&str; 4] = [
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M",
        "%Y-%m-%dT%H:%M",
    ];

    let s = s.trim();
    FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .or_else(|| {
            DateTime::parse_from_rfc3339(s)
                .ok()
                .map(|dt| dt.naive_utc())
        })
        .or_else(|| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .map(|d| d.and_time(NaiveTime::MIN))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_families_and_parents() {
        assert_eq!(DataType::Clob.family(), TypeFamily::Text);
        assert_eq!(DataType::Clob.parent(), Some(DataType::Varchar));
        assert!(DataType::Integer.specializes(DataType::BigInt));
        assert!(!DataType::BigInt.specializes(DataType::Integer));
        assert!(DataType::Double.is_compatible_with(DataType::Decimal));
        assert!(!DataType::Varchar.is_compatible_with(DataType::Integer));
        assert!(DataType::Unknown.is_compatible_with(DataType::Date));
    }

    #[test]
    fn test_integer_cast() {
        assert_eq!(DataType::Integer.cast(&Value::from("42")).unwrap(), Value::Int(42));
        assert_eq!(DataType::Integer.cast(&Value::Float(3.0)).unwrap(), Value::Int(3));
        assert!(DataType::Integer.cast(&Value::from("4.5")).is_err());
        assert_eq!(DataType::Integer.cast(&Value::Null).unwrap(), Value::Null);
    }

    #[test]
    fn test_integer_cast_out_of_range_is_error() {
        for raw in [Value::from("1e300"), Value::Float(1e19), Value::Float(-1e19)] {
            let err = DataType::BigInt.cast(&raw).unwrap_err();
            assert!(err.to_string().contains("integer out of range"), "{err}");
        }
        assert!(DataType::Integer.cast(&Value::Float(f64::INFINITY)).is_err());
        assert_eq!(
            DataType::BigInt.cast(&Value::Float(-9_223_372_036_854_775_808.0)).unwrap(),
            Value::Int(i64::MIN)
        );
    }

    #[test]
    fn test_distinct_huge_integers_never_compare_equal() {
        let (a, b) = (Value::from("1e300"), Value::from("2e300"));
        assert!(DataType::Integer.compare(&a, &b).is_err());
        assert!(DataType::BigInt
            .compare(&Value::Float(1e19), &Value::Float(5e19))
            .is_err());

        // Decimal keeps ints exact instead of rounding them through f64
        assert_eq!(
            DataType::Decimal
                .compare(&Value::Int(9_007_199_254_740_993), &Value::Int(9_007_199_254_740_992))
                .unwrap(),
            Ordering::Greater
        );
        assert_eq!(
            DataType::Double
                .compare(&Value::Int(3), &Value::from("3.0"))
                .unwrap(),
            Ordering::Equal
        );
    }

    #[test]
    fn test_text_compare_is_lexical() {
        assert_eq!(
            DataType::Varchar
                .compare(&Value::Int(10), &Value::Int(2))
                .unwrap(),
            Ordering::Less
        );
        assert_eq!(
            DataType::Integer
                .compare(&Value::from("10"), &Value::Int(2))
                .unwrap(),
            Ordering::Greater
        );
    }

    #[test]
    fn test_null_ordering() {
        let t = DataType::Integer;
        assert_eq!(t.compare(&Value::Null, &Value::Null).unwrap(), Ordering::Equal);
        assert_eq!(t.compare(&Value::Null, &Value::Int(1)).unwrap(), Ordering::Less);
        assert_eq!(t.compare(&Value::Int(1), &Value::Null).unwrap(), Ordering::Greater);
    }

    #[test]
    fn test_timestamp_cast() {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_milli_opt(10, 15, 30, 250)
            .unwrap();
        assert_eq!(
            DataType::Timestamp
                .cast(&Value::from("2024-03-01 10:15:30.250"))
                .unwrap(),
            Value::DateTime(expected)
        );
        assert_eq!(
            DataType::Timestamp
                .cast(&Value::from("2024-03-01T10:15:30.250Z"))
                .unwrap(),
            Value::DateTime(expected)
        );
        let millis = expected.and_utc().timestamp_millis();
        assert_eq!(
            DataType::Timestamp.cast(&Value::Int(millis)).unwrap(),
            Value::DateTime(expected)
        );
    }

    #[test]
    fn test_boolean_and_date_cast() {
        assert_eq!(DataType::Boolean.cast(&Value::from("Yes")).unwrap(), Value::Bool(true));
        assert_eq!(DataType::Boolean.cast(&Value::Int(0)).unwrap(), Value::Bool(false));
        assert!(DataType::Boolean.cast(&Value::from("maybe")).is_err());
        assert_eq!(
            DataType::Date.cast(&Value::from("2024-02-29")).unwrap(),
            Value::Date(NaiveDate::from_ymd_opt(2024, 2, 29).unwrap())
        );
    }

    #[test]
    fn test_render() {
        assert_eq!(DataType::Decimal.render(&Value::Int(2)).unwrap(), "2");
        assert_eq!(DataType::Varchar.render(&Value::Null).unwrap(), "null");
    }
}
