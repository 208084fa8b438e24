//! Database-neutral cell values.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

/// A single cell of a row on its way to the sink.
///
/// Nullable timestamps are a dedicated variant rather than a type-erased
/// null so the sink can bind NULL with the correct PostgreSQL type.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Int4(i32),
    Text(String),
    Decimal(Decimal),
    TimestampTz(DateTime<Utc>),
    NullableTimestampTz(Option<DateTime<Utc>>),
}

impl From<i32> for SqlValue {
    fn from(v: i32) -> Self {
        SqlValue::Int4(v)
    }
}

impl From<String> for SqlValue {
    fn from(v: String) -> Self {
        SqlValue::Text(v)
    }
}

impl From<&str> for SqlValue {
    fn from(v: &str) -> Self {
        SqlValue::Text(v.to_string())
    }
}

impl From<Decimal> for SqlValue {
    fn from(v: Decimal) -> Self {
        SqlValue::Decimal(v)
    }
}

impl From<DateTime<Utc>> for SqlValue {
    fn from(v: DateTime<Utc>) -> Self {
        SqlValue::TimestampTz(v)
    }
}

impl From<Option<DateTime<Utc>>> for SqlValue {
    fn from(v: Option<DateTime<Utc>>) -> Self {
        SqlValue::NullableTimestampTz(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_from_conversions() {
        assert_eq!(SqlValue::from(7), SqlValue::Int4(7));
        assert_eq!(SqlValue::from("abc"), SqlValue::Text("abc".to_string()));
        assert_eq!(
            SqlValue::from(Decimal::new(1999, 2)),
            SqlValue::Decimal(Decimal::new(1999, 2))
        );

        let at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(SqlValue::from(at), SqlValue::TimestampTz(at));
        assert_eq!(
            SqlValue::from(None::<DateTime<Utc>>),
            SqlValue::NullableTimestampTz(None)
        );
    }
}
