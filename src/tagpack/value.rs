//! Field values of a parsed TagPack
//!
//! YAML distinguishes a plain `2019-07-03` (a timestamp) from a quoted
//! `"2019-07-03"` (a string). `FieldValue` keeps that distinction so that the
//! validator can require a real date for `datetime` fields.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use indexmap::IndexMap;
use serde_json::{Number, Value};

/// Ordered mapping of field name to value, in document order.
pub type FieldMap = IndexMap<String, FieldValue>;

/// A value as it appears in a TagPack document.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// `~`, `null` or an empty plain scalar
    Null,
    /// Boolean
    Bool(bool),
    /// 64-bit signed integer
    Int(i64),
    /// 64-bit floating point
    Float(f64),
    /// Any string, including quoted date-shaped strings
    Text(String),
    /// Calendar date without time (`1970-01-02`)
    Date(NaiveDate),
    /// Point in time (`2019-07-03T12:00:00Z`), normalized to UTC
    DateTime(DateTime<Utc>),
    /// Sequence of values
    List(Vec<FieldValue>),
    /// Nested mapping
    Map(FieldMap),
}

impl FieldValue {
    /// Returns the type name for error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            FieldValue::Null => "null",
            FieldValue::Bool(_) => "bool",
            FieldValue::Int(_) => "int",
            FieldValue::Float(_) => "float",
            FieldValue::Text(_) => "text",
            FieldValue::Date(_) => "date",
            FieldValue::DateTime(_) => "datetime",
            FieldValue::List(_) => "list",
            FieldValue::Map(_) => "mapping",
        }
    }

    /// Returns the string content of a text value
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[FieldValue]> {
        match self {
            FieldValue::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&FieldMap> {
        match self {
            FieldValue::Map(map) => Some(map),
            _ => None,
        }
    }

    /// True for date and date/time values
    pub fn is_temporal(&self) -> bool {
        matches!(self, FieldValue::Date(_) | FieldValue::DateTime(_))
    }

    /// Seconds since the Unix epoch for temporal values.
    ///
    /// Dates count from their UTC midnight.
    pub fn epoch_seconds(&self) -> Option<i64> {
        match self {
            FieldValue::Date(date) => Some(date.and_hms_opt(0, 0, 0)?.and_utc().timestamp()),
            FieldValue::DateTime(ts) => Some(ts.timestamp()),
            _ => None,
        }
    }

    /// Converts to a JSON value for storage records.
    ///
    /// Temporal values become integer epoch seconds at every nesting level.
    pub fn to_json(&self) -> Value {
        match self {
            FieldValue::Null => Value::Null,
            FieldValue::Bool(b) => Value::Bool(*b),
            FieldValue::Int(i) => Value::from(*i),
            FieldValue::Float(f) => Number::from_f64(*f).map_or(Value::Null, Value::Number),
            FieldValue::Text(s) => Value::String(s.clone()),
            FieldValue::Date(_) | FieldValue::DateTime(_) => {
                self.epoch_seconds().map_or(Value::Null, Value::from)
            }
            FieldValue::List(items) => Value::Array(items.iter().map(FieldValue::to_json).collect()),
            FieldValue::Map(map) => Value::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect(),
            ),
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Null => write!(f, "null"),
            FieldValue::Bool(b) => write!(f, "{}", b),
            FieldValue::Int(i) => write!(f, "{}", i),
            FieldValue::Float(x) => write!(f, "{}", x),
            FieldValue::Text(s) => write!(f, "{}", s),
            FieldValue::Date(d) => write!(f, "{}", d),
            FieldValue::DateTime(ts) => write!(f, "{}", ts.to_rfc3339()),
            FieldValue::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
            FieldValue::Map(map) => {
                write!(f, "{{")?;
                for (i, (k, v)) in map.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {}", k, v)?;
                }
                write!(f, "}}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn test_date_epoch_is_utc_midnight() {
        let v = FieldValue::Date(NaiveDate::from_ymd_opt(1970, 1, 2).unwrap());
        assert_eq!(v.epoch_seconds(), Some(86400));
        assert_eq!(v.to_json(), json!(86400));
    }

    #[test]
    fn test_datetime_epoch() {
        let ts = Utc.with_ymd_and_hms(2019, 7, 3, 0, 0, 0).unwrap();
        assert_eq!(FieldValue::DateTime(ts).epoch_seconds(), Some(1562112000));
    }

    #[test]
    fn test_text_has_no_epoch() {
        assert_eq!(FieldValue::Text("1970-01-02".into()).epoch_seconds(), None);
        assert!(!FieldValue::Text("1970-01-02".into()).is_temporal());
    }

    #[test]
    fn test_nested_dates_converted_in_json() {
        let mut inner = FieldMap::new();
        inner.insert(
            "seen".into(),
            FieldValue::Date(NaiveDate::from_ymd_opt(1970, 1, 1).unwrap()),
        );
        let v = FieldValue::List(vec![FieldValue::Map(inner), FieldValue::Int(3)]);
        assert_eq!(v.to_json(), json!([{ "seen": 0 }, 3]));
    }

    #[test]
    fn test_display() {
        let v = FieldValue::List(vec![FieldValue::Text("a".into()), FieldValue::Bool(true)]);
        assert_eq!(v.to_string(), "[a, true]");
    }
}
