//! Raw request values, declared field kinds, and the value coercer.

use chrono::{DateTime, FixedOffset};
use serde::Deserialize;
use std::fmt;
use thiserror::Error as ThisError;

/// The single textual date-time format accepted for date-kind values
/// (`2014-01-01T00:00:00.000+0100`).
pub const DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3f%z";

///
/// RawValue
///
/// Loosely-typed request leaf prior to coercion. Query parameters always
/// arrive as `Text`; JSON bodies contribute native booleans, numbers, and
/// lists. `Date` exists for programmatic construction only and is never
/// produced by deserialization (strings always match `Text` first).
///
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum RawValue {
    Bool(bool),
    Int(i64),
    Double(f64),
    Text(String),
    Date(DateTime<FixedOffset>),
    List(Vec<RawValue>),
}

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<bool> for RawValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for RawValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<Vec<&str>> for RawValue {
    fn from(values: Vec<&str>) -> Self {
        Self::List(values.into_iter().map(Into::into).collect())
    }
}

impl fmt::Display for RawValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(n) => write!(f, "{n}"),
            Self::Double(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
            Self::Date(dt) => write!(f, "{}", dt.format(DATE_FORMAT)),
            Self::List(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{item}")?;
                }
                Ok(())
            }
        }
    }
}

///
/// VarValue
///
/// Typed primitive for variable filter values. Passed through to the
/// domain query object untouched; the engine never interprets it.
///
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum VarValue {
    Bool(bool),
    Int(i64),
    Double(f64),
    Text(String),
    Null,
}

impl fmt::Display for VarValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(n) => write!(f, "{n}"),
            Self::Double(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
            Self::Null => f.write_str("null"),
        }
    }
}

///
/// FieldKind
///
/// Declared coercion kind for a metadata filter key.
///
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FieldKind {
    Text,
    /// Boolean presence flag: the mapped method is invoked with no
    /// argument, and only when the value is literally `true`.
    Flag,
    Int,
    Long,
    Date,
    TextList,
}

///
/// FilterValue
///
/// Coerced argument handed to a domain query method.
///
#[derive(Clone, Debug, PartialEq)]
pub enum FilterValue {
    Text(String),
    Flag,
    Int(i32),
    Long(i64),
    Date(DateTime<FixedOffset>),
    TextList(Vec<String>),
}

///
/// CoercionError
///
#[derive(Debug, ThisError)]
#[error("Cannot set query parameter '{key}' to value '{value}'")]
pub struct CoercionError {
    pub key: String,
    pub value: String,
}

impl CoercionError {
    fn for_raw(key: &str, raw: &RawValue) -> Self {
        Self {
            key: key.to_string(),
            value: raw.to_string(),
        }
    }
}

/// Coerce a raw request value to `key`'s declared kind.
///
/// `Ok(None)` means the value legitimately produces no builder call (a
/// flag that is not literally `true`); it is never an error.
pub fn coerce(
    key: &str,
    raw: &RawValue,
    kind: FieldKind,
) -> Result<Option<FilterValue>, CoercionError> {
    match kind {
        FieldKind::Text => match raw {
            RawValue::Text(s) => Ok(Some(FilterValue::Text(s.clone()))),
            _ => Err(CoercionError::for_raw(key, raw)),
        },
        FieldKind::Flag => Ok(match raw {
            RawValue::Bool(true) => Some(FilterValue::Flag),
            RawValue::Text(s) if s == "true" => Some(FilterValue::Flag),
            _ => None,
        }),
        FieldKind::Int => match raw {
            RawValue::Int(n) => i32::try_from(*n)
                .map(|n| Some(FilterValue::Int(n)))
                .map_err(|_| CoercionError::for_raw(key, raw)),
            RawValue::Text(s) => s
                .parse::<i32>()
                .map(|n| Some(FilterValue::Int(n)))
                .map_err(|_| CoercionError::for_raw(key, raw)),
            _ => Err(CoercionError::for_raw(key, raw)),
        },
        FieldKind::Long => match raw {
            RawValue::Int(n) => Ok(Some(FilterValue::Long(*n))),
            RawValue::Text(s) => s
                .parse::<i64>()
                .map(|n| Some(FilterValue::Long(n)))
                .map_err(|_| CoercionError::for_raw(key, raw)),
            _ => Err(CoercionError::for_raw(key, raw)),
        },
        FieldKind::Date => match raw {
            RawValue::Date(dt) => Ok(Some(FilterValue::Date(*dt))),
            RawValue::Text(s) => DateTime::parse_from_str(s, DATE_FORMAT)
                .map(|dt| Some(FilterValue::Date(dt)))
                .map_err(|_| CoercionError::for_raw(key, raw)),
            _ => Err(CoercionError::for_raw(key, raw)),
        },
        FieldKind::TextList => match raw {
            // A single string is the comma-separated query-parameter form.
            RawValue::Text(s) => Ok(Some(FilterValue::TextList(
                s.split(',').map(str::to_string).collect(),
            ))),
            RawValue::List(items) => items
                .iter()
                .map(|item| match item {
                    RawValue::Text(s) => Ok(s.clone()),
                    _ => Err(CoercionError::for_raw(key, raw)),
                })
                .collect::<Result<Vec<_>, _>>()
                .map(|values| Some(FilterValue::TextList(values))),
            _ => Err(CoercionError::for_raw(key, raw)),
        },
    }
}
