//! Runtime values flowing through pipeline execution.

use crate::error::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A runtime value: number, string, boolean, ordered tuple, or
/// string-keyed record.
///
/// `Null` does not occur in execution contexts; it exists so that `null`
/// leaves of a `json(...)` implementation schema survive evaluation as
/// data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// JSON null preserved from a structured-data template
    Null,
    /// Boolean
    Bool(bool),
    /// Double-precision number
    Number(f64),
    /// String
    Str(String),
    /// Ordered tuple
    Tuple(Vec<Value>),
    /// String-keyed record
    Record(BTreeMap<String, Value>),
}

impl Value {
    /// Short kind name used in error messages and `isinstance` checks.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Number(_) => "number",
            Value::Str(_) => "string",
            Value::Tuple(_) => "tuple",
            Value::Record(_) => "record",
        }
    }

    /// Numeric view of the value, if it is a number.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Sequence view of the value, if it is a tuple.
    pub fn as_sequence(&self) -> Option<&[Value]> {
        match self {
            Value::Tuple(items) => Some(items),
            _ => None,
        }
    }

    /// Convert a JSON value into a runtime value.
    ///
    /// Fails on numbers that cannot be represented as `f64`.
    pub fn from_json(json: &serde_json::Value) -> CoreResult<Value> {
        Ok(match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(*b),
            serde_json::Value::Number(n) => {
                let n = n.as_f64().ok_or_else(|| CoreError::UnsupportedValue {
                    message: format!("number {n} is not representable as f64"),
                })?;
                Value::Number(n)
            }
            serde_json::Value::String(s) => Value::Str(s.clone()),
            serde_json::Value::Array(items) => Value::Tuple(
                items
                    .iter()
                    .map(Value::from_json)
                    .collect::<CoreResult<Vec<_>>>()?,
            ),
            serde_json::Value::Object(map) => Value::Record(
                map.iter()
                    .map(|(k, v)| Ok((k.clone(), Value::from_json(v)?)))
                    .collect::<CoreResult<BTreeMap<_, _>>>()?,
            ),
        })
    }

    /// Convert the runtime value into a JSON value.
    ///
    /// Fails on non-finite numbers, which JSON cannot carry.
    pub fn to_json(&self) -> CoreResult<serde_json::Value> {
        Ok(match self {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Number(n) => {
                // Integral values serialize as JSON integers so template
                // output reads naturally.
                if n.fract() == 0.0 && n.is_finite() && n.abs() < 9e15 {
                    serde_json::Value::Number(serde_json::Number::from(*n as i64))
                } else {
                    serde_json::Number::from_f64(*n)
                        .map(serde_json::Value::Number)
                        .ok_or_else(|| CoreError::UnsupportedValue {
                            message: format!("number {n} is not representable in JSON"),
                        })?
                }
            }
            Value::Str(s) => serde_json::Value::String(s.clone()),
            Value::Tuple(items) => serde_json::Value::Array(
                items
                    .iter()
                    .map(Value::to_json)
                    .collect::<CoreResult<Vec<_>>>()?,
            ),
            Value::Record(map) => serde_json::Value::Object(
                map.iter()
                    .map(|(k, v)| Ok((k.clone(), v.to_json()?)))
                    .collect::<CoreResult<serde_json::Map<_, _>>>()?,
            ),
        })
    }
}

/// Format a float the way catalog text and value display expect: integral
/// values print without a decimal point.
pub fn fmt_f64(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{n}")
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Number(n) => write!(f, "{}", fmt_f64(*n)),
            Value::Str(s) => write!(f, "{s}"),
            Value::Tuple(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
            Value::Record(map) => {
                write!(f, "{{")?;
                for (i, (k, v)) in map.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{k}: {v}")?;
                }
                write!(f, "}}")
            }
        }
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

#[cfg(test)]
#[path = "value_test.rs"]
mod tests;
