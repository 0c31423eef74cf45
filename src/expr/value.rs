//! Values produced by guard expressions.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The closed set of values a guard expression can produce.
///
/// Decimal equality is scale-independent, so `1.0` and `1` compare equal.
/// Values of different kinds are never equal to each other.
///
/// # Example
///
/// ```rust
/// use stateflow::expr::Value;
/// use rust_decimal::Decimal;
///
/// let one: Decimal = "1.0".parse().unwrap();
/// assert_eq!(Value::from(one), Value::from(1));
/// assert_ne!(Value::from("1"), Value::from(1));
/// assert_eq!(Value::Null, Value::from(None::<bool>));
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Null,
    Bool(bool),
    Decimal(Decimal),
    String(String),
}

impl Value {
    /// Name of the value's kind, used in evaluation errors.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "boolean",
            Self::Decimal(_) => "decimal",
            Self::String(_) => "string",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_decimal(&self) -> Option<Decimal> {
        match self {
            Self::Decimal(d) => Some(*d),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Decimal(d) => write!(f, "{d}"),
            Self::String(s) => write!(f, "{s:?}"),
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<Decimal> for Value {
    fn from(value: Decimal) -> Self {
        Self::Decimal(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Self::Decimal(Decimal::from(value))
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Decimal(Decimal::from(value))
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Self::Decimal(Decimal::from(value))
    }
}

impl From<u64> for Value {
    fn from(value: u64) -> Self {
        Self::Decimal(Decimal::from(value))
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl<V: Into<Value>> From<Option<V>> for Value {
    fn from(value: Option<V>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}
