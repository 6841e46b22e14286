//! # Runtime Value Representation
//!
//! This module provides `Value`, the owned runtime representation for SQL
//! values. Rows, index keys, bound arguments, and query results all carry
//! these values.
//!
//! ## Value Variants
//!
//! | Variant | Rust type | Description |
//! |---------|-----------|-------------|
//! | Null | - | SQL NULL |
//! | Bool | bool | boolean |
//! | Int | i64 | 64-bit signed integer (`int` and `bigint` columns) |
//! | Float | f64 | 64-bit floating point |
//! | Text | String | UTF-8 string |
//! | Timestamp | i64 | microseconds since the Unix epoch |
//! | Date | i32 | days since the Unix epoch |
//!
//! ## Comparison Semantics
//!
//! SQL comparison goes through [`Value::compare`], which returns `None`
//! (UNKNOWN) whenever either side is NULL — so NULL is unequal to every
//! value including itself, and only `IS NULL` can observe it. Int and Float
//! cross-compare through f64 promotion.
//!
//! `PartialEq`/`Eq`/`Hash` are a separate, total identity used for index
//! keys: there NULL equals NULL and floats compare by bit pattern.
//!
//! ## Literal Conversion
//!
//! [`Value::from_literal`] converts a textual lexeme into the canonical
//! value for a target type. Timestamps accept RFC-3339, `YYYY-MM-DD` and
//! `YYYY-MM-DD HH:MM:SS`, plus the `now` / `localtimestamp` tokens which
//! resolve to the wall clock at evaluation time.

use crate::parsing::literal::{format_date, format_timestamp, now_micros, parse_date,
    parse_timestamp};
use crate::types::DataType;
use eyre::{bail, Result, WrapErr};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Owned runtime SQL value.
#[derive(Debug, Clone)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Timestamp(i64),
    Date(i32),
}

impl Value {
    /// Returns true if this value is NULL.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Converts a textual lexeme to the canonical value for `target`.
    ///
    /// This is the single entry point for turning SQL literal text into a
    /// typed value; the executor and the insert-time coercion path both go
    /// through it.
    pub fn from_literal(lexeme: &str, target: DataType) -> Result<Value> {
        if lexeme.eq_ignore_ascii_case("null") {
            return Ok(Value::Null);
        }
        match target {
            DataType::Int | DataType::BigInt | DataType::BigSerial => {
                let n: i64 = lexeme
                    .trim()
                    .parse()
                    .wrap_err_with(|| format!("cannot convert '{}' to {}", lexeme, target.name()))?;
                Ok(Value::Int(n))
            }
            DataType::Float => {
                let f: f64 = lexeme
                    .trim()
                    .parse()
                    .wrap_err_with(|| format!("cannot convert '{}' to float", lexeme))?;
                Ok(Value::Float(f))
            }
            DataType::Text => Ok(Value::Text(lexeme.to_string())),
            DataType::Bool => match lexeme.to_ascii_lowercase().as_str() {
                "true" | "t" | "1" => Ok(Value::Bool(true)),
                "false" | "f" | "0" => Ok(Value::Bool(false)),
                _ => bail!("cannot convert '{}' to bool", lexeme),
            },
            DataType::Timestamp => {
                let lower = lexeme.trim().to_ascii_lowercase();
                if lower == "now" || lower == "now()" || lower == "localtimestamp" {
                    return Ok(Value::Timestamp(now_micros()));
                }
                Ok(Value::Timestamp(parse_timestamp(lexeme)?))
            }
            DataType::Date => {
                let lower = lexeme.trim().to_ascii_lowercase();
                if lower == "now" || lower == "now()" || lower == "localtimestamp" {
                    return Ok(Value::Date((now_micros() / 86_400_000_000) as i32));
                }
                Ok(Value::Date(parse_date(lexeme)?))
            }
        }
    }

    /// Coerces this value to the column type it is being stored into.
    ///
    /// NULL passes through unchanged. Text coerces into numeric, boolean and
    /// temporal targets by re-parsing; Int widens to Float; Timestamp and
    /// Date interconvert through whole days.
    pub fn coerce_to(&self, target: DataType) -> Result<Value> {
        match (self, target) {
            (Value::Null, _) => Ok(Value::Null),
            (Value::Int(i), DataType::Int | DataType::BigInt | DataType::BigSerial) => {
                Ok(Value::Int(*i))
            }
            (Value::Int(i), DataType::Float) => Ok(Value::Float(*i as f64)),
            (Value::Int(i), DataType::Bool) => Ok(Value::Bool(*i != 0)),
            (Value::Int(i), DataType::Text) => Ok(Value::Text(i.to_string())),
            (Value::Int(i), DataType::Timestamp) => Ok(Value::Timestamp(*i)),
            (Value::Float(f), DataType::Float) => Ok(Value::Float(*f)),
            (Value::Float(f), DataType::Int | DataType::BigInt | DataType::BigSerial) => {
                Ok(Value::Int(*f as i64))
            }
            (Value::Float(f), DataType::Text) => Ok(Value::Text(f.to_string())),
            (Value::Text(s), DataType::Text) => Ok(Value::Text(s.clone())),
            (Value::Text(s), _) => Value::from_literal(s, target),
            (Value::Bool(b), DataType::Bool) => Ok(Value::Bool(*b)),
            (Value::Bool(b), DataType::Int | DataType::BigInt | DataType::BigSerial) => {
                Ok(Value::Int(*b as i64))
            }
            (Value::Bool(b), DataType::Text) => Ok(Value::Text(b.to_string())),
            (Value::Timestamp(us), DataType::Timestamp) => Ok(Value::Timestamp(*us)),
            (Value::Timestamp(us), DataType::Date) => {
                Ok(Value::Date((us / 86_400_000_000) as i32))
            }
            (Value::Timestamp(us), DataType::Text) => {
                Ok(Value::Text(format_timestamp(*us)))
            }
            (Value::Date(d), DataType::Date) => Ok(Value::Date(*d)),
            (Value::Date(d), DataType::Timestamp) => {
                Ok(Value::Timestamp(*d as i64 * 86_400_000_000))
            }
            (Value::Date(d), DataType::Text) => Ok(Value::Text(format_date(*d))),
            (v, t) => bail!("cannot coerce {:?} to {}", v, t.name()),
        }
    }

    /// SQL comparison. Returns `None` (UNKNOWN) when either side is NULL or
    /// the types are incomparable.
    pub fn compare(&self, other: &Value) -> Option<Ordering> {
        match (self, other) {
            (Value::Null, _) | (_, Value::Null) => None,
            (Value::Int(a), Value::Int(b)) => Some(a.cmp(b)),
            (Value::Int(a), Value::Float(b)) => (*a as f64).partial_cmp(b),
            (Value::Float(a), Value::Int(b)) => a.partial_cmp(&(*b as f64)),
            (Value::Float(a), Value::Float(b)) => a.partial_cmp(b),
            (Value::Text(a), Value::Text(b)) => Some(a.cmp(b)),
            (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
            (Value::Timestamp(a), Value::Timestamp(b)) => Some(a.cmp(b)),
            (Value::Date(a), Value::Date(b)) => Some(a.cmp(b)),
            (Value::Timestamp(a), Value::Date(b)) => {
                Some(a.cmp(&(*b as i64 * 86_400_000_000)))
            }
            (Value::Date(a), Value::Timestamp(b)) => {
                Some((*a as i64 * 86_400_000_000).cmp(b))
            }
            // Text on one side of a typed comparison: try parsing, as the
            // dialect lets string literals stand in for typed values.
            (Value::Text(a), b @ (Value::Int(_) | Value::Float(_))) => {
                a.trim().parse::<f64>().ok()?.partial_cmp(&b.as_f64()?)
            }
            (a @ (Value::Int(_) | Value::Float(_)), Value::Text(b)) => {
                a.as_f64()?.partial_cmp(&b.trim().parse::<f64>().ok()?)
            }
            (Value::Text(a), Value::Timestamp(b)) => Some(parse_timestamp(a).ok()?.cmp(b)),
            (Value::Timestamp(a), Value::Text(b)) => Some(a.cmp(&parse_timestamp(b).ok()?)),
            (Value::Text(a), Value::Date(b)) => Some(parse_date(a).ok()?.cmp(b)),
            (Value::Date(a), Value::Text(b)) => Some(a.cmp(&parse_date(b).ok()?)),
            _ => None,
        }
    }

    fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Returns the integer payload when this value is integral.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            Value::Bool(b) => Some(*b as i64),
            _ => None,
        }
    }

    /// Returns the text payload when this value is textual.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }
}

// Identity equality for index keys and assertions: total, NULL == NULL,
// floats by bit pattern. SQL equality goes through compare().
impl PartialEq for Value {
    fn eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a.to_bits() == b.to_bits(),
            (Value::Text(a), Value::Text(b)) => a == b,
            (Value::Timestamp(a), Value::Timestamp(b)) => a == b,
            (Value::Date(a), Value::Date(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            Value::Null => 0u8.hash(state),
            Value::Bool(b) => {
                1u8.hash(state);
                b.hash(state);
            }
            Value::Int(i) => {
                2u8.hash(state);
                i.hash(state);
            }
            Value::Float(f) => {
                3u8.hash(state);
                f.to_bits().hash(state);
            }
            Value::Text(s) => {
                4u8.hash(state);
                s.hash(state);
            }
            Value::Timestamp(us) => {
                5u8.hash(state);
                us.hash(state);
            }
            Value::Date(d) => {
                6u8.hash(state);
                d.hash(state);
            }
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "NULL"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(x) => write!(f, "{}", x),
            Value::Text(s) => write!(f, "{}", s),
            Value::Timestamp(us) => write!(f, "{}", format_timestamp(*us)),
            Value::Date(d) => write!(f, "{}", format_date(*d)),
        }
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_literal_int() {
        assert_eq!(
            Value::from_literal("42", DataType::BigInt).unwrap(),
            Value::Int(42)
        );
        assert!(Value::from_literal("forty-two", DataType::Int).is_err());
    }

    #[test]
    fn from_literal_timestamp_formats() {
        let iso = Value::from_literal("2024-01-15T13:45:30Z", DataType::Timestamp).unwrap();
        let space = Value::from_literal("2024-01-15 13:45:30", DataType::Timestamp).unwrap();
        assert_eq!(iso, space);

        let date_only = Value::from_literal("2024-01-15", DataType::Timestamp).unwrap();
        assert!(matches!(date_only, Value::Timestamp(_)));
    }

    #[test]
    fn from_literal_now_resolves_to_wall_clock() {
        let v = Value::from_literal("now", DataType::Timestamp).unwrap();
        match v {
            Value::Timestamp(us) => assert!(us > 0),
            other => panic!("expected timestamp, got {:?}", other),
        }
    }

    #[test]
    fn null_compares_unknown_to_everything() {
        assert_eq!(Value::Null.compare(&Value::Null), None);
        assert_eq!(Value::Null.compare(&Value::Int(1)), None);
        assert_eq!(Value::Int(1).compare(&Value::Null), None);
    }

    #[test]
    fn numeric_comparison_coerces_width() {
        assert_eq!(
            Value::Int(2).compare(&Value::Float(2.0)),
            Some(Ordering::Equal)
        );
        assert_eq!(
            Value::Float(1.5).compare(&Value::Int(2)),
            Some(Ordering::Less)
        );
    }

    #[test]
    fn text_compares_against_numbers_by_parsing() {
        assert_eq!(
            Value::Text("10".into()).compare(&Value::Int(10)),
            Some(Ordering::Equal)
        );
    }

    #[test]
    fn index_identity_treats_null_as_equal() {
        assert_eq!(Value::Null, Value::Null);
        assert_eq!(Value::Float(1.5), Value::Float(1.5));
        assert_ne!(Value::Int(1), Value::Float(1.0));
    }

    #[test]
    fn coerce_text_to_timestamp() {
        let v = Value::Text("2023-06-01 00:00:00".into())
            .coerce_to(DataType::Timestamp)
            .unwrap();
        assert!(matches!(v, Value::Timestamp(_)));
    }
}
