//! Attribute values and their canonical serialization.
//!
//! Device attributes arrive as arbitrary JSON from two systems of record.
//! Comparing them by canonical encoding makes nested maps and lists compare
//! by content, independent of key order.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt::Write;

/// Maximum nesting depth accepted by [`AttributeValue::canonical_string`].
pub const MAX_CANONICAL_DEPTH: usize = 128;

/// Integral floats in `[-I64_BOUND, I64_BOUND)` encode as integers.
const I64_BOUND: f64 = 9_223_372_036_854_775_808.0; // 2^63

/// A single attribute value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(untagged)]
pub enum AttributeValue {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    List(Vec<AttributeValue>),
    Map(IndexMap<String, AttributeValue>),
}

/// A value that has no canonical encoding.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct CanonicalError(pub String);

impl AttributeValue {
    /// Stable JSON encoding: sorted map keys, no whitespace.
    ///
    /// Non-finite floats and values nested deeper than
    /// [`MAX_CANONICAL_DEPTH`] are rejected.
    pub fn canonical_string(&self) -> Result<String, CanonicalError> {
        let mut out = String::new();
        self.write_canonical(&mut out, 0)?;
        Ok(out)
    }

    /// Structural equality through the canonical encoding.
    pub fn structurally_eq(&self, other: &AttributeValue) -> Result<bool, CanonicalError> {
        Ok(self.canonical_string()? == other.canonical_string()?)
    }

    /// Name of the variant, used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            AttributeValue::Null => "null",
            AttributeValue::Bool(_) => "bool",
            AttributeValue::Int(_) => "int",
            AttributeValue::Float(_) => "float",
            AttributeValue::String(_) => "string",
            AttributeValue::List(_) => "list",
            AttributeValue::Map(_) => "map",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, AttributeValue::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttributeValue::String(s) => Some(s),
            _ => None,
        }
    }

    fn write_canonical(&self, out: &mut String, depth: usize) -> Result<(), CanonicalError> {
        if depth > MAX_CANONICAL_DEPTH {
            return Err(CanonicalError(format!(
                "nesting exceeds {} levels",
                MAX_CANONICAL_DEPTH
            )));
        }

        match self {
            AttributeValue::Null => out.push_str("null"),
            AttributeValue::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
            AttributeValue::Int(i) => {
                let _ = write!(out, "{}", i);
            }
            AttributeValue::Float(f) => write_float(out, *f)?,
            AttributeValue::String(s) => write_string(out, s)?,
            AttributeValue::List(items) => {
                out.push('[');
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        out.push(',');
                    }
                    item.write_canonical(out, depth + 1)?;
                }
                out.push(']');
            }
            AttributeValue::Map(map) => {
                let mut entries: Vec<_> = map.iter().collect();
                entries.sort_by(|a, b| a.0.cmp(b.0));

                out.push('{');
                for (i, (key, value)) in entries.into_iter().enumerate() {
                    if i > 0 {
                        out.push(',');
                    }
                    write_string(out, key)?;
                    out.push(':');
                    value.write_canonical(out, depth + 1)?;
                }
                out.push('}');
            }
        }

        Ok(())
    }
}

fn write_float(out: &mut String, f: f64) -> Result<(), CanonicalError> {
    if !f.is_finite() {
        return Err(CanonicalError(format!("{} has no canonical form", f)));
    }

    // Integral floats share the integer encoding so 1 and 1.0 compare equal
    if f.fract() == 0.0 && (-I64_BOUND..I64_BOUND).contains(&f) {
        let _ = write!(out, "{}", f as i64);
        return Ok(());
    }

    match serde_json::Number::from_f64(f) {
        Some(n) => {
            let _ = write!(out, "{}", n);
            Ok(())
        }
        None => Err(CanonicalError(format!("{} has no canonical form", f))),
    }
}

fn write_string(out: &mut String, s: &str) -> Result<(), CanonicalError> {
    let encoded = serde_json::to_string(s).map_err(|e| CanonicalError(e.to_string()))?;
    out.push_str(&encoded);
    Ok(())
}

impl From<serde_json::Value> for AttributeValue {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => AttributeValue::Null,
            serde_json::Value::Bool(b) => AttributeValue::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => AttributeValue::Int(i),
                None => AttributeValue::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(s) => AttributeValue::String(s),
            serde_json::Value::Array(items) => {
                AttributeValue::List(items.into_iter().map(AttributeValue::from).collect())
            }
            serde_json::Value::Object(map) => AttributeValue::Map(
                map.into_iter()
                    .map(|(k, v)| (k, AttributeValue::from(v)))
                    .collect(),
            ),
        }
    }
}

impl From<&str> for AttributeValue {
    fn from(s: &str) -> Self {
        AttributeValue::String(s.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(s: String) -> Self {
        AttributeValue::String(s)
    }
}

impl From<bool> for AttributeValue {
    fn from(b: bool) -> Self {
        AttributeValue::Bool(b)
    }
}

impl From<i64> for AttributeValue {
    fn from(i: i64) -> Self {
        AttributeValue::Int(i)
    }
}

impl From<i32> for AttributeValue {
    fn from(i: i32) -> Self {
        AttributeValue::Int(i64::from(i))
    }
}

impl From<f64> for AttributeValue {
    fn from(f: f64) -> Self {
        AttributeValue::Float(f)
    }
}

impl<T: Into<AttributeValue>> From<Vec<T>> for AttributeValue {
    fn from(items: Vec<T>) -> Self {
        AttributeValue::List(items.into_iter().map(Into::into).collect())
    }
}
