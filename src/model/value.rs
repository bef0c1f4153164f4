//! Typed field values
//!
//! Resources carry arbitrary recorded fields (dimensions, dating, materials)
//! as a closed set of value variants. Arrays are homogeneous by convention
//! but not enforced here; nested objects carry their own field maps.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A single recorded field value.
///
/// Serialized untagged, so documents read and write as plain JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// Boolean value
    Bool(bool),
    /// 64-bit signed integer
    Int(i64),
    /// 64-bit floating point
    Float(f64),
    /// UTF-8 string
    String(String),
    /// List of values
    List(Vec<FieldValue>),
    /// Nested object with its own field map
    Object(BTreeMap<String, FieldValue>),
}

impl FieldValue {
    /// Returns the variant name for error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            FieldValue::Bool(_) => "bool",
            FieldValue::Int(_) => "int",
            FieldValue::Float(_) => "float",
            FieldValue::String(_) => "string",
            FieldValue::List(_) => "list",
            FieldValue::Object(_) => "object",
        }
    }

    /// Returns the string content if this is a string value
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns true for empty strings, empty lists and empty objects.
    ///
    /// Empty values count as absent for presence indexing.
    pub fn is_empty(&self) -> bool {
        match self {
            FieldValue::String(s) => s.is_empty(),
            FieldValue::List(l) => l.is_empty(),
            FieldValue::Object(o) => o.is_empty(),
            _ => false,
        }
    }
}

impl From<&str> for FieldValue {
    fn from(v: &str) -> Self {
        FieldValue::String(v.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(v: String) -> Self {
        FieldValue::String(v)
    }
}

impl From<i64> for FieldValue {
    fn from(v: i64) -> Self {
        FieldValue::Int(v)
    }
}

impl From<f64> for FieldValue {
    fn from(v: f64) -> Self {
        FieldValue::Float(v)
    }
}

impl From<bool> for FieldValue {
    fn from(v: bool) -> Self {
        FieldValue::Bool(v)
    }
}
