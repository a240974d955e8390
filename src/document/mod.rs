//! Decoded request documents.
//!
//! A request body is decoded into a [`Document`]: a map from field name to
//! [`Value`]. Values form a closed sum type so handlers pattern-match instead
//! of probing dynamic JSON. Absent keys and explicit `null` stay distinct.

mod decode;
mod number;

use std::collections::BTreeMap;

pub use decode::{decode_document, decode_document_list, decode_document_slice};
pub use number::{coerce_f64, NumberLiteral};

use crate::types::Result;

/// Decoded JSON object.
pub type Document = BTreeMap<String, Value>;

/// One decoded JSON value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Number(NumberLiteral),
    Text(String),
    Object(Document),
    Array(Vec<Value>),
}

impl Value {
    /// Short JSON type name, used in error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::Text(_) => "string",
            Value::Object(_) => "object",
            Value::Array(_) => "array",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<&NumberLiteral> {
        match self {
            Value::Number(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&Document> {
        match self {
            Value::Object(doc) => Some(doc),
            _ => None,
        }
    }

    /// See [`coerce_f64`].
    pub fn to_f64(&self) -> Result<f64> {
        coerce_f64(self)
    }
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            // With arbitrary_precision the Display form is the source literal.
            serde_json::Value::Number(n) => Value::Number(NumberLiteral::new(n.to_string())),
            serde_json::Value::String(s) => Value::Text(s),
            serde_json::Value::Array(items) => {
                Value::Array(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(map) => Value::Object(into_document(map)),
        }
    }
}

pub(crate) fn into_document(map: serde_json::Map<String, serde_json::Value>) -> Document {
    map.into_iter().map(|(k, v)| (k, Value::from(v))).collect()
}
