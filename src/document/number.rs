//! Lossless numeric literals and on-demand `f64` coercion.

use std::fmt;

use crate::types::{CoercionError, Result};

use super::Value;

/// A JSON number kept exactly as written in the request body.
///
/// Nothing is converted at decode time, so `123456789012345678` or `1.50`
/// reach the handler unchanged. Conversion happens only through
/// [`NumberLiteral::to_f64`] and friends.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NumberLiteral(String);

impl NumberLiteral {
    /// Wrap literal text. The text is not checked; malformed literals
    /// surface as [`CoercionError::Unrepresentable`] on conversion.
    pub fn new(literal: impl Into<String>) -> Self {
        Self(literal.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Nearest `f64` to the literal.
    ///
    /// Integers above 2^53 lose precision here (and only here). Literals
    /// that do not parse, or overflow to infinity, are rejected.
    pub fn to_f64(&self) -> std::result::Result<f64, CoercionError> {
        match self.0.parse::<f64>() {
            Ok(value) if value.is_finite() => Ok(value),
            _ => Err(CoercionError::Unrepresentable {
                literal: self.0.clone(),
            }),
        }
    }

    /// Exact integer value, if the literal is an integer within `i64`.
    pub fn as_i64(&self) -> Option<i64> {
        self.0.parse().ok()
    }

    /// Exact integer value, if the literal is an integer within `u64`.
    pub fn as_u64(&self) -> Option<u64> {
        self.0.parse().ok()
    }
}

impl fmt::Display for NumberLiteral {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Coerce a decoded value to `f64`.
///
/// Fails with [`CoercionError::NotNumeric`] for anything but a number and
/// with [`CoercionError::Unrepresentable`] when the literal has no finite
/// `f64` form.
pub fn coerce_f64(value: &Value) -> Result<f64> {
    match value {
        Value::Number(literal) => Ok(literal.to_f64()?),
        other => Err(CoercionError::NotNumeric {
            found: other.kind_name(),
        }
        .into()),
    }
}
