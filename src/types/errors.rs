//! Application error types.
//!
//! All errors use `thiserror` for automatic Error trait derivation. Decode,
//! validation and coercion errors are meant to reach the caller; transport
//! errors from remote log sinks never leave the reporter.

use thiserror::Error;

/// Application result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error enum for the request helpers.
#[derive(Error, Debug)]
pub enum Error {
    /// Body is not well-formed JSON of the expected shape.
    #[error("decode error: {0}")]
    Decode(String),

    /// One or more required fields are missing. The message lists every
    /// failing spec verbatim, in input order.
    #[error("Missing [{}] param", .missing.join(" "))]
    Validation { missing: Vec<String> },

    /// A decoded value could not be turned into an `f64`.
    #[error(transparent)]
    Coercion(#[from] CoercionError),

    /// Request body could not be buffered.
    #[error("body read error: {0}")]
    BodyRead(String),

    /// Appending to the log file failed.
    #[error("log write error: {0}")]
    LogWrite(#[source] std::io::Error),

    /// Remote log sink failed. Never escalated past the reporter.
    #[error("log transport error: {0}")]
    TransportLog(String),

    /// Error body returned by an upstream HTTP service, verbatim.
    #[error("{0}")]
    Upstream(String),
}

/// Why a value could not be coerced to `f64`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoercionError {
    #[error("cannot convert {found} to a number")]
    NotNumeric { found: &'static str },

    #[error("numeric literal {literal} is not representable as f64")]
    Unrepresentable { literal: String },
}

// Convenience constructors
impl Error {
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    pub fn validation(missing: Vec<String>) -> Self {
        Self::Validation { missing }
    }

    pub fn body_read(msg: impl Into<String>) -> Self {
        Self::BodyRead(msg.into())
    }

    pub fn transport_log(msg: impl Into<String>) -> Self {
        Self::TransportLog(msg.into())
    }

    pub fn upstream(msg: impl Into<String>) -> Self {
        Self::Upstream(msg.into())
    }
}
