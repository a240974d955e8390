//! # Request Guard - validation and error reporting for HTTP handlers
//!
//! Helpers sitting between an HTTP framework and business logic:
//! - JSON body decoding with lossless numeric literals
//! - Required-field validation with `a|b` alternative groups
//! - On-demand numeric coercion
//! - JSON error responses recorded to pluggable log sinks
//! - Access logging that leaves the request body readable
//!
//! ## Data flow
//!
//! ```text
//!   request body ─→ decode ─→ validate ─→ handler
//!                     │          │
//!                     └──────────┴─→ ErrorReporter ─→ 403 + JSON body
//!                                          └─→ sinks (text, json, tracing, file, remote)
//!
//!   request ─→ AccessLogger ─→ AppendLog (one line) ─→ request replayed to handler
//! ```

// Enforce strict safety at compile time
#![deny(unsafe_code)]
#![warn(missing_debug_implementations)]
#![warn(rust_2018_idioms)]

pub mod access_log;
pub mod document;
pub mod pipeline;
pub mod report;
pub mod types;
pub mod validation;

// Internal utilities
pub mod observability;

pub use document::{Document, NumberLiteral, Value};
pub use types::{Config, Error, Result};
pub use validation::{check_required_params, FieldSpec, ValidationMode, Validator};
