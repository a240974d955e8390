//! Access logging to an append-only file.

mod append;
mod logger;

pub use append::AppendLog;
pub use logger::{access_log_middleware, format_line, AccessLogger, LINE_TIME_FORMAT};
