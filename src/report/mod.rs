//! Error reporting.
//!
//! [`ErrorReporter`] turns an error plus a context message into a JSON
//! client-error response and records the error to pluggable [`LogSink`]s:
//! plain text, JSON lines, `tracing`, the shared log file, or a remote
//! collector. The response layout is the same whichever sinks are attached.

mod remote;
mod reporter;
mod sink;

pub use remote::{DeliveryFailureHook, RemoteSink};
pub use reporter::{strip_quotes, upstream_error, BodyStyle, ErrorReporter, SinkFailureHook};
pub use sink::{FileSink, JsonLineSink, LogEntry, LogSink, TextSink, TracingSink};
