//! Error responses for HTTP handlers.

use std::fmt;
use std::io::Read;
use std::sync::Arc;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use super::sink::{LogEntry, LogSink};
use crate::types::{Error, ReporterConfig};

/// Called with the sink name and error whenever a sink fails to record.
pub type SinkFailureHook = Arc<dyn Fn(&'static str, &Error) + Send + Sync>;

/// Response body layout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BodyStyle {
    /// `{"message": "..."}`
    #[default]
    Plain,
    /// `{"code": 403, "message": "..."}`
    WithCode,
}

/// Formats errors into JSON client-error responses and records them to
/// every attached sink.
#[derive(Clone)]
pub struct ErrorReporter {
    status: StatusCode,
    style: BodyStyle,
    sinks: Vec<Arc<dyn LogSink>>,
    on_sink_failure: Option<SinkFailureHook>,
}

impl Default for ErrorReporter {
    fn default() -> Self {
        Self {
            status: StatusCode::FORBIDDEN,
            style: BodyStyle::Plain,
            sinks: Vec::new(),
            on_sink_failure: None,
        }
    }
}

impl fmt::Debug for ErrorReporter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sinks: Vec<&str> = self.sinks.iter().map(|s| s.name()).collect();
        f.debug_struct("ErrorReporter")
            .field("status", &self.status)
            .field("style", &self.style)
            .field("sinks", &sinks)
            .finish_non_exhaustive()
    }
}

impl ErrorReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &ReporterConfig) -> Self {
        let status = StatusCode::from_u16(config.status).unwrap_or_else(|_| {
            tracing::warn!("Invalid reporter status {}, using 403", config.status);
            StatusCode::FORBIDDEN
        });
        let style = if config.include_code {
            BodyStyle::WithCode
        } else {
            BodyStyle::Plain
        };
        Self {
            status,
            style,
            ..Self::default()
        }
    }

    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }

    pub fn with_body_style(mut self, style: BodyStyle) -> Self {
        self.style = style;
        self
    }

    pub fn with_sink(mut self, sink: Arc<dyn LogSink>) -> Self {
        self.sinks.push(sink);
        self
    }

    pub fn with_failure_hook(mut self, hook: SinkFailureHook) -> Self {
        self.on_sink_failure = Some(hook);
        self
    }

    /// Record `err` to every sink and build the response.
    ///
    /// Sinks receive the raw error text; the response body gets it with
    /// surrounding quotes stripped. Sink failures never reach the caller.
    pub fn report(&self, err: impl fmt::Display, context: &str) -> Response {
        let error_text = err.to_string();
        let entry = LogEntry::new(context, error_text.as_str());

        for sink in &self.sinks {
            if let Err(e) = sink.record(&entry) {
                tracing::warn!(sink = sink.name(), error = %e, "Failed to record error entry");
                if let Some(hook) = &self.on_sink_failure {
                    hook(sink.name(), &e);
                }
            }
        }

        self.respond(format!("{}: {}", context, strip_quotes(&error_text)))
    }

    /// Response body for `message` in the configured style.
    pub fn body(&self, message: &str) -> serde_json::Value {
        match self.style {
            BodyStyle::Plain => json!({ "message": message }),
            BodyStyle::WithCode => json!({
                "code": self.status.as_u16(),
                "message": message,
            }),
        }
    }

    fn respond(&self, message: String) -> Response {
        (self.status, Json(self.body(&message))).into_response()
    }
}

/// Drop one leading and one trailing `"` when the text has both.
///
/// A quote on one side only is kept: `"not found` stays as is rather than
/// losing its leading quote, and a lone `"` is not reduced to "".
pub fn strip_quotes(text: &str) -> &str {
    text.strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
        .unwrap_or(text)
}

/// Turn an upstream HTTP error body into an [`Error::Upstream`].
///
/// A body that cannot be read yields whatever was read before the failure.
pub fn upstream_error<R: Read>(mut body: R) -> Error {
    let mut bytes = Vec::new();
    if let Err(e) = body.read_to_end(&mut bytes) {
        tracing::debug!("Upstream error body read failed: {}", e);
    }
    Error::upstream(String::from_utf8_lossy(&bytes).into_owned())
}

/// Lets handlers return `Result<_, Error>` directly: the default reporter
/// layout with no sinks and no context prefix.
impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let text = self.to_string();
        tracing::debug!(error = %text, "Handler error converted to response");
        ErrorReporter::default().respond(strip_quotes(&text).to_string())
    }
}
