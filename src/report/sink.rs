//! Log sinks used by the error reporter.
//!
//! Every sink exposes one operation, [`LogSink::record`]. The reporter
//! formats responses the same way whatever sinks are attached.

use std::fmt;
use std::io::Write;
use std::sync::{Arc, Mutex, PoisonError};

use chrono::{DateTime, Local, Utc};

use crate::access_log::{AppendLog, LINE_TIME_FORMAT};
use crate::types::{Error, Result};

/// One reported error.
#[derive(Debug, Clone)]
pub struct LogEntry {
    pub time: DateTime<Local>,
    /// Caller-supplied context, e.g. "create user".
    pub context: String,
    /// Display form of the error, unsanitized.
    pub error: String,
}

impl LogEntry {
    pub fn new(context: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            time: Local::now(),
            context: context.into(),
            error: error.into(),
        }
    }

    /// `<context>: <error>`
    pub fn message(&self) -> String {
        format!("{}: {}", self.context, self.error)
    }
}

/// Destination for reported errors.
#[cfg_attr(test, mockall::automock)]
pub trait LogSink: Send + Sync {
    /// Short name used when a delivery failure is surfaced.
    fn name(&self) -> &'static str;

    /// Record one entry. Must not block on the network.
    fn record(&self, entry: &LogEntry) -> Result<()>;
}

/// Plain text lines: `YYYY/MM/DD HH:MM:SS <context>: <error>`.
pub struct TextSink {
    writer: Mutex<Box<dyn Write + Send>>,
}

impl TextSink {
    pub fn new(writer: impl Write + Send + 'static) -> Self {
        Self {
            writer: Mutex::new(Box::new(writer)),
        }
    }

    pub fn stderr() -> Self {
        Self::new(std::io::stderr())
    }
}

impl fmt::Debug for TextSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextSink").finish_non_exhaustive()
    }
}

impl LogSink for TextSink {
    fn name(&self) -> &'static str {
        "text"
    }

    fn record(&self, entry: &LogEntry) -> Result<()> {
        let line = format!("{} {}\n", entry.time.format("%Y/%m/%d %H:%M:%S"), entry.message());
        let mut writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        writer.write_all(line.as_bytes()).map_err(Error::LogWrite)
    }
}

/// One JSON object per line: `{"message": ..., "time": "YYYY.MM.DDTHH:MM:SSZ"}`.
pub struct JsonLineSink {
    writer: Mutex<Box<dyn Write + Send>>,
}

impl JsonLineSink {
    pub fn new(writer: impl Write + Send + 'static) -> Self {
        Self {
            writer: Mutex::new(Box::new(writer)),
        }
    }
}

impl fmt::Debug for JsonLineSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JsonLineSink").finish_non_exhaustive()
    }
}

impl LogSink for JsonLineSink {
    fn name(&self) -> &'static str {
        "json"
    }

    fn record(&self, entry: &LogEntry) -> Result<()> {
        let line = serde_json::json!({
            "message": entry.message(),
            "time": entry
                .time
                .with_timezone(&Utc)
                .format("%Y.%m.%dT%H:%M:%SZ")
                .to_string(),
        });
        let mut writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        writeln!(writer, "{line}").map_err(Error::LogWrite)
    }
}

/// Structured event through `tracing` at ERROR level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl LogSink for TracingSink {
    fn name(&self) -> &'static str {
        "tracing"
    }

    fn record(&self, entry: &LogEntry) -> Result<()> {
        tracing::error!(context = %entry.context, error = %entry.error, "{}", entry.message());
        Ok(())
    }
}

/// Lines appended to the shared log file: `[YYYY.MM.DD HH:MM:SS] <context>: <error>`.
///
/// Inside a tokio runtime the append runs on the blocking pool and `record`
/// returns before the line is on disk; write failures are then only logged.
/// Outside a runtime the append happens inline and its error is returned.
#[derive(Debug, Clone)]
pub struct FileSink {
    log: Arc<AppendLog>,
}

impl FileSink {
    pub fn new(log: Arc<AppendLog>) -> Self {
        Self { log }
    }
}

impl LogSink for FileSink {
    fn name(&self) -> &'static str {
        "file"
    }

    fn record(&self, entry: &LogEntry) -> Result<()> {
        let line = format!(
            "[{}] {}\n",
            entry.time.format(LINE_TIME_FORMAT),
            entry.message()
        );

        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            return self.log.append(&line);
        };

        let log = Arc::clone(&self.log);
        handle.spawn_blocking(move || {
            if let Err(e) = log.append(&line) {
                tracing::warn!(path = %log.path().display(), error = %e, "Error log append failed");
            }
        });
        Ok(())
    }
}
