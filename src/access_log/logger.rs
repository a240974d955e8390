//! Request access logging.
//!
//! The logger observes the request body without consuming it: the buffered
//! bytes are put back so the next handler reads exactly what was sent.

use std::borrow::Cow;
use std::sync::Arc;

use axum::body::Body;
use axum::extract::{Request, State};
use axum::http::Method;
use axum::middleware::Next;
use axum::response::Response;
use chrono::{DateTime, Local};

use super::AppendLog;
use crate::types::{AccessLogConfig, Error, Result};

/// Access log line timestamp, second precision.
pub const LINE_TIME_FORMAT: &str = "%Y.%m.%d %H:%M:%S";

/// Writes one line per request to a shared [`AppendLog`].
#[derive(Debug, Clone)]
pub struct AccessLogger {
    log: Arc<AppendLog>,
    capture_methods: Vec<Method>,
    max_body_bytes: usize,
}

impl AccessLogger {
    /// Logger capturing POST, PUT and PATCH bodies.
    pub fn new(log: Arc<AppendLog>) -> Self {
        Self {
            log,
            capture_methods: vec![Method::POST, Method::PUT, Method::PATCH],
            max_body_bytes: AccessLogConfig::default().max_body_bytes,
        }
    }

    /// Build a logger that owns a fresh [`AppendLog`] for `config.path`.
    ///
    /// Build it once per file and clone it; every clone shares the lock.
    pub fn from_config(config: &AccessLogConfig) -> Self {
        let capture_methods = config
            .capture_methods
            .iter()
            .filter_map(|name| match Method::from_bytes(name.to_ascii_uppercase().as_bytes()) {
                Ok(method) => Some(method),
                Err(_) => {
                    tracing::warn!("Ignoring invalid capture method: {}", name);
                    None
                }
            })
            .collect();

        Self {
            log: Arc::new(AppendLog::new(config.path.clone())),
            capture_methods,
            max_body_bytes: config.max_body_bytes,
        }
    }

    pub fn with_capture_methods(mut self, methods: impl IntoIterator<Item = Method>) -> Self {
        self.capture_methods = methods.into_iter().collect();
        self
    }

    pub fn with_max_body_bytes(mut self, max_body_bytes: usize) -> Self {
        self.max_body_bytes = max_body_bytes;
        self
    }

    pub fn log(&self) -> &Arc<AppendLog> {
        &self.log
    }

    /// Append one line for `request` and hand the request back.
    ///
    /// The returned request always carries a replayable body identical to
    /// the original, whatever its size. Bodies longer than `max_body_bytes`
    /// are replaced in the log line by a size marker. A write failure is
    /// returned next to the request; only a failing body stream yields
    /// `Error::BodyRead`, and then the request carries an empty body.
    pub async fn log_request(&self, request: Request) -> (Request, Result<()>) {
        let now = Local::now();
        let (parts, body) = request.into_parts();

        if !self.capture_methods.contains(&parts.method) {
            let line = format_line(now, parts.uri.path(), &parts.method, "");
            let result = self.append(line).await;
            return (Request::from_parts(parts, body), result);
        }

        let bytes = match axum::body::to_bytes(body, usize::MAX).await {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!("Failed to buffer request body for {}: {}", parts.uri.path(), e);
                let request = Request::from_parts(parts, Body::empty());
                return (request, Err(Error::body_read(e.to_string())));
            }
        };

        let logged = if bytes.len() > self.max_body_bytes {
            Cow::Owned(oversized_marker(bytes.len()))
        } else {
            String::from_utf8_lossy(&bytes)
        };
        let line = format_line(now, parts.uri.path(), &parts.method, &logged);
        let result = self.append(line).await;
        (Request::from_parts(parts, Body::from(bytes)), result)
    }

    async fn append(&self, line: String) -> Result<()> {
        let log = Arc::clone(&self.log);
        tokio::task::spawn_blocking(move || log.append(&line))
            .await
            .map_err(|e| Error::LogWrite(std::io::Error::other(e)))?
    }
}

/// `[YYYY.MM.DD HH:MM:SS] <path> <METHOD> <body>\n`
pub fn format_line(time: DateTime<Local>, path: &str, method: &Method, body: &str) -> String {
    format!("[{}] {} {} {}\n", time.format(LINE_TIME_FORMAT), path, method, body)
}

/// Stands in for a body too large to copy into the log.
fn oversized_marker(len: usize) -> String {
    format!("<body too large: {len} bytes>")
}

/// Axum middleware: log the request, then forward it.
///
/// Log failures are reported through `tracing` and never block the request.
pub async fn access_log_middleware(
    State(logger): State<AccessLogger>,
    request: Request,
    next: Next,
) -> Response {
    let (request, result) = logger.log_request(request).await;
    if let Err(e) = result {
        tracing::warn!(error = %e, "Access log write failed");
    }
    next.run(request).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDateTime, TimeZone};
    use std::path::PathBuf;

    fn post(path: &str, body: &'static str) -> Request {
        axum::http::Request::builder()
            .method(Method::POST)
            .uri(path)
            .body(Body::from(body))
            .unwrap()
    }

    async fn read_body(request: Request) -> Vec<u8> {
        axum::body::to_bytes(request.into_body(), usize::MAX)
            .await
            .unwrap()
            .to_vec()
    }

    #[test]
    fn test_format_line() {
        let time = Local.with_ymd_and_hms(2024, 3, 9, 7, 5, 1).unwrap();
        let line = format_line(time, "/users", &Method::POST, r#"{"k":1}"#);
        assert_eq!(line, "[2024.03.09 07:05:01] /users POST {\"k\":1}\n");
    }

    #[tokio::test]
    async fn test_post_body_is_logged_and_replayed() {
        let dir = tempfile::tempdir().unwrap();
        let logger = AccessLogger::new(Arc::new(AppendLog::new(dir.path().join("api.log"))));

        let (request, result) = logger.log_request(post("/items", r#"{"k":1}"#)).await;
        result.unwrap();
        assert_eq!(read_body(request).await, br#"{"k":1}"#);

        let contents = std::fs::read_to_string(logger.log().path()).unwrap();
        assert_eq!(contents.lines().count(), 1);
        assert!(contents.ends_with(" /items POST {\"k\":1}\n"));
        NaiveDateTime::parse_from_str(&contents[1..20], LINE_TIME_FORMAT).unwrap();
    }

    #[tokio::test]
    async fn test_get_body_is_not_captured() {
        let dir = tempfile::tempdir().unwrap();
        let logger = AccessLogger::new(Arc::new(AppendLog::new(dir.path().join("api.log"))));
        let request = axum::http::Request::builder()
            .method(Method::GET)
            .uri("/items?page=2")
            .body(Body::from("ignored"))
            .unwrap();

        let (request, result) = logger.log_request(request).await;
        result.unwrap();
        assert_eq!(read_body(request).await, b"ignored");

        let contents = std::fs::read_to_string(logger.log().path()).unwrap();
        assert!(contents.ends_with(" /items GET \n"));
    }

    #[tokio::test]
    async fn test_write_failure_still_restores_body() {
        let dir = tempfile::tempdir().unwrap();
        let logger = AccessLogger::new(Arc::new(AppendLog::new(
            dir.path().join("missing").join("api.log"),
        )));

        let (request, result) = logger.log_request(post("/items", "payload")).await;
        assert!(matches!(result, Err(Error::LogWrite(_))));
        assert_eq!(read_body(request).await, b"payload");
    }

    #[tokio::test]
    async fn test_oversized_body_is_replayed_in_full() {
        let dir = tempfile::tempdir().unwrap();
        let logger = AccessLogger::new(Arc::new(AppendLog::new(dir.path().join("api.log"))))
            .with_max_body_bytes(4);

        let (request, result) = logger.log_request(post("/items", "too large")).await;
        result.unwrap();
        assert_eq!(read_body(request).await, b"too large");

        let contents = std::fs::read_to_string(logger.log().path()).unwrap();
        assert!(contents.ends_with(" /items POST <body too large: 9 bytes>\n"));
    }

    #[tokio::test]
    async fn test_body_at_limit_is_logged_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let logger = AccessLogger::new(Arc::new(AppendLog::new(dir.path().join("api.log"))))
            .with_max_body_bytes(4);

        let (request, result) = logger.log_request(post("/items", "four")).await;
        result.unwrap();
        assert_eq!(read_body(request).await, b"four");

        let contents = std::fs::read_to_string(logger.log().path()).unwrap();
        assert!(contents.ends_with(" /items POST four\n"));
    }

    #[test]
    fn test_from_config_parses_methods() {
        let config = AccessLogConfig {
            path: PathBuf::from("access.log"),
            capture_methods: vec!["post".to_string(), "DELETE".to_string(), "bad method".to_string()],
            max_body_bytes: 64,
        };

        let logger = AccessLogger::from_config(&config);
        assert_eq!(logger.capture_methods, vec![Method::POST, Method::DELETE]);
        assert_eq!(logger.log().path(), PathBuf::from("access.log"));
    }
}
