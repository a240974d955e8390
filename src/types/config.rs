//! Configuration structures.
//!
//! Every section has defaults; the surrounding service decides where the
//! values come from.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::validation::ValidationMode;

/// Top-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Required-field validation policy.
    #[serde(default)]
    pub validation: ValidationConfig,

    /// Request body decoding limits.
    #[serde(default)]
    pub pipeline: PipelineConfig,

    /// Access log file and capture rules.
    #[serde(default)]
    pub access_log: AccessLogConfig,

    /// Error response formatting.
    #[serde(default)]
    pub reporter: ReporterConfig,

    /// Remote log shipping (disabled when absent).
    #[serde(default)]
    pub remote: Option<RemoteSinkConfig>,

    /// Tracing subscriber settings.
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

/// Observability configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    /// Filter directive used when `RUST_LOG` is unset.
    pub log_level: String,

    /// Emit JSON lines instead of compact text.
    pub json_logs: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logs: false,
        }
    }
}

/// Validation configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationConfig {
    /// Which plain-key rule to apply.
    pub mode: ValidationMode,

    /// Count `""` as present (only consulted in null/empty-aware mode).
    pub empty_string_valid: bool,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            mode: ValidationMode::NullAndEmptyAware,
            empty_string_valid: false,
        }
    }
}

/// Request pipeline configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Maximum request body size buffered for decoding.
    pub max_body_bytes: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_body_bytes: 2 * 1024 * 1024,
        }
    }
}

/// Access log configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessLogConfig {
    /// Append-only log file.
    pub path: PathBuf,

    /// Methods whose body is captured into the log line.
    pub capture_methods: Vec<String>,

    /// Longest body copied into a log line; larger bodies are logged as a
    /// size marker but still forwarded whole.
    pub max_body_bytes: usize,
}

impl Default for AccessLogConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("api.log"),
            capture_methods: vec!["POST".to_string(), "PUT".to_string(), "PATCH".to_string()],
            max_body_bytes: 2 * 1024 * 1024,
        }
    }
}

/// Error reporter configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReporterConfig {
    /// HTTP status used for every reported error.
    pub status: u16,

    /// Nest the numeric status as `code` in the response body.
    pub include_code: bool,
}

impl Default for ReporterConfig {
    fn default() -> Self {
        Self {
            status: 403,
            include_code: false,
        }
    }
}

/// Remote log sink configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteSinkConfig {
    /// HTTP endpoint accepting one JSON record per POST.
    pub endpoint: String,

    /// Tag attached to every shipped record.
    pub tag: String,

    /// Per-delivery timeout.
    #[serde(with = "humantime_serde")]
    pub timeout: Duration,
}

impl RemoteSinkConfig {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            tag: "request-guard".to_string(),
            timeout: Duration::from_secs(2),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = Config::default();
        assert_eq!(config.validation.mode, ValidationMode::NullAndEmptyAware);
        assert!(!config.validation.empty_string_valid);
        assert_eq!(config.access_log.path, PathBuf::from("api.log"));
        assert_eq!(config.reporter.status, 403);
        assert!(config.remote.is_none());
        assert_eq!(config.observability.log_level, "info");
        assert!(!config.observability.json_logs);
    }

    #[test]
    fn test_config_partial_deserialize() {
        let config: Config = serde_json::from_str(
            r#"{
                "validation": {"mode": "presence_only", "empty_string_valid": true},
                "remote": {"endpoint": "http://127.0.0.1:9880/app", "tag": "api", "timeout": "500ms"},
                "observability": {"log_level": "request_guard=debug", "json_logs": true}
            }"#,
        )
        .unwrap();

        assert_eq!(config.validation.mode, ValidationMode::PresenceOnly);
        assert!(config.validation.empty_string_valid);
        assert_eq!(config.pipeline.max_body_bytes, 2 * 1024 * 1024);
        let remote = config.remote.unwrap();
        assert_eq!(remote.tag, "api");
        assert_eq!(remote.timeout, Duration::from_millis(500));
        assert_eq!(config.observability.log_level, "request_guard=debug");
        assert!(config.observability.json_logs);
    }
}
