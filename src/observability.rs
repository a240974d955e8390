//! Tracing subscriber setup.

use std::sync::OnceLock;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::types::ObservabilityConfig;

static TRACING_INIT: OnceLock<()> = OnceLock::new();

/// Environment variable selecting the log format (`json` or text).
pub const LOG_FORMAT_ENV: &str = "REQUEST_GUARD_LOG_FORMAT";

/// Initialize the tracing subscriber once for the process.
///
/// `RUST_LOG` overrides `config.log_level` and `REQUEST_GUARD_LOG_FORMAT`
/// overrides `config.json_logs`. Later calls are no-ops, so an embedding
/// service that installed its own subscriber first keeps it.
pub fn init_tracing(config: &ObservabilityConfig) {
    TRACING_INIT.get_or_init(|| {
        let env_filter = EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(&config.log_level))
            .unwrap_or_else(|_| EnvFilter::new("info"));

        let result = if use_json(config, std::env::var(LOG_FORMAT_ENV).ok().as_deref()) {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().json())
                .try_init()
        } else {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().compact())
                .try_init()
        };

        if let Err(err) = result {
            eprintln!("tracing init skipped: {err}");
        }
    });
}

fn use_json(config: &ObservabilityConfig, env_format: Option<&str>) -> bool {
    match env_format {
        Some(format) => format.eq_ignore_ascii_case("json"),
        None => config.json_logs,
    }
}
