//! Global subscriber installation. Kept in its own test binary so the
//! process-wide subscriber does not interfere with `tracing-test` captures.

use request_guard::observability::init_tracing;
use request_guard::types::ObservabilityConfig;

#[test]
fn test_init_tracing_is_idempotent() {
    let config = ObservabilityConfig {
        log_level: "request_guard=debug".to_string(),
        json_logs: true,
    };

    init_tracing(&config);
    init_tracing(&ObservabilityConfig::default());
    tracing::info!("subscriber installed");

    assert!(tracing::dispatcher::has_been_set());
}
