//! Best-effort remote log shipping.
//!
//! Entries are POSTed as JSON to a log collector (fluentd / fluent-bit HTTP
//! input style) on a detached task. `record` never waits for delivery, and
//! delivery failures never reach the caller: they are counted, logged, and
//! handed to an optional hook.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use super::sink::{LogEntry, LogSink};
use crate::types::{Error, RemoteSinkConfig, Result};

/// Called with every failed delivery.
pub type DeliveryFailureHook = Arc<dyn Fn(&Error) + Send + Sync>;

/// Ships entries to an HTTP log collector.
#[derive(Clone)]
pub struct RemoteSink {
    client: reqwest::Client,
    endpoint: String,
    tag: String,
    timeout: Duration,
    failures: Arc<AtomicU64>,
    on_failure: Option<DeliveryFailureHook>,
}

impl RemoteSink {
    pub fn new(config: &RemoteSinkConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: config.endpoint.clone(),
            tag: config.tag.clone(),
            timeout: config.timeout,
            failures: Arc::new(AtomicU64::new(0)),
            on_failure: None,
        }
    }

    pub fn with_failure_hook(mut self, hook: DeliveryFailureHook) -> Self {
        self.on_failure = Some(hook);
        self
    }

    /// Deliveries that failed since construction (shared by clones).
    pub fn failed_deliveries(&self) -> u64 {
        self.failures.load(Ordering::Relaxed)
    }

    async fn deliver(
        client: reqwest::Client,
        endpoint: String,
        payload: serde_json::Value,
        timeout: Duration,
    ) -> Result<()> {
        let response = client
            .post(&endpoint)
            .timeout(timeout)
            .json(&payload)
            .send()
            .await
            .map_err(|e| Error::transport_log(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::transport_log(format!(
                "log collector returned {}",
                status
            )));
        }
        Ok(())
    }
}

impl fmt::Debug for RemoteSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RemoteSink")
            .field("endpoint", &self.endpoint)
            .field("tag", &self.tag)
            .field("timeout", &self.timeout)
            .field("failures", &self.failed_deliveries())
            .finish_non_exhaustive()
    }
}

impl LogSink for RemoteSink {
    fn name(&self) -> &'static str {
        "remote"
    }

    fn record(&self, entry: &LogEntry) -> Result<()> {
        let handle = tokio::runtime::Handle::try_current()
            .map_err(|_| Error::transport_log("no async runtime for remote log delivery"))?;

        let payload = serde_json::json!({
            "tag": self.tag,
            "message": entry.message(),
            "time": entry.time.to_rfc3339(),
        });
        let client = self.client.clone();
        let endpoint = self.endpoint.clone();
        let timeout = self.timeout;
        let failures = Arc::clone(&self.failures);
        let on_failure = self.on_failure.clone();

        handle.spawn(async move {
            if let Err(e) = Self::deliver(client, endpoint, payload, timeout).await {
                failures.fetch_add(1, Ordering::Relaxed);
                tracing::warn!(error = %e, "Remote log delivery failed");
                if let Some(hook) = on_failure {
                    hook(&e);
                }
            }
        });
        Ok(())
    }
}
