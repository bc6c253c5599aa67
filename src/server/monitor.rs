use crate::probe::{Probe, ProbeResult};
use crate::server::ServerIdentity;
use futures::future;
use futures::stream::{self, StreamExt};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

/// Health poller configuration
#[derive(Debug, Clone)]
pub struct HealthPollerConfig {
    /// Per-probe timeout
    pub probe_timeout: Duration,
    /// Maximum probes in flight; `None` probes the whole fleet at once
    pub concurrency: Option<usize>,
}

impl Default for HealthPollerConfig {
    fn default() -> Self {
        Self {
            probe_timeout: Duration::from_secs(2),
            concurrency: None,
        }
    }
}

/// Probes a fleet concurrently.
///
/// Every probe runs as its own future on the current task; each yields a
/// `(name, result)` pair, so there is no shared state to lock. A probe that
/// overruns its timeout is cut off here as well, whatever the `Probe`
/// implementation does.
pub struct HealthPoller {
    probe: Arc<dyn Probe>,
    config: HealthPollerConfig,
}

impl HealthPoller {
    pub fn new(probe: Arc<dyn Probe>, config: HealthPollerConfig) -> Self {
        Self { probe, config }
    }

    /// Polls every server once.
    ///
    /// The returned map holds exactly one entry per input identity. Names are
    /// expected to be unique; a repeated name keeps the last result.
    #[tracing::instrument(skip(self, servers), fields(servers = servers.len()))]
    pub async fn poll(&self, servers: &[ServerIdentity]) -> HashMap<String, ProbeResult> {
        let timeout = self.config.probe_timeout;

        let probes = servers.iter().map(|server| async move {
            let result = tokio::time::timeout(
                timeout,
                self.probe
                    .probe(&server.address, server.credential.as_deref(), timeout),
            )
            .await
            .unwrap_or(ProbeResult::Timeout);

            tracing::debug!(server = %server.name, result = %result, "Probe completed");
            (server.name.clone(), result)
        });

        let results: Vec<(String, ProbeResult)> = match self.config.concurrency {
            Some(limit) => stream::iter(probes).buffer_unordered(limit.max(1)).collect().await,
            None => future::join_all(probes).await,
        };

        tracing::info!(polled = results.len(), "Poll cycle complete");
        results.into_iter().collect()
    }
}
