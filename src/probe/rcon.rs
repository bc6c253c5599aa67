use super::{Probe, ProbeResult, within_timeout};
use crate::error::Error;
use crate::server::ServerAddress;
use crate::status::parse_status;
use crate::transport::RconClient;
use async_trait::async_trait;
use std::time::Duration;

/// Probes a server by running `status` over RCON and parsing the output.
///
/// Without a credential the probe cannot be attempted and reports a
/// protocol error.
pub struct RconProbe<C> {
    client: C,
}

impl<C: RconClient> RconProbe<C> {
    pub fn new(client: C) -> Self {
        Self { client }
    }
}

#[async_trait]
impl<C: RconClient> Probe for RconProbe<C> {
    async fn probe(&self, address: &ServerAddress, credential: Option<&str>, timeout: Duration) -> ProbeResult {
        let Some(password) = credential else {
            tracing::warn!(server = %address, "No RCON password, skipping probe");
            return ProbeResult::ProtocolError("no RCON password configured".to_string());
        };

        let result = within_timeout(timeout, async {
            let output = self.client.execute(address, password, "status").await?;
            Ok::<_, Error>(parse_status(&output))
        })
        .await;

        tracing::debug!(server = %address, result = %result, "RCON probe finished");
        result
    }
}
