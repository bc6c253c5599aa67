use super::{Probe, ProbeResult, within_timeout};
use crate::error::Error;
use crate::server::ServerAddress;
use crate::status::HealthSnapshot;
use crate::transport::{InfoClient, InfoResponse};
use async_trait::async_trait;
use std::time::Duration;

/// Probes a server with an A2S_INFO query. Needs no credential.
///
/// The info reply carries no roster, so snapshots from this probe always
/// have an empty player list. The player count excludes bots.
pub struct A2sProbe<C> {
    client: C,
}

impl<C: InfoClient> A2sProbe<C> {
    pub fn new(client: C) -> Self {
        Self { client }
    }
}

#[async_trait]
impl<C: InfoClient> Probe for A2sProbe<C> {
    async fn probe(&self, address: &ServerAddress, _credential: Option<&str>, timeout: Duration) -> ProbeResult {
        let result = within_timeout(timeout, async {
            let info = self.client.query_info(address).await?;
            Ok::<_, Error>(snapshot_from_info(info))
        })
        .await;

        tracing::debug!(server = %address, result = %result, "A2S probe finished");
        result
    }
}

fn snapshot_from_info(info: InfoResponse) -> HealthSnapshot {
    HealthSnapshot {
        server_type: info.server_type_label().map(str::to_string),
        os: info.environment_label().map(str::to_string),
        player_count: Some(u32::from(info.humans())),
        max_players: Some(u32::from(info.max_players)),
        bot_count: Some(u32::from(info.bots)),
        server_name: Some(info.name),
        map: Some(info.map),
        version: Some(info.version),
        players: Vec::new(),
    }
}
