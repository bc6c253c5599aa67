/*!
 # srcds-restarter

 Keeps a fleet of Source dedicated servers fresh by restarting the ones
 nobody is playing on.

 ## Overview

 A run goes through three stages:
 - **Poll**: every server is probed concurrently, over A2S (UDP info
   query) or RCON (`status` command), each probe bounded by its own timeout
 - **Classify**: each probe result becomes `Active` (humans connected),
   `Idle` (reachable, nobody playing) or `Unreachable` (probe failed)
 - **Restart**: idle and unreachable servers are restarted concurrently
   through an external command, LinuxGSM's `./csgoserver restart` by default

 The stages are strictly sequential; no restart starts before the whole
 fleet has been classified, and active servers are never restarted.

 ## Basic Usage

 ```no_run
 use srcds_restarter::{FleetRunner, Result};

 #[tokio::main]
 async fn main() -> Result<()> {
     let runner = FleetRunner::from_config_file("srcds-restarter.json")?;
     let report = runner.run().await?;

     println!("{}", report);
     Ok(())
 }
 ```

 ## Features

 - **Two probe protocols**: A2S_INFO and Source RCON `status`
 - **Resilient status parsing**: every field of the `status` text is
   extracted independently; missing fields stay unset
 - **LinuxGSM discovery**: instance ports and RCON passwords read from disk
 - **Failure isolation**: probe failures become data, restart failures are
   reported without affecting sibling restarts
*/

pub mod config;
pub mod error;
pub mod probe;
pub mod report;
pub mod server;
pub mod status;
pub mod transport;

pub use config::Config;
pub use error::{Error, Result};
pub use report::{FleetReport, ServerReport};
pub use server::{Disposition, ServerIdentity};

use config::Protocol;
use probe::{A2sProbe, Probe, RconProbe};
use server::{
    HealthPoller, HealthPollerConfig, LgsmDiscovery, RestartDispatcher, RestartInvoker, ScriptRestarter,
    classify,
};
use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;
use transport::{A2sClient, SourceRconClient};

/// Runs poll, classify and restart over a fleet.
///
/// The probe and restart collaborators default to the network clients and
/// [`ScriptRestarter`] selected by the configuration, and can be replaced
/// with [`with_probe`](Self::with_probe) and
/// [`with_restarter`](Self::with_restarter).
/// All public methods are instrumented with `tracing` spans.
pub struct FleetRunner {
    /// Configuration
    config: Config,
    /// Probe used for every server
    probe: Arc<dyn Probe>,
    /// Restart collaborator
    restarter: Arc<dyn RestartInvoker>,
}

impl FleetRunner {
    /// Create a runner from a configuration file path
    #[tracing::instrument(skip(path), fields(config_path = ?path.as_ref()))]
    pub fn from_config_file(path: impl AsRef<Path>) -> Result<Self> {
        tracing::info!("Loading configuration from file");
        let config = Config::from_file(path)?;
        Ok(Self::new(config))
    }

    /// Create a runner from a configuration string
    #[tracing::instrument(skip(config))]
    pub fn from_config_str(config: &str) -> Result<Self> {
        tracing::info!("Loading configuration from string");
        let config = Config::parse_from_str(config)?;
        Ok(Self::new(config))
    }

    /// Create a runner from a configuration
    #[tracing::instrument(skip(config), fields(protocol = %config.probe.protocol))]
    pub fn new(config: Config) -> Self {
        let probe: Arc<dyn Probe> = match config.probe.protocol {
            Protocol::A2s => Arc::new(A2sProbe::new(A2sClient::new())),
            Protocol::Rcon => Arc::new(RconProbe::new(SourceRconClient::new())),
        };
        let restarter = Arc::new(ScriptRestarter::new(&config.restart));

        Self {
            config,
            probe,
            restarter,
        }
    }

    /// Replace the probe used for every server
    pub fn with_probe(mut self, probe: Arc<dyn Probe>) -> Self {
        self.probe = probe;
        self
    }

    /// Replace the restart collaborator
    pub fn with_restarter(mut self, restarter: Arc<dyn RestartInvoker>) -> Self {
        self.restarter = restarter;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Build the server inventory: static servers first, then discovered ones.
    ///
    /// # Errors
    ///
    /// * [`Error::ConfigInvalid`] if the configuration fails validation or a
    ///   name appears twice
    /// * [`Error::Discovery`] if discovery fails or the inventory is empty
    #[tracing::instrument(skip(self))]
    pub fn inventory(&self) -> Result<Vec<ServerIdentity>> {
        config::validate_config(&self.config)?;

        let mut servers: Vec<ServerIdentity> = self.config.servers.iter().map(ServerIdentity::from).collect();

        if let Some(discovery) = &self.config.discovery {
            servers.extend(LgsmDiscovery::new(discovery.clone()).discover()?);
        }

        if servers.is_empty() {
            tracing::error!("No servers could be enumerated");
            return Err(Error::Discovery("No servers could be enumerated".to_string()));
        }

        check_unique_names(&servers)?;

        if self.config.probe.protocol == Protocol::Rcon {
            for server in servers.iter().filter(|s| s.credential.is_none()) {
                tracing::warn!(server = %server.name, "No RCON password, server will be reported unreachable");
            }
        }

        tracing::info!(count = servers.len(), "Inventory ready");
        Ok(servers)
    }

    /// Build the inventory and run one poll and restart cycle over it
    #[tracing::instrument(skip(self))]
    pub async fn run(&self) -> Result<FleetReport> {
        let servers = self.inventory()?;
        self.run_with(&servers).await
    }

    /// Run one poll and restart cycle over `servers`
    ///
    /// An empty fleet or a repeated name is an error; probe and restart
    /// failures end up in the report.
    #[tracing::instrument(skip(self, servers), fields(servers = servers.len()))]
    pub async fn run_with(&self, servers: &[ServerIdentity]) -> Result<FleetReport> {
        if servers.is_empty() {
            return Err(Error::Discovery("No servers to poll".to_string()));
        }
        check_unique_names(servers)?;

        let poller = HealthPoller::new(
            Arc::clone(&self.probe),
            HealthPollerConfig {
                probe_timeout: self.config.probe.timeout(),
                concurrency: self.config.probe.concurrency,
            },
        );
        let results = poller.poll(servers).await;

        let classified: Vec<_> = servers
            .iter()
            .map(|server| {
                let probe = results
                    .get(&server.name)
                    .cloned()
                    .unwrap_or_else(|| probe::ProbeResult::ProtocolError("not polled".to_string()));
                let disposition = classify(&probe);
                tracing::info!(server = %server.name, %disposition, "Classified");
                (server, probe, disposition)
            })
            .collect();

        let to_restart: Vec<String> = classified
            .iter()
            .filter(|(_, _, disposition)| disposition.needs_restart())
            .map(|(server, _, _)| server.name.clone())
            .collect();

        tracing::info!(count = to_restart.len(), "Fleet classified, dispatching restarts");
        let mut outcomes = RestartDispatcher::new(Arc::clone(&self.restarter))
            .dispatch(&to_restart)
            .await;

        let reports = classified
            .into_iter()
            .map(|(server, probe, disposition)| {
                let restart = outcomes
                    .iter()
                    .position(|outcome| outcome.server == server.name)
                    .map(|index| outcomes.swap_remove(index));

                ServerReport {
                    name: server.name.clone(),
                    address: server.address.clone(),
                    disposition,
                    probe,
                    restart,
                }
            })
            .collect();

        Ok(FleetReport::new(reports, self.config.show_player_names))
    }
}

/// Names key poll results and restarts, so each may appear only once.
fn check_unique_names(servers: &[ServerIdentity]) -> Result<()> {
    let mut seen = HashSet::new();
    for server in servers {
        if !seen.insert(server.name.as_str()) {
            return Err(Error::ConfigInvalid(format!(
                "Server '{}' appears more than once",
                server.name
            )));
        }
    }
    Ok(())
}
