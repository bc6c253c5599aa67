/// Fleet management module for srcds-restarter.
///
/// This module holds everything that acts on the fleet as a whole: the
/// server inventory, health polling, classification and restarts.
/// All public entry points are instrumented with `tracing` spans.
///
/// # Components
///
/// * `identity` - Server identities and addresses
/// * `discovery` - LinuxGSM instance discovery
/// * `monitor` - Concurrent health polling
/// * `classifier` - Restart decision per probe result
/// * `restart` - Concurrent restart dispatch
///
/// # Examples
///
/// Polling a fleet and picking restart candidates:
///
/// ```no_run
/// use srcds_restarter::probe::A2sProbe;
/// use srcds_restarter::server::{
///     classify, HealthPoller, HealthPollerConfig, ServerAddress, ServerIdentity,
/// };
/// use srcds_restarter::transport::A2sClient;
/// use std::sync::Arc;
///
/// #[tokio::main]
/// async fn main() {
///     let servers = vec![
///         ServerIdentity::new("csgoserver", ServerAddress::new("127.0.0.1", 27015), None),
///         ServerIdentity::new("csgoserver-2", ServerAddress::new("127.0.0.1", 27016), None),
///     ];
///
///     let poller = HealthPoller::new(Arc::new(A2sProbe::new(A2sClient::new())), HealthPollerConfig::default());
///     let results = poller.poll(&servers).await;
///
///     for (name, result) in &results {
///         println!("{}: {}", name, classify(result));
///     }
/// }
/// ```
pub mod classifier;
pub mod discovery;
mod identity;
pub mod monitor;
pub mod restart;

pub use classifier::{Disposition, classify};
pub use discovery::LgsmDiscovery;
pub use identity::{ServerAddress, ServerIdentity};
pub use monitor::{HealthPoller, HealthPollerConfig};
pub use restart::{CommandOutput, RestartDispatcher, RestartInvoker, RestartOutcome, ScriptRestarter};
