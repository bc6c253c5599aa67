//! Protocol probe adapters.
//!
//! A probe performs one health query against one server and always yields
//! a [`ProbeResult`]. Client errors and timeouts become result variants;
//! nothing escapes the probe boundary as an `Err` or a panic.
//!
//! ```no_run
//! use srcds_restarter::probe::{A2sProbe, Probe};
//! use srcds_restarter::server::ServerAddress;
//! use srcds_restarter::transport::A2sClient;
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() {
//!     let probe = A2sProbe::new(A2sClient::new());
//!     let address = ServerAddress::new("127.0.0.1", 27015);
//!     let result = probe.probe(&address, None, Duration::from_secs(2)).await;
//!     println!("{:?}", result);
//! }
//! ```
mod a2s;
mod rcon;

pub use a2s::A2sProbe;
pub use rcon::RconProbe;

use crate::error::{Error, Result};
use crate::server::ServerAddress;
use crate::status::HealthSnapshot;
use async_trait::async_trait;
use serde::Serialize;
use std::fmt;
use std::future::Future;
use std::time::Duration;

/// Outcome of a single probe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "camelCase")]
pub enum ProbeResult {
    /// The server answered.
    Snapshot(HealthSnapshot),
    /// No answer within the probe timeout.
    Timeout,
    /// The server refused the connection.
    ConnectionRefused,
    /// The server answered with something unusable, or the probe could not
    /// be attempted at all.
    ProtocolError(String),
}

impl ProbeResult {
    /// Maps a client error onto the matching failure variant.
    pub fn from_error(error: Error) -> Self {
        match error {
            Error::Timeout(_) => ProbeResult::Timeout,
            Error::ConnectionRefused(_) => ProbeResult::ConnectionRefused,
            other => ProbeResult::ProtocolError(other.to_string()),
        }
    }

    pub fn snapshot(&self) -> Option<&HealthSnapshot> {
        match self {
            ProbeResult::Snapshot(snapshot) => Some(snapshot),
            _ => None,
        }
    }
}

impl fmt::Display for ProbeResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProbeResult::Snapshot(_) => write!(f, "ok"),
            ProbeResult::Timeout => write!(f, "timeout"),
            ProbeResult::ConnectionRefused => write!(f, "connection refused"),
            ProbeResult::ProtocolError(detail) => write!(f, "protocol error: {}", detail),
        }
    }
}

/// A health query over one wire protocol.
///
/// Implementations must return within `timeout` and must not share mutable
/// state between calls.
#[async_trait]
pub trait Probe: Send + Sync {
    async fn probe(&self, address: &ServerAddress, credential: Option<&str>, timeout: Duration) -> ProbeResult;
}

/// Runs a client call under `timeout` and folds its outcome into a
/// [`ProbeResult`].
pub async fn within_timeout<F>(timeout: Duration, call: F) -> ProbeResult
where
    F: Future<Output = Result<HealthSnapshot>>,
{
    match tokio::time::timeout(timeout, call).await {
        Ok(Ok(snapshot)) => ProbeResult::Snapshot(snapshot),
        Ok(Err(error)) => ProbeResult::from_error(error),
        Err(_) => ProbeResult::Timeout,
    }
}
