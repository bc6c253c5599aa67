//! Wire protocol clients.
//!
//! The probes only talk to servers through the [`InfoClient`] and
//! [`RconClient`] traits; [`A2sClient`] and [`SourceRconClient`] are the
//! network implementations. Clients report failures as typed
//! [`Error`](crate::error::Error)s (`Timeout`, `ConnectionRefused`,
//! `Protocol`, `Authentication`) and leave timeout enforcement to the caller.
mod a2s;
mod rcon;

pub use a2s::{A2sClient, InfoResponse, info_request, parse_info};
pub use rcon::{RconPacket, SourceRconClient};

use crate::error::Result;
use crate::server::ServerAddress;
use async_trait::async_trait;

/// Answers a Steam A2S_INFO query.
#[async_trait]
pub trait InfoClient: Send + Sync {
    async fn query_info(&self, address: &ServerAddress) -> Result<InfoResponse>;
}

/// Runs a console command over RCON and returns its output.
#[async_trait]
pub trait RconClient: Send + Sync {
    async fn execute(&self, address: &ServerAddress, password: &str, command: &str) -> Result<String>;
}
