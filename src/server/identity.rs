use crate::config::ServerConfig;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Network address of a game server.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ServerAddress {
    pub host: String,
    pub port: u16,
}

impl ServerAddress {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }
}

impl fmt::Display for ServerAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

/// One server of the fleet.
///
/// Built once from configuration or discovery and never mutated. `name` is
/// the unique key used in poll results, reports and restart invocations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerIdentity {
    pub name: String,
    pub address: ServerAddress,
    /// RCON password, if known.
    #[serde(skip_serializing)]
    pub credential: Option<String>,
}

impl ServerIdentity {
    pub fn new(name: impl Into<String>, address: ServerAddress, credential: Option<String>) -> Self {
        Self {
            name: name.into(),
            address,
            credential,
        }
    }
}

impl From<&ServerConfig> for ServerIdentity {
    fn from(config: &ServerConfig) -> Self {
        Self {
            name: config.name.clone(),
            address: ServerAddress::new(config.host.clone(), config.port),
            credential: config.rcon_password.clone(),
        }
    }
}
