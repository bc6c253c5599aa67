//! Configuration module for srcds-restarter.
//!
//! This module handles parsing and validation of the fleet configuration.
//! The configuration is a JSON document loaded once at startup and passed
//! by reference to the poller, probes and restart dispatcher.
//!
//! # Examples
//!
//! Loading a configuration from a file:
//!
//! ```no_run
//! use srcds_restarter::config::Config;
//!
//! let config = Config::from_file("srcds-restarter.json").unwrap();
//! println!("Probing over {}", config.probe.protocol);
//! ```
//!
//! Creating a configuration programmatically:
//!
//! ```
//! use srcds_restarter::config::{Config, Protocol, ServerConfig};
//!
//! let mut config = Config::default();
//! config.probe.protocol = Protocol::Rcon;
//! config.servers.push(ServerConfig {
//!     name: "csgoserver".to_string(),
//!     host: "127.0.0.1".to_string(),
//!     port: 27015,
//!     rcon_password: Some("secret".to_string()),
//! });
//! srcds_restarter::config::validate_config(&config).unwrap();
//! ```
mod parser;
pub mod validator;

pub use parser::{Config, DiscoveryConfig, ProbeConfig, Protocol, RestartConfig, ServerConfig};
pub use validator::validate_config;
