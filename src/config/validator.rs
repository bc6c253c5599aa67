use crate::config::{Config, ServerConfig};
use crate::error::{Error, Result};
use std::collections::HashSet;

/// Validates a single static server entry
pub fn validate_server_config(config: &ServerConfig) -> Result<()> {
    if config.name.trim().is_empty() {
        return Err(Error::ConfigInvalid("Server with empty name".to_string()));
    }

    if config.host.trim().is_empty() {
        return Err(Error::ConfigInvalid(format!("Server '{}' has empty host", config.name)));
    }

    if config.port == 0 {
        return Err(Error::ConfigInvalid(format!("Server '{}' has port 0", config.name)));
    }

    Ok(())
}

/// Validates the static server list. Names are the inventory key and must be unique.
pub fn validate_server_configs(configs: &[ServerConfig]) -> Result<()> {
    let mut seen = HashSet::new();

    for config in configs {
        validate_server_config(config)?;

        if !seen.insert(config.name.as_str()) {
            return Err(Error::ConfigInvalid(format!(
                "Server '{}' is configured more than once",
                config.name
            )));
        }
    }

    Ok(())
}

/// Full configuration validation
///
/// An empty server list is accepted here as long as discovery is configured;
/// whether the fleet ends up empty is only known after discovery has run.
pub fn validate_config(config: &Config) -> Result<()> {
    validate_server_configs(&config.servers)?;

    if config.servers.is_empty() && config.discovery.is_none() {
        return Err(Error::ConfigInvalid(
            "No servers configured and discovery is disabled".to_string(),
        ));
    }

    if config.probe.timeout_ms == 0 {
        return Err(Error::ConfigInvalid("Probe timeout must be positive".to_string()));
    }

    if config.probe.concurrency == Some(0) {
        return Err(Error::ConfigInvalid("Probe concurrency must be positive".to_string()));
    }

    if config.restart.command.trim().is_empty() {
        return Err(Error::ConfigInvalid("Restart command is empty".to_string()));
    }

    Ok(())
}
