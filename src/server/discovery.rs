use crate::config::DiscoveryConfig;
use crate::error::{Error, Result};
use crate::server::{ServerAddress, ServerIdentity};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Enumerates LinuxGSM instances from disk.
///
/// LinuxGSM keeps one config file per instance (`csgoserver.cfg`,
/// `csgoserver-2.cfg`, ...) holding a `port="27015"` line, and the game
/// keeps a matching `csgoserver-2.cfg` under its `cfg` directory holding
/// `rcon_password "..."`. The instance name is the file name up to the
/// first dot.
///
/// # Examples
///
/// ```no_run
/// use srcds_restarter::config::DiscoveryConfig;
/// use srcds_restarter::server::LgsmDiscovery;
///
/// let discovery = LgsmDiscovery::new(DiscoveryConfig {
///     lgsm_config_dir: "/home/csgoserver/lgsm/config-lgsm/csgoserver".into(),
///     game_cfg_dir: Some("/home/csgoserver/serverfiles/csgo/cfg".into()),
///     instance_prefix: "csgoserver".to_string(),
///     host: "127.0.0.1".to_string(),
/// });
/// let servers = discovery.discover().unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct LgsmDiscovery {
    config: DiscoveryConfig,
}

impl LgsmDiscovery {
    pub fn new(config: DiscoveryConfig) -> Self {
        Self { config }
    }

    /// Reads every instance's port, then attaches RCON passwords if a game
    /// cfg directory is configured. Results are sorted by instance name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Discovery`] if either directory cannot be listed.
    /// Individual unreadable files or unparseable ports are logged and skipped.
    #[tracing::instrument(skip(self), fields(dir = ?self.config.lgsm_config_dir))]
    pub fn discover(&self) -> Result<Vec<ServerIdentity>> {
        let ports = self.read_ports()?;
        let passwords = match &self.config.game_cfg_dir {
            Some(dir) => self.read_passwords(dir)?,
            None => BTreeMap::new(),
        };

        let servers: Vec<ServerIdentity> = ports
            .into_iter()
            .map(|(name, port)| {
                let credential = passwords.get(&name).cloned();
                ServerIdentity::new(name, ServerAddress::new(self.config.host.clone(), port), credential)
            })
            .collect();

        tracing::info!(count = servers.len(), "Discovered LinuxGSM instances");
        Ok(servers)
    }

    fn read_ports(&self) -> Result<BTreeMap<String, u16>> {
        let mut ports = BTreeMap::new();

        for path in self.matching_files(&self.config.lgsm_config_dir, None)? {
            let Some(name) = instance_name(&path) else {
                continue;
            };
            let Some(content) = read_file(&path) else {
                continue;
            };

            let Some(value) = content
                .lines()
                .map(str::trim)
                .find_map(|line| line.strip_prefix("port="))
            else {
                continue;
            };

            match value.trim_matches('"').parse::<u16>() {
                Ok(port) if port > 0 => {
                    tracing::debug!(server = %name, port, "Found instance port");
                    ports.insert(name, port);
                }
                _ => tracing::warn!(file = ?path, value, "Ignoring unparseable port"),
            }
        }

        Ok(ports)
    }

    fn read_passwords(&self, dir: &Path) -> Result<BTreeMap<String, String>> {
        let mut passwords = BTreeMap::new();

        for path in self.matching_files(dir, Some(".cfg"))? {
            let Some(name) = instance_name(&path) else {
                continue;
            };
            let Some(content) = read_file(&path) else {
                continue;
            };

            let password = content
                .lines()
                .map(str::trim)
                .filter(|line| line.starts_with("rcon_password"))
                .find_map(|line| line.split('"').nth(1));

            if let Some(password) = password {
                passwords.insert(name, password.to_string());
            }
        }

        Ok(passwords)
    }

    fn matching_files(&self, dir: &Path, suffix: Option<&str>) -> Result<Vec<PathBuf>> {
        let entries = fs::read_dir(dir)
            .map_err(|e| Error::Discovery(format!("Failed to read {}: {}", dir.display(), e)))?;

        let mut files = Vec::new();
        for entry in entries {
            let entry =
                entry.map_err(|e| Error::Discovery(format!("Failed to read {}: {}", dir.display(), e)))?;
            let file_name = entry.file_name();
            let file_name = file_name.to_string_lossy();

            if !file_name.starts_with(&self.config.instance_prefix) {
                continue;
            }
            if suffix.is_some_and(|suffix| !file_name.ends_with(suffix)) {
                continue;
            }
            if entry.path().is_file() {
                files.push(entry.path());
            }
        }

        files.sort();
        Ok(files)
    }
}

fn instance_name(path: &Path) -> Option<String> {
    let file_name = path.file_name()?.to_str()?;
    file_name.split('.').next().map(str::to_string)
}

fn read_file(path: &Path) -> Option<String> {
    match fs::read_to_string(path) {
        Ok(content) => Some(content),
        Err(e) => {
            tracing::warn!(file = ?path, error = %e, "Skipping unreadable file");
            None
        }
    }
}
