use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

/// A statically configured server.
///
/// # Examples
///
/// ```
/// use srcds_restarter::config::ServerConfig;
///
/// let server = ServerConfig {
///     name: "csgoserver".to_string(),
///     host: "127.0.0.1".to_string(),
///     port: 27015,
///     rcon_password: Some("secret".to_string()),
/// };
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerConfig {
    /// Instance name. Also the name handed to the restart command.
    pub name: String,

    /// Host the server listens on.
    pub host: String,

    /// Game port (A2S and RCON share it on srcds).
    pub port: u16,

    /// RCON password, required when probing over RCON.
    #[serde(default)]
    pub rcon_password: Option<String>,
}

/// LinuxGSM discovery settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscoveryConfig {
    /// Directory holding the per-instance LinuxGSM config files,
    /// e.g. `lgsm/config-lgsm/csgoserver`.
    pub lgsm_config_dir: PathBuf,

    /// Game `cfg` directory to read `rcon_password` from.
    #[serde(default)]
    pub game_cfg_dir: Option<PathBuf>,

    /// File name prefix shared by all instances.
    #[serde(default = "default_instance_prefix")]
    pub instance_prefix: String,

    /// Host used for every discovered instance.
    #[serde(default = "default_host")]
    pub host: String,
}

/// Wire protocol used to probe servers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    /// Steam A2S_INFO query over UDP.
    #[default]
    A2s,
    /// Source RCON `status` over TCP.
    Rcon,
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Protocol::A2s => write!(f, "a2s"),
            Protocol::Rcon => write!(f, "rcon"),
        }
    }
}

impl FromStr for Protocol {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "a2s" => Ok(Protocol::A2s),
            "rcon" => Ok(Protocol::Rcon),
            other => Err(Error::ConfigInvalid(format!(
                "Unknown protocol '{}', expected 'a2s' or 'rcon'",
                other
            ))),
        }
    }
}

/// Probe settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProbeConfig {
    /// Protocol used for every server.
    #[serde(default)]
    pub protocol: Protocol,

    /// Per-probe timeout in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Maximum number of probes in flight. `None` probes every server at once.
    #[serde(default)]
    pub concurrency: Option<usize>,
}

impl ProbeConfig {
    /// Per-probe timeout as a `Duration`.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            protocol: Protocol::default(),
            timeout_ms: default_timeout_ms(),
            concurrency: None,
        }
    }
}

/// Restart command settings.
///
/// `{name}` in the command or any argument is replaced by the instance name,
/// so the LinuxGSM default `./csgoserver restart` is `./{name}` + `restart`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RestartConfig {
    /// Program to run.
    #[serde(default = "default_restart_command")]
    pub command: String,

    /// Arguments passed to the program.
    #[serde(default = "default_restart_args")]
    pub args: Vec<String>,

    /// Working directory for the program.
    #[serde(default)]
    pub working_dir: Option<PathBuf>,
}

impl Default for RestartConfig {
    fn default() -> Self {
        Self {
            command: default_restart_command(),
            args: default_restart_args(),
            working_dir: None,
        }
    }
}

/// Main configuration for a fleet run.
///
/// Loaded once at startup and never mutated afterwards.
///
/// # JSON Schema
///
/// ```json
/// {
///   "servers": [
///     { "name": "csgoserver", "host": "127.0.0.1", "port": 27015, "rconPassword": "secret" }
///   ],
///   "discovery": {
///     "lgsmConfigDir": "/home/csgoserver/lgsm/config-lgsm/csgoserver",
///     "gameCfgDir": "/home/csgoserver/serverfiles/csgo/cfg"
///   },
///   "probe": { "protocol": "rcon", "timeoutMs": 2000 },
///   "restart": { "command": "./{name}", "args": ["restart"], "workingDir": "/home/csgoserver" },
///   "showPlayerNames": true
/// }
/// ```
///
/// # Examples
///
/// ```no_run
/// use srcds_restarter::config::Config;
///
/// let config = Config::from_file("srcds-restarter.json").unwrap();
/// println!("{} static servers", config.servers.len());
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Statically configured servers.
    #[serde(default)]
    pub servers: Vec<ServerConfig>,

    /// Optional LinuxGSM discovery.
    #[serde(default)]
    pub discovery: Option<DiscoveryConfig>,

    /// Probe settings.
    #[serde(default)]
    pub probe: ProbeConfig,

    /// Restart settings.
    #[serde(default)]
    pub restart: RestartConfig,

    /// List player names for active servers in the report.
    #[serde(default)]
    pub show_player_names: bool,
}

impl Config {
    /// Loads a configuration from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// * The file cannot be read
    /// * The file contents are not valid JSON
    /// * The JSON does not conform to the expected schema
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::ConfigParse(format!("Failed to read config file: {}", e)))?;

        Self::parse_from_str(&content)
    }

    /// Parses a configuration from a JSON string.
    pub fn parse_from_str(content: &str) -> Result<Self> {
        serde_json::from_str(content)
            .map_err(|e| Error::ConfigParse(format!("Failed to parse JSON config: {}", e)))
    }
}

fn default_instance_prefix() -> String {
    "csgoserver".to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_timeout_ms() -> u64 {
    2000
}

fn default_restart_command() -> String {
    "./{name}".to_string()
}

fn default_restart_args() -> Vec<String> {
    vec!["restart".to_string()]
}
