//! Decoded server state.
//!
//! [`HealthSnapshot`] is the normalized view both probe adapters produce.
//! The RCON adapter fills it from the `status` command text through
//! [`parse_status`]; the A2S adapter fills it from the info reply.
//!
//! ```
//! use srcds_restarter::status::parse_status;
//!
//! let snapshot = parse_status("hostname: Dust Only\nplayers : 0 humans (16 max) (0 bots)\n");
//! assert_eq!(snapshot.server_name.as_deref(), Some("Dust Only"));
//! assert_eq!(snapshot.player_count, Some(0));
//! assert!(snapshot.players.is_empty());
//! ```
mod parser;

pub use parser::parse_status;

use serde::{Deserialize, Serialize};

/// A player line from the `status` roster.
///
/// Values are kept as the textual tokens the server printed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerInfo {
    pub name: String,
    pub steam_id: String,
    pub duration: String,
    pub ping: String,
    pub loss: String,
    pub state: String,
    pub rate: String,
    /// Client address without its port.
    pub ip: String,
}

/// Server state at probe time.
///
/// Every scalar field is optional: a field the response did not carry stays
/// `None`, which is distinct from a reported zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthSnapshot {
    /// Server-reported host name.
    pub server_name: Option<String>,
    pub version: Option<String>,
    /// Operating system label.
    pub os: Option<String>,
    /// Server type label, e.g. `community dedicated`.
    pub server_type: Option<String>,
    pub map: Option<String>,
    /// Human players.
    pub player_count: Option<u32>,
    pub max_players: Option<u32>,
    pub bot_count: Option<u32>,
    /// Roster in order of appearance.
    pub players: Vec<PlayerInfo>,
}

impl HealthSnapshot {
    /// Player names in roster order.
    pub fn player_names(&self) -> Vec<&str> {
        self.players.iter().map(|p| p.name.as_str()).collect()
    }
}
