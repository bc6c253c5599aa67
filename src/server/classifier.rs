use crate::probe::ProbeResult;
use serde::Serialize;
use std::fmt;

/// Restart decision for one server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Disposition {
    /// At least one human player is connected.
    Active,
    /// Reachable with no human players (or no player count reported).
    Idle,
    /// The probe failed.
    Unreachable,
}

impl Disposition {
    /// Idle and unreachable servers are both restarted.
    pub fn needs_restart(self) -> bool {
        matches!(self, Disposition::Idle | Disposition::Unreachable)
    }
}

impl fmt::Display for Disposition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Disposition::Active => write!(f, "active"),
            Disposition::Idle => write!(f, "idle"),
            Disposition::Unreachable => write!(f, "unreachable"),
        }
    }
}

/// Classifies a probe result.
pub fn classify(result: &ProbeResult) -> Disposition {
    match result {
        ProbeResult::Snapshot(snapshot) => match snapshot.player_count {
            Some(count) if count > 0 => Disposition::Active,
            _ => Disposition::Idle,
        },
        ProbeResult::Timeout | ProbeResult::ConnectionRefused | ProbeResult::ProtocolError(_) => {
            Disposition::Unreachable
        }
    }
}
