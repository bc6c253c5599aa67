//! Per-run report.
use crate::probe::ProbeResult;
use crate::server::{Disposition, RestartOutcome, ServerAddress};
use serde::Serialize;
use std::fmt;

/// What happened to one server during a run.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerReport {
    pub name: String,
    pub address: ServerAddress,
    pub disposition: Disposition,
    pub probe: ProbeResult,
    /// Present only if a restart was dispatched.
    pub restart: Option<RestartOutcome>,
}

impl ServerReport {
    fn label(&self) -> String {
        match self.probe.snapshot().and_then(|s| s.server_name.as_deref()) {
            Some(server_name) if server_name != self.name => format!("{} ({})", self.name, server_name),
            _ => self.name.clone(),
        }
    }
}

/// Outcome of a whole run, one entry per server in inventory order.
#[derive(Debug, Clone, Serialize)]
pub struct FleetReport {
    servers: Vec<ServerReport>,
    #[serde(skip)]
    show_player_names: bool,
}

impl FleetReport {
    pub fn new(servers: Vec<ServerReport>, show_player_names: bool) -> Self {
        Self {
            servers,
            show_player_names,
        }
    }

    pub fn entries(&self) -> &[ServerReport] {
        &self.servers
    }

    pub fn get(&self, name: &str) -> Option<&ServerReport> {
        self.servers.iter().find(|s| s.name == name)
    }

    /// Entries for which a restart was dispatched.
    pub fn restarted(&self) -> impl Iterator<Item = &ServerReport> {
        self.servers.iter().filter(|s| s.restart.is_some())
    }

    /// Restarts that did not succeed.
    pub fn failed_restarts(&self) -> impl Iterator<Item = &RestartOutcome> {
        self.servers
            .iter()
            .filter_map(|s| s.restart.as_ref())
            .filter(|r| !r.success)
    }

    pub fn len(&self) -> usize {
        self.servers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.servers.is_empty()
    }
}

impl fmt::Display for FleetReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for server in &self.servers {
            let label = server.label();
            match server.disposition {
                Disposition::Active => {
                    let count = server
                        .probe
                        .snapshot()
                        .and_then(|s| s.player_count)
                        .unwrap_or_default();
                    writeln!(f, "{} has {} players, not restarting", label, count)?;

                    if self.show_player_names {
                        if let Some(snapshot) = server.probe.snapshot() {
                            if !snapshot.players.is_empty() {
                                writeln!(f, "  {}", snapshot.player_names().join(" "))?;
                            }
                        }
                    }
                }
                Disposition::Idle => writeln!(f, "{} is empty, restarting", label)?,
                Disposition::Unreachable => {
                    writeln!(f, "{} is unreachable ({}), restarting", label, server.probe)?
                }
            }

            if let Some(restart) = &server.restart {
                match &restart.error {
                    None => writeln!(f, "  restart ok")?,
                    Some(error) => writeln!(f, "  restart failed: {}", error)?,
                }
                for line in restart.output.lines().filter(|l| !l.trim().is_empty()) {
                    writeln!(f, "    {}", line)?;
                }
            }
        }

        let restarted = self.restarted().count();
        let failed = self.failed_restarts().count();
        write!(
            f,
            "{} servers polled, {} restarted, {} restart failures",
            self.servers.len(),
            restarted,
            failed
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::{HealthSnapshot, PlayerInfo};

    fn player(name: &str) -> PlayerInfo {
        PlayerInfo {
            name: name.to_string(),
            steam_id: "STEAM_1:0:1".to_string(),
            duration: "01:00".to_string(),
            ping: "20".to_string(),
            loss: "0".to_string(),
            state: "active".to_string(),
            rate: "786432".to_string(),
            ip: "10.0.0.1".to_string(),
        }
    }

    fn report(show_player_names: bool) -> FleetReport {
        let active = ServerReport {
            name: "csgoserver".to_string(),
            address: ServerAddress::new("127.0.0.1", 27015),
            disposition: Disposition::Active,
            probe: ProbeResult::Snapshot(HealthSnapshot {
                server_name: Some("Retake #1".to_string()),
                player_count: Some(2),
                players: vec![player("Alice"), player("Bob")],
                ..Default::default()
            }),
            restart: None,
        };
        let down = ServerReport {
            name: "csgoserver-2".to_string(),
            address: ServerAddress::new("127.0.0.1", 27016),
            disposition: Disposition::Unreachable,
            probe: ProbeResult::Timeout,
            restart: Some(RestartOutcome {
                server: "csgoserver-2".to_string(),
                success: false,
                output: "Restarting csgoserver-2\nFAIL".to_string(),
                error: Some("restart command exited with status 1".to_string()),
            }),
        };
        FleetReport::new(vec![active, down], show_player_names)
    }

    #[test]
    fn test_display_report() {
        let text = report(true).to_string();

        assert!(text.contains("csgoserver (Retake #1) has 2 players, not restarting"));
        assert!(text.contains("  Alice Bob"));
        assert!(text.contains("csgoserver-2 is unreachable (timeout), restarting"));
        assert!(text.contains("  restart failed: restart command exited with status 1"));
        assert!(text.contains("    FAIL"));
        assert!(text.ends_with("2 servers polled, 1 restarted, 1 restart failures"));
    }

    #[test]
    fn test_player_names_hidden_by_default() {
        let text = report(false).to_string();
        assert!(!text.contains("Alice"));
    }

    #[test]
    fn test_serialize_report() {
        let json = serde_json::to_value(report(false)).unwrap();

        assert_eq!(json["servers"].as_array().unwrap().len(), 2);
        assert_eq!(json["servers"][0]["disposition"], "active");
        assert_eq!(json["servers"][1]["probe"]["kind"], "timeout");
        assert_eq!(json["servers"][1]["restart"]["success"], false);
    }
}
