use super::{HealthSnapshot, PlayerInfo};
use regex::Regex;
use std::sync::LazyLock;

// Each rule matches one line shape. The spacing inside the header rules
// mirrors the srcds output and is significant.
static HOSTNAME: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"hostname: (.+)").expect("valid regex"));
static VERSION: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"version : (.+?)/").expect("valid regex"));
static OS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"os {6}: {2}(.+)").expect("valid regex"));
static SERVER_TYPE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"type {4}: {2}(.+)").expect("valid regex"));
static MAP: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"map {5}: (.+)").expect("valid regex"));
static HUMANS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"players : (\d+) humans").expect("valid regex"));
// `(16/0 max)` on CS:GO, `(16 max)` on older branches.
static MAX_PLAYERS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"players : .*?\((\d+)(?:/|\s*max)").expect("valid regex"));
static BOTS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"players : .*?\b(\d+) bots").expect("valid regex"));
static PLAYER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""(.+)" (STEAM_\S+) (.+)"#).expect("valid regex"));

/// Parses the text returned by the RCON `status` command.
///
/// Every field is extracted by its own rule; a rule that does not match
/// leaves its field unset and never affects the others. This function
/// never fails: garbage in yields an empty snapshot.
///
/// Player lines look like
/// `# 2 3 "Alice" STEAM_1:0:1234 02:13 45 0 active 786432 10.0.0.5:27005`;
/// anything before the quoted name (the `#` marker, slot columns) is ignored
/// and lines with fewer than six connection fields are skipped.
pub fn parse_status(raw: &str) -> HealthSnapshot {
    HealthSnapshot {
        server_name: capture_text(&HOSTNAME, raw),
        version: capture_text(&VERSION, raw),
        os: capture_text(&OS, raw),
        server_type: capture_text(&SERVER_TYPE, raw),
        map: capture_text(&MAP, raw),
        player_count: capture_number(&HUMANS, raw),
        max_players: capture_number(&MAX_PLAYERS, raw),
        bot_count: capture_number(&BOTS, raw),
        players: parse_players(raw),
    }
}

fn capture_text(rule: &Regex, raw: &str) -> Option<String> {
    rule.captures(raw)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|value| !value.is_empty())
}

fn capture_number(rule: &Regex, raw: &str) -> Option<u32> {
    rule.captures(raw)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

fn parse_players(raw: &str) -> Vec<PlayerInfo> {
    PLAYER
        .captures_iter(raw)
        .filter_map(|caps| {
            let fields: Vec<&str> = caps[3].split_whitespace().collect();
            if fields.len() < 6 {
                tracing::trace!(line = %&caps[0], "Skipping truncated player line");
                return None;
            }

            let ip = fields[5].split(':').next().unwrap_or_default();

            Some(PlayerInfo {
                name: caps[1].to_string(),
                steam_id: caps[2].to_string(),
                duration: fields[0].to_string(),
                ping: fields[1].to_string(),
                loss: fields[2].to_string(),
                state: fields[3].to_string(),
                rate: fields[4].to_string(),
                ip: ip.to_string(),
            })
        })
        .collect()
}
