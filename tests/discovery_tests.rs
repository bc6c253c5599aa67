use srcds_restarter::config::DiscoveryConfig;
use srcds_restarter::error::Error;
use srcds_restarter::server::{LgsmDiscovery, ServerAddress};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write(dir: &Path, name: &str, content: &str) {
    fs::write(dir.join(name), content).unwrap();
}

fn discovery(lgsm: &TempDir, game: Option<&TempDir>) -> LgsmDiscovery {
    LgsmDiscovery::new(DiscoveryConfig {
        lgsm_config_dir: lgsm.path().to_path_buf(),
        game_cfg_dir: game.map(|dir| dir.path().to_path_buf()),
        instance_prefix: "csgoserver".to_string(),
        host: "10.0.0.2".to_string(),
    })
}

fn lgsm_dir() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "csgoserver.cfg", "# LinuxGSM\nip=\"0.0.0.0\"\nport=\"27015\"\n");
    write(dir.path(), "csgoserver-2.cfg", "maxplayers=\"16\"\n  port=\"27016\"\n");
    write(dir.path(), "csgoserver-3.cfg", "port=\"not-a-port\"\n");
    write(dir.path(), "csgoserver-4.cfg", "defaultmap=\"de_dust2\"\n");
    write(dir.path(), "_default.cfg", "port=\"27099\"\n");
    write(dir.path(), "common.cfg", "port=\"27098\"\n");
    dir
}

#[test]
fn test_discover_ports() {
    let lgsm = lgsm_dir();

    let servers = discovery(&lgsm, None).discover().unwrap();

    let names: Vec<_> = servers.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["csgoserver", "csgoserver-2"]);
    assert_eq!(servers[0].address, ServerAddress::new("10.0.0.2", 27015));
    assert_eq!(servers[1].address, ServerAddress::new("10.0.0.2", 27016));
    assert!(servers.iter().all(|s| s.credential.is_none()));
}

#[test]
fn test_discover_rcon_passwords() {
    let lgsm = lgsm_dir();
    let game = tempfile::tempdir().unwrap();
    write(
        game.path(),
        "csgoserver.cfg",
        "hostname \"Retake #1\"\nrcon_password \"hunter2\"\nsv_cheats 0\n",
    );
    write(game.path(), "csgoserver-2.cfg", "hostname \"Retake #2\"\n");
    write(game.path(), "csgoserver.cfg.bak", "rcon_password \"stale\"\n");
    write(game.path(), "autoexec.cfg", "rcon_password \"other\"\n");

    let servers = discovery(&lgsm, Some(&game)).discover().unwrap();

    assert_eq!(servers.len(), 2);
    assert_eq!(servers[0].credential.as_deref(), Some("hunter2"));
    assert_eq!(servers[1].credential, None);
}

#[test]
fn test_discover_empty_dir() {
    let lgsm = tempfile::tempdir().unwrap();

    let servers = discovery(&lgsm, None).discover().unwrap();

    assert!(servers.is_empty());
}

#[test]
fn test_discover_missing_dir() {
    let lgsm = tempfile::tempdir().unwrap();
    let missing = LgsmDiscovery::new(DiscoveryConfig {
        lgsm_config_dir: lgsm.path().join("config-lgsm"),
        game_cfg_dir: None,
        instance_prefix: "csgoserver".to_string(),
        host: "127.0.0.1".to_string(),
    });

    assert!(matches!(missing.discover(), Err(Error::Discovery(_))));

    let missing_game = LgsmDiscovery::new(DiscoveryConfig {
        lgsm_config_dir: lgsm.path().to_path_buf(),
        game_cfg_dir: Some(lgsm.path().join("cfg")),
        instance_prefix: "csgoserver".to_string(),
        host: "127.0.0.1".to_string(),
    });

    assert!(matches!(missing_game.discover(), Err(Error::Discovery(_))));
}
