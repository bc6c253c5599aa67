use srcds_restarter::status::parse_status;

#[test]
fn test_empty_server_counts() {
    let raw = "hostname: Practice\n\
               map     : de_overpass\n\
               players : 0 humans (16 max) (0 bots)\n";

    let snapshot = parse_status(raw);

    assert_eq!(snapshot.player_count, Some(0));
    assert_eq!(snapshot.max_players, Some(16));
    assert_eq!(snapshot.bot_count, Some(0));
    assert!(snapshot.players.is_empty());
}

#[test]
fn test_roster_keeps_order() {
    let raw = "players : 2 humans, 0 bots (16/0 max) (not hibernating)\n\
               #\"Alice\" STEAM_0:1:111 10:00 30 0 active 1000 1.2.3.4:27005\n\
               #\"Bob\" STEAM_0:1:222 05:00 50 1 active 2000 5.6.7.8:27005\n";

    let snapshot = parse_status(raw);

    assert_eq!(snapshot.players.len(), 2);
    assert_eq!(snapshot.player_names(), vec!["Alice", "Bob"]);

    let alice = &snapshot.players[0];
    assert_eq!(alice.steam_id, "STEAM_0:1:111");
    assert_eq!(alice.duration, "10:00");
    assert_eq!(alice.ping, "30");
    assert_eq!(alice.loss, "0");
    assert_eq!(alice.state, "active");
    assert_eq!(alice.rate, "1000");
    assert_eq!(alice.ip, "1.2.3.4");

    let bob = &snapshot.players[1];
    assert_eq!(bob.ping, "50");
    assert_eq!(bob.ip, "5.6.7.8");
}

#[test]
fn test_one_missing_field_does_not_hide_others() {
    // No hostname, no version, broken players line
    let raw = "os      :  Linux\n\
               type    :  community dedicated\n\
               map     : cs_office\n\
               players : ? humans\n";

    let snapshot = parse_status(raw);

    assert_eq!(snapshot.server_name, None);
    assert_eq!(snapshot.version, None);
    assert_eq!(snapshot.os.as_deref(), Some("Linux"));
    assert_eq!(snapshot.server_type.as_deref(), Some("community dedicated"));
    assert_eq!(snapshot.map.as_deref(), Some("cs_office"));
    assert_eq!(snapshot.player_count, None);
}

#[test]
fn test_truncated_response_never_panics() {
    let full = "hostname: Retake\n\
                version : 1.38.7.9/13879 1575/8853 secure\n\
                map     : de_mirage\n\
                players : 1 humans, 0 bots (10/0 max) (not hibernating)\n\
                # 2 1 \"Alice\" STEAM_1:0:1234 02:13 45 0 active 786432 10.0.0.5:27005\n";

    for end in 0..=full.len() {
        if full.is_char_boundary(end) {
            let snapshot = parse_status(&full[..end]);
            assert!(snapshot.players.len() <= 1);
        }
    }

    let snapshot = parse_status(full);
    assert_eq!(snapshot.server_name.as_deref(), Some("Retake"));
    assert_eq!(snapshot.player_count, Some(1));
    assert_eq!(snapshot.max_players, Some(10));
    assert_eq!(snapshot.players.len(), 1);
}
