use srcds_restarter::error::Error;
use srcds_restarter::server::ServerAddress;
use srcds_restarter::transport::{A2sClient, InfoClient, RconClient, RconPacket, SourceRconClient, info_request};
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::net::{TcpListener, UdpSocket};

const CHALLENGE: [u8; 4] = [0x0A, 0x0B, 0x0C, 0x0D];

fn info_reply() -> Vec<u8> {
    let mut packet = vec![0xFF, 0xFF, 0xFF, 0xFF, 0x49, 17];
    for field in ["Retake #3", "de_vertigo", "csgo", "Counter-Strike: Global Offensive"] {
        packet.extend_from_slice(field.as_bytes());
        packet.push(0);
    }
    packet.extend_from_slice(&730u16.to_le_bytes());
    packet.extend_from_slice(&[3, 10, 1, b'd', b'l', 0, 1]);
    packet.extend_from_slice(b"1.38.7.9\0");
    packet
}

/// Answers the first request with a challenge and the challenged one with
/// the info reply.
async fn fake_a2s_server() -> u16 {
    let socket = UdpSocket::bind("127.0.0.1:0").await.unwrap();
    let port = socket.local_addr().unwrap().port();

    tokio::spawn(async move {
        let mut buffer = [0u8; 1400];

        let (len, peer) = socket.recv_from(&mut buffer).await.unwrap();
        assert_eq!(&buffer[..len], info_request(None).as_slice());
        let mut challenge = vec![0xFF, 0xFF, 0xFF, 0xFF, 0x41];
        challenge.extend_from_slice(&CHALLENGE);
        socket.send_to(&challenge, peer).await.unwrap();

        let (len, peer) = socket.recv_from(&mut buffer).await.unwrap();
        assert_eq!(&buffer[..len], info_request(Some(CHALLENGE)).as_slice());
        socket.send_to(&info_reply(), peer).await.unwrap();
    });

    port
}

#[tokio::test]
async fn test_a2s_query_with_challenge() {
    let port = fake_a2s_server().await;

    let info = tokio::time::timeout(
        Duration::from_secs(5),
        A2sClient::new().query_info(&ServerAddress::new("127.0.0.1", port)),
    )
    .await
    .expect("query timed out")
    .unwrap();

    assert_eq!(info.name, "Retake #3");
    assert_eq!(info.map, "de_vertigo");
    assert_eq!(info.players, 3);
    assert_eq!(info.bots, 1);
    assert_eq!(info.humans(), 2);
    assert_eq!(info.max_players, 10);
}

#[tokio::test]
async fn test_a2s_garbage_reply() {
    let socket = UdpSocket::bind("127.0.0.1:0").await.unwrap();
    let port = socket.local_addr().unwrap().port();
    tokio::spawn(async move {
        let mut buffer = [0u8; 1400];
        let (_, peer) = socket.recv_from(&mut buffer).await.unwrap();
        socket.send_to(b"hello", peer).await.unwrap();
    });

    let result = tokio::time::timeout(
        Duration::from_secs(5),
        A2sClient::new().query_info(&ServerAddress::new("127.0.0.1", port)),
    )
    .await
    .expect("query timed out");

    assert!(matches!(result, Err(Error::Protocol(_))));
}

#[tokio::test]
async fn test_a2s_gives_up_on_endless_challenges() {
    let socket = UdpSocket::bind("127.0.0.1:0").await.unwrap();
    let port = socket.local_addr().unwrap().port();
    let requests = tokio::spawn(async move {
        let mut buffer = [0u8; 1400];
        let mut challenge = vec![0xFF, 0xFF, 0xFF, 0xFF, 0x41];
        challenge.extend_from_slice(&CHALLENGE);

        let mut count = 0;
        while let Ok(Ok((_, peer))) =
            tokio::time::timeout(Duration::from_millis(500), socket.recv_from(&mut buffer)).await
        {
            count += 1;
            socket.send_to(&challenge, peer).await.unwrap();
        }
        count
    });

    let result = tokio::time::timeout(
        Duration::from_secs(5),
        A2sClient::new().query_info(&ServerAddress::new("127.0.0.1", port)),
    )
    .await
    .expect("query timed out");

    assert!(matches!(result, Err(Error::Protocol(ref msg)) if msg.contains("after 3 attempts")));
    assert_eq!(requests.await.unwrap(), 3);
}

/// Plays the srcds side of one RCON session.
async fn fake_rcon_server(password: &'static str, fragments: Vec<&'static str>) -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();

    tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.unwrap();

        let auth = RconPacket::read_from(&mut stream).await.unwrap();
        assert_eq!(auth.kind, 3);
        let auth_id = if auth.body == password { auth.id } else { -1 };
        let mut reply = RconPacket::new(auth.id, 0, "").encode();
        reply.extend(RconPacket::new(auth_id, 2, "").encode());
        stream.write_all(&reply).await.unwrap();
        if auth_id == -1 {
            return;
        }

        let command = RconPacket::read_from(&mut stream).await.unwrap();
        assert_eq!(command.kind, 2);
        assert_eq!(command.body, "status");
        let sentinel = RconPacket::read_from(&mut stream).await.unwrap();
        assert_eq!(sentinel.body, "");

        for fragment in fragments {
            stream
                .write_all(&RconPacket::new(command.id, 0, fragment).encode())
                .await
                .unwrap();
        }
        stream
            .write_all(&RconPacket::new(sentinel.id, 0, "").encode())
            .await
            .unwrap();
    });

    port
}

#[tokio::test]
async fn test_rcon_multi_packet_response() {
    let port = fake_rcon_server(
        "hunter2",
        vec!["hostname: Retake #3\nplayers : 2 hum", "ans, 0 bots (10/0 max)\n"],
    )
    .await;

    let output = SourceRconClient::new()
        .execute(&ServerAddress::new("127.0.0.1", port), "hunter2", "status")
        .await
        .unwrap();

    assert_eq!(output, "hostname: Retake #3\nplayers : 2 humans, 0 bots (10/0 max)\n");
}

#[tokio::test]
async fn test_rcon_rejected_password() {
    let port = fake_rcon_server("hunter2", vec![]).await;

    let result = SourceRconClient::new()
        .execute(&ServerAddress::new("127.0.0.1", port), "wrong", "status")
        .await;

    assert!(matches!(result, Err(Error::Authentication(_))));
}

#[tokio::test]
async fn test_rcon_connection_closed_mid_session() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        drop(stream);
    });

    let result = SourceRconClient::new()
        .execute(&ServerAddress::new("127.0.0.1", port), "hunter2", "status")
        .await;

    assert!(result.is_err());
    assert!(!matches!(result, Err(Error::Authentication(_))));
}

#[tokio::test]
async fn test_rcon_connection_refused() {
    let port = {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        listener.local_addr().unwrap().port()
    };

    let result = SourceRconClient::new()
        .execute(&ServerAddress::new("127.0.0.1", port), "hunter2", "status")
        .await;

    assert!(matches!(result, Err(Error::ConnectionRefused(_))));
}
