use crate::error::{Error, Result};
use crate::server::ServerAddress;
use crate::transport::InfoClient;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use tokio::net::UdpSocket;

const SIMPLE_HEADER: [u8; 4] = [0xFF, 0xFF, 0xFF, 0xFF];
const A2S_INFO: u8 = 0x54;
const S2C_CHALLENGE: u8 = 0x41;
const S2A_INFO: u8 = 0x49;
const INFO_PAYLOAD: &[u8] = b"Source Engine Query\0";
const MAX_PACKET: usize = 1400;
// Requests sent before giving up on a server that keeps re-challenging.
const MAX_ATTEMPTS: usize = 3;

/// Reply to an A2S_INFO query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InfoResponse {
    pub protocol: u8,
    pub name: String,
    pub map: String,
    pub folder: String,
    pub game: String,
    pub app_id: u16,
    /// Players including bots.
    pub players: u8,
    pub max_players: u8,
    pub bots: u8,
    /// `d` dedicated, `l` listen, `p` SourceTV proxy.
    pub server_type: u8,
    /// `l` Linux, `w` Windows, `m`/`o` macOS.
    pub environment: u8,
    pub password_protected: bool,
    pub vac: bool,
    pub version: String,
}

impl InfoResponse {
    /// Human players, i.e. reported players minus bots.
    pub fn humans(&self) -> u8 {
        self.players.saturating_sub(self.bots)
    }

    pub fn server_type_label(&self) -> Option<&'static str> {
        match self.server_type {
            b'd' => Some("dedicated"),
            b'l' => Some("listen"),
            b'p' => Some("proxy"),
            _ => None,
        }
    }

    pub fn environment_label(&self) -> Option<&'static str> {
        match self.environment {
            b'l' => Some("Linux"),
            b'w' => Some("Windows"),
            b'm' | b'o' => Some("Mac"),
            _ => None,
        }
    }
}

/// Steam server query client for A2S_INFO over UDP.
///
/// Stateless: every query binds its own ephemeral socket, so one client may
/// be shared by any number of concurrent probes. Timeouts are imposed by the
/// caller.
#[derive(Debug, Clone, Copy, Default)]
pub struct A2sClient;

impl A2sClient {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl InfoClient for A2sClient {
    async fn query_info(&self, address: &ServerAddress) -> Result<InfoResponse> {
        let target = address.to_string();
        let remote = resolve(address).await?;

        let local: SocketAddr = if remote.is_ipv4() {
            ([0, 0, 0, 0], 0).into()
        } else {
            ([0u16; 8], 0).into()
        };
        let socket = UdpSocket::bind(local)
            .await
            .map_err(|e| Error::from_io(&target, e))?;
        // A connected socket surfaces ICMP port-unreachable as ConnectionRefused.
        socket
            .connect(remote)
            .await
            .map_err(|e| Error::from_io(&target, e))?;

        let mut challenge = None;
        let mut buffer = [0u8; MAX_PACKET];

        for _ in 0..MAX_ATTEMPTS {
            socket
                .send(&info_request(challenge))
                .await
                .map_err(|e| Error::from_io(&target, e))?;
            tracing::trace!(server = %target, ?challenge, "Sent A2S_INFO");

            let len = socket
                .recv(&mut buffer)
                .await
                .map_err(|e| Error::from_io(&target, e))?;

            match parse_challenge(&buffer[..len]) {
                Some(next) => challenge = Some(next),
                None => return parse_info(&buffer[..len]),
            }
        }

        Err(Error::Protocol(format!(
            "{}: still challenged after {} attempts",
            target, MAX_ATTEMPTS
        )))
    }
}

async fn resolve(address: &ServerAddress) -> Result<SocketAddr> {
    tokio::net::lookup_host((address.host.as_str(), address.port))
        .await
        .map_err(|e| Error::Protocol(format!("Failed to resolve {}: {}", address, e)))?
        .next()
        .ok_or_else(|| Error::Protocol(format!("{} resolved to no addresses", address)))
}

/// Builds an A2S_INFO request, optionally carrying the challenge number.
pub fn info_request(challenge: Option<[u8; 4]>) -> Vec<u8> {
    let mut packet = Vec::with_capacity(29);
    packet.extend_from_slice(&SIMPLE_HEADER);
    packet.push(A2S_INFO);
    packet.extend_from_slice(INFO_PAYLOAD);
    if let Some(challenge) = challenge {
        packet.extend_from_slice(&challenge);
    }
    packet
}

fn parse_challenge(packet: &[u8]) -> Option<[u8; 4]> {
    if packet.len() >= 9 && packet[..4] == SIMPLE_HEADER && packet[4] == S2C_CHALLENGE {
        packet[5..9].try_into().ok()
    } else {
        None
    }
}

/// Decodes an `S2A_INFO` packet.
///
/// Trailing extra-data fields (port, SteamID, keywords) are ignored.
pub fn parse_info(packet: &[u8]) -> Result<InfoResponse> {
    let mut reader = PacketReader::new(packet);

    if reader.take(4)? != SIMPLE_HEADER {
        return Err(Error::Protocol("A2S reply is not a single-packet response".to_string()));
    }
    let kind = reader.u8()?;
    if kind != S2A_INFO {
        return Err(Error::Protocol(format!("Unexpected A2S reply type 0x{:02X}", kind)));
    }

    Ok(InfoResponse {
        protocol: reader.u8()?,
        name: reader.cstring()?,
        map: reader.cstring()?,
        folder: reader.cstring()?,
        game: reader.cstring()?,
        app_id: reader.u16_le()?,
        players: reader.u8()?,
        max_players: reader.u8()?,
        bots: reader.u8()?,
        server_type: reader.u8()?,
        environment: reader.u8()?,
        password_protected: reader.u8()? != 0,
        vac: reader.u8()? != 0,
        version: reader.cstring()?,
    })
}

struct PacketReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> PacketReader<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    fn take(&mut self, len: usize) -> Result<&'a [u8]> {
        let end = self.pos + len;
        let slice = self
            .data
            .get(self.pos..end)
            .ok_or_else(|| Error::Protocol("Truncated A2S reply".to_string()))?;
        self.pos = end;
        Ok(slice)
    }

    fn u8(&mut self) -> Result<u8> {
        Ok(self.take(1)?[0])
    }

    fn u16_le(&mut self) -> Result<u16> {
        let bytes = self.take(2)?;
        Ok(u16::from_le_bytes([bytes[0], bytes[1]]))
    }

    fn cstring(&mut self) -> Result<String> {
        let rest = &self.data[self.pos..];
        let len = rest
            .iter()
            .position(|&b| b == 0)
            .ok_or_else(|| Error::Protocol("Unterminated string in A2S reply".to_string()))?;
        let value = String::from_utf8_lossy(&rest[..len]).into_owned();
        self.pos += len + 1;
        Ok(value)
    }
}
