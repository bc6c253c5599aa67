use crate::error::{Error, Result};
use crate::server::ServerAddress;
use crate::transport::RconClient;
use async_trait::async_trait;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::TcpStream;

const SERVERDATA_AUTH: i32 = 3;
const SERVERDATA_AUTH_RESPONSE: i32 = 2;
const SERVERDATA_EXECCOMMAND: i32 = 2;
const SERVERDATA_RESPONSE_VALUE: i32 = 0;

const AUTH_ID: i32 = 1;
const COMMAND_ID: i32 = 2;
const SENTINEL_ID: i32 = 3;

// id + type + two terminators
const MIN_PACKET_SIZE: i32 = 10;
const MAX_PACKET_SIZE: i32 = 4096 + MIN_PACKET_SIZE;

/// A Source RCON packet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RconPacket {
    pub id: i32,
    pub kind: i32,
    pub body: String,
}

impl RconPacket {
    pub fn new(id: i32, kind: i32, body: impl Into<String>) -> Self {
        Self {
            id,
            kind,
            body: body.into(),
        }
    }

    /// Serializes the packet, size prefix included.
    pub fn encode(&self) -> Vec<u8> {
        let size = self.body.len() as i32 + MIN_PACKET_SIZE;
        let mut bytes = Vec::with_capacity(size as usize + 4);
        bytes.extend_from_slice(&size.to_le_bytes());
        bytes.extend_from_slice(&self.id.to_le_bytes());
        bytes.extend_from_slice(&self.kind.to_le_bytes());
        bytes.extend_from_slice(self.body.as_bytes());
        bytes.extend_from_slice(&[0, 0]);
        bytes
    }

    /// Reads one packet from `stream`.
    pub async fn read_from<R: AsyncRead + Unpin>(stream: &mut R) -> std::io::Result<Self> {
        let size = stream.read_i32_le().await?;
        if !(MIN_PACKET_SIZE..=MAX_PACKET_SIZE).contains(&size) {
            return Err(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!("invalid RCON packet size {}", size),
            ));
        }

        let mut payload = vec![0u8; size as usize];
        stream.read_exact(&mut payload).await?;

        let id = i32::from_le_bytes([payload[0], payload[1], payload[2], payload[3]]);
        let kind = i32::from_le_bytes([payload[4], payload[5], payload[6], payload[7]]);
        let body = &payload[8..];
        let end = body.iter().position(|&b| b == 0).unwrap_or(body.len());

        Ok(Self {
            id,
            kind,
            body: String::from_utf8_lossy(&body[..end]).into_owned(),
        })
    }
}

/// Source RCON client over TCP.
///
/// Each call opens its own connection, authenticates and runs a single
/// command, so concurrent calls against different servers share nothing.
/// Timeouts are imposed by the caller.
#[derive(Debug, Clone, Copy, Default)]
pub struct SourceRconClient;

impl SourceRconClient {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl RconClient for SourceRconClient {
    async fn execute(&self, address: &ServerAddress, password: &str, command: &str) -> Result<String> {
        let target = address.to_string();
        let mut stream = TcpStream::connect((address.host.as_str(), address.port))
            .await
            .map_err(|e| Error::from_io(&target, e))?;

        run_command(&mut stream, password, command)
            .await
            .map_err(|e| match e {
                SessionError::Io(e) => Error::from_io(&target, e),
                SessionError::Rejected => Error::Authentication(target.clone()),
            })
    }
}

enum SessionError {
    Io(std::io::Error),
    Rejected,
}

impl From<std::io::Error> for SessionError {
    fn from(e: std::io::Error) -> Self {
        SessionError::Io(e)
    }
}

/// Authenticates and runs `command` on an established stream.
///
/// The command is followed by an empty `RESPONSE_VALUE` packet; srcds
/// mirrors it back after the last fragment of the command output, which
/// marks the end of a multi-packet response.
async fn run_command<S>(stream: &mut S, password: &str, command: &str) -> std::result::Result<String, SessionError>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    stream
        .write_all(&RconPacket::new(AUTH_ID, SERVERDATA_AUTH, password).encode())
        .await?;

    // srcds sends an empty RESPONSE_VALUE ahead of the AUTH_RESPONSE.
    loop {
        let packet = RconPacket::read_from(stream).await?;
        if packet.kind == SERVERDATA_AUTH_RESPONSE {
            if packet.id == -1 {
                return Err(SessionError::Rejected);
            }
            break;
        }
    }

    let mut request = RconPacket::new(COMMAND_ID, SERVERDATA_EXECCOMMAND, command).encode();
    request.extend(RconPacket::new(SENTINEL_ID, SERVERDATA_RESPONSE_VALUE, "").encode());
    stream.write_all(&request).await?;

    let mut output = String::new();
    loop {
        let packet = RconPacket::read_from(stream).await?;
        match packet.id {
            SENTINEL_ID => break,
            COMMAND_ID => output.push_str(&packet.body),
            other => tracing::trace!(id = other, "Ignoring unexpected RCON packet"),
        }
    }

    Ok(output)
}
