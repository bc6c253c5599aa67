/// Error handling module for srcds-restarter.
///
/// This module defines the error types used throughout the library.
/// Probe failures never leave the probe adapters as errors: they are
/// converted into [`ProbeResult`](crate::probe::ProbeResult) variants. The
/// errors below are what the protocol clients, discovery, configuration and
/// restart layers report.
///
/// # Example
///
/// ```
/// use srcds_restarter::error::{Error, Result};
///
/// fn handle_error(result: Result<()>) {
///     match result {
///         Ok(_) => println!("Run completed"),
///         Err(Error::Discovery(msg)) => println!("No servers to poll: {}", msg),
///         Err(Error::ConfigInvalid(msg)) => println!("Bad configuration: {}", msg),
///         Err(e) => println!("Other error: {}", e),
///     }
/// }
/// ```
use thiserror::Error;

/// Errors that can occur in the srcds-restarter library.
///
/// Each variant carries a human-readable context string.
#[derive(Error, Debug)]
pub enum Error {
    /// Failed to read or parse the configuration file.
    ///
    /// This error occurs when:
    /// - The file cannot be read
    /// - The configuration JSON is malformed
    /// - Field types are incorrect
    #[error("Failed to parse configuration: {0}")]
    ConfigParse(String),

    /// Configuration parsed but contains invalid values.
    ///
    /// This error occurs when:
    /// - A server has an empty name or port 0
    /// - Two servers share a name
    /// - The probe timeout or concurrency is zero
    /// - A server list handed to the runner repeats a name
    #[error("Invalid configuration: {0}")]
    ConfigInvalid(String),

    /// The server inventory could not be enumerated.
    ///
    /// This is the only fatal condition of a run: the discovery source is
    /// unreadable or yielded no servers at all.
    #[error("Discovery failed: {0}")]
    Discovery(String),

    /// A network operation did not complete in time.
    #[error("Timeout: {0}")]
    Timeout(String),

    /// The remote end actively refused the connection.
    #[error("Connection refused: {0}")]
    ConnectionRefused(String),

    /// The remote end answered with something that is not a valid
    /// response for the protocol.
    ///
    /// This error occurs when:
    /// - A packet is truncated or has an unexpected header
    /// - The connection is closed mid-response
    /// - Any other I/O failure not covered above
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// RCON authentication was rejected by the server.
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// The restart command could not be launched.
    #[error("Restart process error: {0}")]
    Process(String),
}

impl Error {
    /// Classifies an I/O error raised while talking to `address`.
    pub(crate) fn from_io(address: &str, err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::ConnectionRefused => Error::ConnectionRefused(address.to_string()),
            std::io::ErrorKind::TimedOut | std::io::ErrorKind::WouldBlock => {
                Error::Timeout(format!("{}: {}", address, err))
            }
            _ => Error::Protocol(format!("{}: {}", address, err)),
        }
    }
}

/// Result type for srcds-restarter operations.
pub type Result<T> = std::result::Result<T, Error>;
