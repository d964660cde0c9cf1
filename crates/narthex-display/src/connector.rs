//! The connector seam: how a display reaches its remote server.
//!
//! [`ServerConnector`] and [`ServerLink`] abstract the actual connection
//! machinery away from the display lifecycle, so tests can drive a display
//! without a network and a future variant could speak a different
//! transport. [`TcpConnector`] is the bundled implementation: a plain TCP
//! connection to the display's port carrying the X connection-setup
//! exchange, authenticated with the authority's secret. Everything past
//! setup belongs to the X client library driving the login surface, not to
//! this crate.

use std::future::Future;
use std::time::Duration;

use narthex_authority::Authority;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time;

use crate::{ConnectError, RemoteEndpoint};

/// The authorization protocol name presented during connection setup.
const AUTH_PROTOCOL_NAME: &str = "MIT-MAGIC-COOKIE-1";

// ---------------------------------------------------------------------------
// Traits
// ---------------------------------------------------------------------------

/// Establishes links to remote display servers.
pub trait ServerConnector: Send + Sync + 'static {
    /// The link type produced by this connector.
    type Link: ServerLink;

    /// Connects to the endpoint, authenticating with the given authority.
    ///
    /// The authority is borrowed for the duration of the call only; links
    /// do not retain credentials.
    fn connect(
        &self,
        endpoint: &RemoteEndpoint,
        authority: &Authority,
    ) -> impl Future<Output = Result<Self::Link, ConnectError>> + Send;
}

/// A single established link to a remote display server.
pub trait ServerLink: Send + 'static {
    /// Resolves when the remote end goes away, with the reason. Used by the
    /// display's monitor task to detect endpoint loss.
    fn closed(&mut self) -> impl Future<Output = ConnectError> + Send;

    /// Closes the link and releases its resources. Must be safe to call
    /// after `closed` has resolved.
    fn shutdown(&mut self) -> impl Future<Output = ()> + Send;
}

// ---------------------------------------------------------------------------
// TcpConnector
// ---------------------------------------------------------------------------

/// Configuration for [`TcpConnector`].
#[derive(Debug, Clone)]
pub struct TcpConnectorConfig {
    /// How long to wait for the TCP connection to come up.
    pub connect_timeout: Duration,

    /// Whether to disable Nagle's algorithm on the link.
    pub nodelay: bool,
}

impl Default for TcpConnectorConfig {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            nodelay: true,
        }
    }
}

/// The stock [`ServerConnector`]: TCP plus the X connection-setup exchange.
#[derive(Debug, Default, Clone)]
pub struct TcpConnector {
    config: TcpConnectorConfig,
}

impl TcpConnector {
    pub fn new(config: TcpConnectorConfig) -> Self {
        Self { config }
    }
}

impl ServerConnector for TcpConnector {
    type Link = TcpLink;

    async fn connect(
        &self,
        endpoint: &RemoteEndpoint,
        authority: &Authority,
    ) -> Result<TcpLink, ConnectError> {
        let connect = TcpStream::connect(endpoint.address());
        let stream = match time::timeout(self.config.connect_timeout, connect).await {
            Ok(Ok(stream)) => stream,
            Ok(Err(e)) => return Err(ConnectError::Refused(e)),
            Err(_) => return Err(ConnectError::Timeout(self.config.connect_timeout)),
        };

        if self.config.nodelay {
            // Best effort; a link that can't set it still works.
            let _ = stream.set_nodelay(true);
        }

        let mut link = TcpLink { stream };
        link.setup(authority).await?;

        tracing::debug!(%endpoint, "server link established");
        Ok(link)
    }
}

/// A live TCP link to a remote display server.
pub struct TcpLink {
    stream: TcpStream,
}

impl TcpLink {
    /// Performs the connection-setup exchange: send the setup request with
    /// the authority's secret, read the server's verdict.
    async fn setup(&mut self, authority: &Authority) -> Result<(), ConnectError> {
        let request = setup_request(authority.secret().as_bytes());
        self.stream
            .write_all(&request)
            .await
            .map_err(ConnectError::Io)?;

        // Reply prefix: status, reason length (on failure), protocol
        // version, and the length of the additional data in 4-byte units.
        let mut header = [0u8; 8];
        self.stream
            .read_exact(&mut header)
            .await
            .map_err(ConnectError::Io)?;

        match header[0] {
            1 => Ok(()), // success; remaining setup data is the client library's business
            0 => {
                let reason_len = header[1] as usize;
                let additional = u16::from_le_bytes([header[6], header[7]]) as usize * 4;
                let mut data = vec![0u8; additional];
                self.stream
                    .read_exact(&mut data)
                    .await
                    .map_err(ConnectError::Io)?;
                let reason =
                    String::from_utf8_lossy(&data[..reason_len.min(data.len())]).into_owned();
                Err(ConnectError::Rejected(reason))
            }
            _ => Err(ConnectError::Rejected(
                "additional authentication required".to_string(),
            )),
        }
    }
}

impl ServerLink for TcpLink {
    async fn closed(&mut self) -> ConnectError {
        let mut buf = [0u8; 4096];
        loop {
            match self.stream.read(&mut buf).await {
                Ok(0) => return ConnectError::Closed,
                Ok(_) => continue, // drain server-initiated data
                Err(e) => return ConnectError::Io(e),
            }
        }
    }

    async fn shutdown(&mut self) {
        let _ = self.stream.shutdown().await;
    }
}

/// Encodes the little-endian X connection-setup request carrying the
/// MIT-MAGIC-COOKIE-1 secret.
fn setup_request(secret: &[u8]) -> Vec<u8> {
    fn pad(buf: &mut Vec<u8>) {
        while buf.len() % 4 != 0 {
            buf.push(0);
        }
    }

    let name = AUTH_PROTOCOL_NAME.as_bytes();
    let mut buf = Vec::with_capacity(12 + name.len() + secret.len() + 8);
    buf.push(0x6c); // little-endian byte order
    buf.push(0);
    buf.extend_from_slice(&11u16.to_le_bytes()); // protocol major version
    buf.extend_from_slice(&0u16.to_le_bytes()); // protocol minor version
    buf.extend_from_slice(&(name.len() as u16).to_le_bytes());
    buf.extend_from_slice(&(secret.len() as u16).to_le_bytes());
    buf.extend_from_slice(&[0, 0]); // unused
    buf.extend_from_slice(name);
    pad(&mut buf);
    buf.extend_from_slice(secret);
    pad(&mut buf);
    buf
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_setup_request_layout() {
        let request = setup_request(b"abc");

        assert_eq!(request[0], 0x6c);
        assert_eq!(u16::from_le_bytes([request[2], request[3]]), 11);
        assert_eq!(u16::from_le_bytes([request[4], request[5]]), 0);
        // auth name length, auth data length
        assert_eq!(
            u16::from_le_bytes([request[6], request[7]]) as usize,
            AUTH_PROTOCOL_NAME.len()
        );
        assert_eq!(u16::from_le_bytes([request[8], request[9]]), 3);
        // both strings padded to 4-byte boundaries
        assert_eq!(request.len() % 4, 0);
        let name_start = 12;
        let name_end = name_start + AUTH_PROTOCOL_NAME.len();
        assert_eq!(&request[name_start..name_end], AUTH_PROTOCOL_NAME.as_bytes());
    }

    #[test]
    fn test_setup_request_empty_secret() {
        let request = setup_request(b"");
        assert_eq!(u16::from_le_bytes([request[8], request[9]]), 0);
        assert_eq!(request.len() % 4, 0);
    }

    #[test]
    fn test_connector_config_defaults() {
        let config = TcpConnectorConfig::default();
        assert_eq!(config.connect_timeout, Duration::from_secs(10));
        assert!(config.nodelay);
    }
}
