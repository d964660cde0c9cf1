//! Error types for the display layer.

use std::time::Duration;

use crate::DisplayState;

/// Errors raised while provisioning a display for a seat.
///
/// Provisioning failures are terminal for the seat: the framework decides
/// whether to retry the whole session.
#[derive(Debug, thiserror::Error)]
pub enum ProvisioningError {
    /// The authority's bind address could not be resolved.
    #[error("failed to resolve display host {host:?}: {source}")]
    AddressResolution {
        host: String,
        #[source]
        source: std::io::Error,
    },

    /// Resolution succeeded but produced no usable socket address.
    #[error("display host {0:?} resolved to no usable address")]
    NoUsableAddress(String),

    /// The seat was stopped while provisioning was in flight.
    #[error("provisioning cancelled by seat shutdown")]
    Cancelled,
}

/// Errors from driving a display's lifecycle.
#[derive(Debug, thiserror::Error)]
pub enum DisplayError {
    /// The requested lifecycle step is not valid from the current state.
    /// The display's status is unchanged.
    #[error("invalid display transition: {from} -> {to}")]
    InvalidTransition {
        from: DisplayState,
        to: DisplayState,
    },

    /// The remote display server could not be reached or rejected us.
    #[error("failed to reach the remote display server: {0}")]
    Connect(#[from] ConnectError),
}

/// Errors on the server link itself (the connector seam).
#[derive(Debug, thiserror::Error)]
pub enum ConnectError {
    /// The TCP connection could not be established.
    #[error("connection refused: {0}")]
    Refused(#[source] std::io::Error),

    /// The connection attempt exceeded the configured timeout.
    #[error("connection timed out after {0:?}")]
    Timeout(Duration),

    /// The server answered the connection setup with a failure.
    #[error("connection setup rejected by server: {0}")]
    Rejected(String),

    /// The link failed mid-flight.
    #[error("i/o failure on the server link: {0}")]
    Io(#[source] std::io::Error),

    /// The server closed the connection.
    #[error("server closed the connection")]
    Closed,
}
