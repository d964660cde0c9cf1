//! Remote server endpoints and the provisioning-time handle.

use std::fmt;
use std::net::SocketAddr;

use narthex_authority::{Authority, DisplayNumber};

use crate::ProvisioningError;

// ---------------------------------------------------------------------------
// RemoteEndpoint
// ---------------------------------------------------------------------------

/// A resolved remote display server endpoint: the socket address plus the
/// display number it serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RemoteEndpoint {
    address: SocketAddr,
    display_number: DisplayNumber,
}

impl RemoteEndpoint {
    pub fn new(address: SocketAddr, display_number: DisplayNumber) -> Self {
        Self {
            address,
            display_number,
        }
    }

    pub fn address(&self) -> SocketAddr {
        self.address
    }

    pub fn display_number(&self) -> DisplayNumber {
        self.display_number
    }
}

impl fmt::Display for RemoteEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.address, self.display_number)
    }
}

/// Resolves an authority's bind address into a [`RemoteEndpoint`].
///
/// This is the only network I/O provisioning performs. The display number's
/// TCP port convention (6000 + n) picks the port.
///
/// # Errors
/// - [`ProvisioningError::AddressResolution`] — lookup failed outright
/// - [`ProvisioningError::NoUsableAddress`] — lookup yielded nothing
pub async fn resolve_endpoint(
    host: &str,
    display_number: DisplayNumber,
) -> Result<RemoteEndpoint, ProvisioningError> {
    let port = display_number.port();
    let mut addrs = tokio::net::lookup_host((host, port)).await.map_err(|source| {
        ProvisioningError::AddressResolution {
            host: host.to_string(),
            source,
        }
    })?;

    let address = addrs
        .next()
        .ok_or_else(|| ProvisioningError::NoUsableAddress(host.to_string()))?;

    Ok(RemoteEndpoint::new(address, display_number))
}

// ---------------------------------------------------------------------------
// RemoteServerHandle
// ---------------------------------------------------------------------------

/// A short-lived descriptor of one remote display server, built fresh on
/// every provisioning pass.
///
/// The handle borrows the session's [`Authority`]: it never copies the
/// secret and cannot outlive the session. It exists only long enough to be
/// consumed by [`RemoteDisplay::adopt`](crate::RemoteDisplay::adopt); if
/// provisioning fails after the handle is built, dropping it releases
/// everything and leaves the authority untouched.
pub struct RemoteServerHandle<'a> {
    endpoint: RemoteEndpoint,
    authority: &'a Authority,
}

impl<'a> RemoteServerHandle<'a> {
    pub fn new(endpoint: RemoteEndpoint, authority: &'a Authority) -> Self {
        Self {
            endpoint,
            authority,
        }
    }

    pub fn endpoint(&self) -> RemoteEndpoint {
        self.endpoint
    }

    pub fn authority(&self) -> &'a Authority {
        self.authority
    }
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use narthex_authority::Secret;

    #[tokio::test]
    async fn test_resolve_endpoint_maps_display_number_to_port() {
        let endpoint = resolve_endpoint("10.0.0.7", DisplayNumber(5))
            .await
            .expect("ip literal resolves without dns");
        assert_eq!(endpoint.address(), "10.0.0.7:6005".parse().unwrap());
        assert_eq!(endpoint.display_number(), DisplayNumber(5));
    }

    #[tokio::test]
    async fn test_resolve_endpoint_display_zero() {
        let endpoint = resolve_endpoint("127.0.0.1", DisplayNumber(0))
            .await
            .unwrap();
        assert_eq!(endpoint.address().port(), 6000);
    }

    #[test]
    fn test_handle_borrows_the_authority() {
        let authority = Authority::new(
            DisplayNumber(5),
            "10.0.0.7",
            Secret::new(b"abc".to_vec()),
        );
        let endpoint =
            RemoteEndpoint::new("10.0.0.7:6005".parse().unwrap(), DisplayNumber(5));

        let handle = RemoteServerHandle::new(endpoint, &authority);
        assert_eq!(handle.endpoint(), endpoint);
        assert!(std::ptr::eq(handle.authority(), &authority));
    }

    #[test]
    fn test_endpoint_display_format() {
        let endpoint =
            RemoteEndpoint::new("10.0.0.7:6005".parse().unwrap(), DisplayNumber(5));
        assert_eq!(endpoint.to_string(), "10.0.0.7:6005 (:5)");
    }
}
