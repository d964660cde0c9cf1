//! The authority credential issued by negotiation.

use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::DisplayNumber;

/// Length in bytes of a generated authorization secret (128 bits, the
/// MIT-MAGIC-COOKIE-1 cookie size).
pub const SECRET_LEN: usize = 16;

// ---------------------------------------------------------------------------
// Secret
// ---------------------------------------------------------------------------

/// The shared secret half of an [`Authority`]: opaque bytes that the display
/// server also holds, presented during connection setup.
///
/// `Debug` deliberately prints only the length; secrets must never end up
/// in logs.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Secret(Vec<u8>);

impl Secret {
    /// Wraps existing secret bytes (e.g. received during negotiation).
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    /// Mints a fresh random secret of [`SECRET_LEN`] bytes.
    pub fn generate() -> Self {
        let bytes: [u8; SECRET_LEN] = rand::rng().random();
        Self(bytes.to_vec())
    }

    /// The raw secret bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Secret(<{} bytes>)", self.0.len())
    }
}

// ---------------------------------------------------------------------------
// Authority
// ---------------------------------------------------------------------------

/// The credential authorizing connection to one remote display server.
///
/// Issued by the negotiation subsystem once a remote login is accepted, and
/// owned by the negotiated session from then on. An authority is immutable:
/// there are no setters, and downstream components (server handles,
/// displays) only ever borrow it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Authority {
    display_number: DisplayNumber,
    secret: Secret,
    bind_address: String,
}

impl Authority {
    /// Builds an authority from negotiated parts. `bind_address` is the
    /// host the display server is reachable at: an IP literal or a name
    /// to be resolved at provisioning time.
    pub fn new(
        display_number: DisplayNumber,
        bind_address: impl Into<String>,
        secret: Secret,
    ) -> Self {
        Self {
            display_number,
            secret,
            bind_address: bind_address.into(),
        }
    }

    /// Builds an authority with a freshly minted random secret.
    pub fn generate(
        display_number: DisplayNumber,
        bind_address: impl Into<String>,
    ) -> Self {
        Self::new(display_number, bind_address, Secret::generate())
    }

    /// The display number this credential is bound to.
    pub fn display_number(&self) -> DisplayNumber {
        self.display_number
    }

    /// The host the display server is reachable at.
    pub fn bind_address(&self) -> &str {
        &self.bind_address
    }

    /// The shared secret.
    pub fn secret(&self) -> &Secret {
        &self.secret
    }
}

// =========================================================================
// Tests
// =========================================================================
