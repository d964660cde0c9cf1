//! Identifier newtypes shared across the framework.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::AuthorityError;

/// Base of the TCP port range used by X display servers: display *n*
/// listens on `6000 + n`.
const X_TCP_PORT_BASE: u16 = 6000;

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// A unique identifier for a seat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SeatId(pub u64);

impl fmt::Display for SeatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "seat-{}", self.0)
    }
}

/// A unique identifier for a display owned by a seat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DisplayId(pub u64);

impl fmt::Display for DisplayId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "dpy-{}", self.0)
    }
}

/// A unique identifier for a negotiated remote-login session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(pub u64);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sess-{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// DisplayNumber
// ---------------------------------------------------------------------------

/// An X display number, as in the `:5` of `10.0.0.7:5`.
///
/// The number is assigned during negotiation and baked into the
/// [`Authority`](crate::Authority); everything downstream (endpoint
/// resolution, the connection setup) derives from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DisplayNumber(pub u16);

impl DisplayNumber {
    /// The TCP port this display listens on (`6000 + n`).
    pub fn port(self) -> u16 {
        X_TCP_PORT_BASE + self.0
    }

    /// Returns the raw display number.
    pub fn into_inner(self) -> u16 {
        self.0
    }
}

impl fmt::Display for DisplayNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, ":{}", self.0)
    }
}

impl FromStr for DisplayNumber {
    type Err = AuthorityError;

    /// Parses `"5"` or the conventional `":5"` form.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.strip_prefix(':').unwrap_or(s);
        digits
            .parse::<u16>()
            .map(DisplayNumber)
            .map_err(|_| AuthorityError::InvalidDisplayNumber(s.to_string()))
    }
}

// =========================================================================
// Tests
// =========================================================================
