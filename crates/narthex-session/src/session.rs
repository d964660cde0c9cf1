//! The session record produced by a completed remote-login negotiation.

use narthex_authority::{Authority, DisplayNumber, SessionId};

// ---------------------------------------------------------------------------
// ProtocolState
// ---------------------------------------------------------------------------

/// Protocol-side state of a negotiated session.
///
/// Sessions only exist once negotiation has finished, so the machine is
/// small:
///
/// ```text
///   Established ──(client disconnect / seat teardown)──→ Closed
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProtocolState {
    /// The remote client completed negotiation and is waiting to be served.
    Established,
    /// The remote client went away; the session is dead.
    Closed,
}

// ---------------------------------------------------------------------------
// XdmcpSession
// ---------------------------------------------------------------------------

/// The result of a completed remote-login negotiation.
///
/// Owns the [`Authority`] and the display number for the lifetime of the
/// remote client's session. Once claimed by a seat, the seat holds the
/// session by value until teardown; there is no sharing and no
/// reassignment.
#[derive(Debug, Clone)]
pub struct XdmcpSession {
    id: SessionId,
    display_number: DisplayNumber,
    authority: Authority,
    state: ProtocolState,
}

impl XdmcpSession {
    /// Builds a session from negotiated parts.
    ///
    /// The negotiation subsystem guarantees the authority and display
    /// number are valid and stable for the session's lifetime.
    pub fn new(
        id: SessionId,
        display_number: DisplayNumber,
        authority: Authority,
    ) -> Self {
        Self {
            id,
            display_number,
            authority,
            state: ProtocolState::Established,
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    /// The display number negotiated for this session.
    pub fn display_number(&self) -> DisplayNumber {
        self.display_number
    }

    /// The credential this session owns. Borrow it; never copy it out.
    pub fn authority(&self) -> &Authority {
        &self.authority
    }

    pub fn state(&self) -> ProtocolState {
        self.state
    }

    pub fn is_closed(&self) -> bool {
        self.state == ProtocolState::Closed
    }

    /// Marks the session closed. Idempotent.
    pub fn close(&mut self) {
        if self.state != ProtocolState::Closed {
            self.state = ProtocolState::Closed;
            tracing::info!(session = %self.id, "session closed");
        }
    }
}

// =========================================================================
// Tests
// =========================================================================
