//! The session-bound seat variant: one negotiated session, one display.

use narthex_authority::{Authority, DisplayId, DisplayNumber, SeatId};
use narthex_display::{
    DisplayEventSender, RemoteDisplay, RemoteServerHandle, resolve_endpoint,
};
use narthex_session::XdmcpSession;

use crate::SeatError;

/// A seat permanently bound to exactly one negotiated remote session.
///
/// Construction takes the session by value: the binding can never be
/// absent, shared, or reassigned. The session's authority and display
/// number drive provisioning; the session stays with the seat until
/// teardown closes it.
///
/// The variant owns no policy beyond "one session, one display": the
/// display is provisioned exactly once, and once the latch is set a
/// released display is not replaced; the framework retries by
/// re-negotiating the whole session instead.
#[derive(Debug)]
pub struct SessionBoundSeat {
    session: XdmcpSession,
    provisioned: bool,
}

impl SessionBoundSeat {
    /// Binds a seat to a claimed session for the seat's entire lifetime.
    pub fn new(session: XdmcpSession) -> Self {
        Self {
            session,
            provisioned: false,
        }
    }

    /// The bound session.
    pub fn session(&self) -> &XdmcpSession {
        &self.session
    }

    /// The credential owned by the bound session.
    pub fn authority(&self) -> &Authority {
        self.session.authority()
    }

    /// The display number negotiated for the bound session.
    pub fn display_number(&self) -> DisplayNumber {
        self.session.display_number()
    }

    /// Whether this seat has already provisioned its display.
    pub fn has_provisioned(&self) -> bool {
        self.provisioned
    }

    /// Provisions the one display this seat will ever own.
    ///
    /// Reads the authority and display number from the bound session,
    /// resolves the remote endpoint, builds a [`RemoteServerHandle`]
    /// borrowing the authority, and wraps it into a [`RemoteDisplay`] in
    /// the Stopped state. The handle never escapes this function: on the
    /// success path the display consumes it, and on every failure path it
    /// is dropped before the error surfaces, leaving the authority
    /// untouched.
    ///
    /// # Errors
    /// - [`SeatError::AlreadyProvisioned`] — the seat already provisioned
    ///   its display; no state changes.
    /// - [`SeatError::Provisioning`] — address resolution failed.
    pub async fn provision(
        &mut self,
        seat: SeatId,
        display_id: DisplayId,
        events: DisplayEventSender,
    ) -> Result<RemoteDisplay, SeatError> {
        if self.provisioned {
            return Err(SeatError::AlreadyProvisioned(seat));
        }

        // The session is read-only here; the authority never leaves it.
        let authority = self.session.authority();
        let display_number = self.session.display_number();

        let endpoint =
            resolve_endpoint(authority.bind_address(), display_number).await?;
        let handle = RemoteServerHandle::new(endpoint, authority);

        let display = RemoteDisplay::adopt(display_id, handle, events);

        self.provisioned = true;
        let endpoint = display.endpoint();
        tracing::info!(
            %seat,
            display = %display_id,
            endpoint = %endpoint,
            "display provisioned for bound session"
        );
        Ok(display)
    }

    /// Closes the bound session on seat teardown.
    pub(crate) fn shutdown(&mut self) {
        self.session.close();
    }
}

// =========================================================================
// Tests
// =========================================================================
