//! The closed set of seat variants.

use narthex_authority::{Authority, DisplayId, SeatId};
use narthex_display::{DisplayEventSender, RemoteDisplay};

use crate::{SeatError, SessionBoundSeat};

/// A seat variant supplies the provisioning algorithm; the generic seat
/// machinery owns everything else (display ownership, lifecycle, events).
///
/// This is a closed sum type rather than an open trait object: the set of
/// seat kinds is a design decision of the framework, not an extension
/// point. A local-display variant would slot in as a second arm.
#[derive(Debug)]
pub enum SeatVariant {
    /// Bound to one pre-negotiated remote session.
    SessionBound(SessionBoundSeat),
}

impl SeatVariant {
    /// Short name for logging and introspection.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::SessionBound(_) => "session-bound",
        }
    }

    /// Whether a provisioning request would be accepted right now.
    pub fn may_provision(&self) -> bool {
        match self {
            Self::SessionBound(seat) => !seat.has_provisioned(),
        }
    }

    /// The credential displays of this seat authenticate with.
    pub fn authority(&self) -> &Authority {
        match self {
            Self::SessionBound(seat) => seat.authority(),
        }
    }

    /// Runs the variant's provisioning algorithm.
    pub(crate) async fn provision(
        &mut self,
        seat: SeatId,
        display_id: DisplayId,
        events: DisplayEventSender,
    ) -> Result<RemoteDisplay, SeatError> {
        match self {
            Self::SessionBound(inner) => inner.provision(seat, display_id, events).await,
        }
    }

    /// Releases variant-owned resources on seat teardown.
    pub(crate) fn shutdown(&mut self) {
        match self {
            Self::SessionBound(inner) => inner.shutdown(),
        }
    }
}

impl From<SessionBoundSeat> for SeatVariant {
    fn from(seat: SessionBoundSeat) -> Self {
        Self::SessionBound(seat)
    }
}
