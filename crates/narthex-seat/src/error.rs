//! Error types for the seat layer.

use narthex_authority::SeatId;
use narthex_display::ProvisioningError;

/// Errors that can occur during seat operations.
#[derive(Debug, thiserror::Error)]
pub enum SeatError {
    /// A second display was requested on a seat that already provisioned
    /// its one display. Caller misuse; the seat's state is unchanged.
    #[error("seat {0} already provisioned its display")]
    AlreadyProvisioned(SeatId),

    /// Provisioning itself failed; the seat has transitioned to Failed.
    #[error(transparent)]
    Provisioning(#[from] ProvisioningError),

    /// The seat is in a state that doesn't allow this operation.
    #[error("invalid seat state for this operation: {0}")]
    InvalidState(String),

    /// The seat's command channel is closed; the actor has exited.
    #[error("seat {0} is unavailable")]
    Unavailable(SeatId),
}
