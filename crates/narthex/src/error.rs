//! Unified error type for the Narthex framework.

use narthex_authority::SeatId;
use narthex_display::DisplayError;
use narthex_seat::SeatError;
use narthex_session::SessionError;

/// Top-level error that wraps all crate-specific errors.
///
/// When using the `narthex` framework crate, you deal with this single
/// error type instead of importing errors from each sub-crate. The
/// `#[from]` attribute on each variant auto-generates `From` impls, so the
/// `?` operator converts sub-crate errors automatically.
#[derive(Debug, thiserror::Error)]
pub enum NarthexError {
    /// A session-layer error (handover, registry).
    #[error(transparent)]
    Session(#[from] SessionError),

    /// A seat-layer error (provisioning, lifecycle misuse).
    #[error(transparent)]
    Seat(#[from] SeatError),

    /// A display-layer error (lifecycle, connection).
    #[error(transparent)]
    Display(#[from] DisplayError),

    /// The seat id is not managed by this manager.
    #[error("seat {0} is not managed here")]
    UnknownSeat(SeatId),
}
