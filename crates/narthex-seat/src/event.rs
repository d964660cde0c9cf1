//! Events seats report upward to the management framework.

use narthex_authority::{DisplayId, SeatId};
use narthex_display::DisplayState;
use tokio::sync::mpsc;

use crate::SeatState;

/// An event emitted by a seat actor on the channel registered when the
/// seat was spawned. The framework uses these to drive session-to-greeter
/// wiring and teardown decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeatEvent {
    /// The seat moved from one lifecycle state to another.
    StateChanged {
        seat: SeatId,
        from: SeatState,
        to: SeatState,
    },

    /// One of the seat's displays changed status. Every transition the
    /// seat observes is forwarded exactly once.
    DisplayStatusChanged {
        seat: SeatId,
        display: DisplayId,
        from: DisplayState,
        to: DisplayState,
    },
}

/// Sender half given to each seat actor at spawn time.
pub type SeatEventSender = mpsc::UnboundedSender<SeatEvent>;

/// Receiver half held by the management framework.
pub type SeatEventReceiver = mpsc::UnboundedReceiver<SeatEvent>;

/// Creates the event channel the framework shares with its seats.
pub fn seat_event_channel() -> (SeatEventSender, SeatEventReceiver) {
    mpsc::unbounded_channel()
}
