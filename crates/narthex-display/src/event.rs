//! Status-change events emitted by displays to their owning seat.

use narthex_authority::DisplayId;
use tokio::sync::mpsc;

use crate::DisplayState;

/// An event emitted by a display (or its monitor task) on the channel its
/// owning seat registered at construction time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayEvent {
    /// The display moved from one lifecycle state to another.
    StatusChanged {
        display: DisplayId,
        from: DisplayState,
        to: DisplayState,
    },
}

/// Sender half given to each display when it is constructed.
pub type DisplayEventSender = mpsc::UnboundedSender<DisplayEvent>;

/// Receiver half held by the owning seat.
pub type DisplayEventReceiver = mpsc::UnboundedReceiver<DisplayEvent>;

/// Creates the status-change channel a seat shares with its displays.
pub fn display_event_channel() -> (DisplayEventSender, DisplayEventReceiver) {
    mpsc::unbounded_channel()
}
