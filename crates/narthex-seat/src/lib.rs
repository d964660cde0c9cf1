//! Seat lifecycle management for Narthex.
//!
//! A *seat* is one unit of interactive login access: it owns zero or more
//! displays and mediates their lifecycle. Each seat runs as an isolated
//! Tokio task (actor model); the owning task serializes every lifecycle
//! call, which is what makes the one-logical-owner rule hold without locks.
//!
//! # Key types
//!
//! - [`SessionBoundSeat`] — the seat variant permanently bound to one
//!   negotiated remote session; supplies the provisioning algorithm
//! - [`SeatVariant`] — the closed set of seat variants
//! - [`SeatHandle`] — send lifecycle commands to a running seat actor
//! - [`SeatState`] — lifecycle state machine
//! - [`SeatEvent`] — what seats report upward (state changes, display
//!   status changes)
//! - [`SeatConfig`] — actor settings (channel sizing)

mod config;
mod error;
mod event;
mod seat;
mod session_bound;
mod variant;

pub use config::{SeatConfig, SeatState};
pub use error::SeatError;
pub use event::{SeatEvent, SeatEventReceiver, SeatEventSender, seat_event_channel};
pub use seat::{SeatHandle, SeatInfo, spawn_seat};
pub use session_bound::SessionBoundSeat;
pub use variant::SeatVariant;
