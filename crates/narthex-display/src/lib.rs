//! Display lifecycle management for Narthex.
//!
//! A *display* is one runnable display-server surface: something a seat can
//! start, stop, and watch. This crate provides:
//!
//! - [`DisplayState`] — the lifecycle state machine
//! - [`RemoteEndpoint`] / [`RemoteServerHandle`] — where the remote server
//!   lives, and the short-lived, authority-borrowing handle built during
//!   provisioning
//! - [`RemoteDisplay`] — the concrete display backed by a remote X-protocol
//!   endpoint, reporting status changes on a typed channel
//! - [`ServerConnector`] / [`ServerLink`] — the seam to the actual
//!   connection machinery, with [`TcpConnector`] as the bundled
//!   implementation
//!
//! Displays are owned by exactly one seat. Nothing here is thread-safe on
//! its own; the owning seat serializes all calls, and the only concurrent
//! piece, the per-display monitor task, communicates through the status
//! cell and the event channel.

mod connector;
mod display;
mod error;
mod event;
mod server;
mod state;

pub use connector::{
    ServerConnector, ServerLink, TcpConnector, TcpConnectorConfig, TcpLink,
};
pub use display::RemoteDisplay;
pub use error::{ConnectError, DisplayError, ProvisioningError};
pub use event::{DisplayEvent, DisplayEventReceiver, DisplayEventSender, display_event_channel};
pub use server::{RemoteEndpoint, RemoteServerHandle, resolve_endpoint};
pub use state::DisplayState;
