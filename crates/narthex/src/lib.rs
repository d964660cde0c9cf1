//! # Narthex
//!
//! Seat and display management for a remote-login session manager.
//!
//! Narthex sits between a remote-login negotiation subsystem and the
//! display servers it grants access to. Each completed negotiation yields
//! a session owning an authority credential; Narthex binds that session to
//! a *seat*, provisions a *display* backed by the remote server the
//! credential names, and supervises the display's lifecycle until the
//! session ends.
//!
//! ```text
//! negotiation ──XdmcpSession──▶ SessionRegistry ──claim──▶ SeatManager
//!                                                              │
//!                                           one actor per seat │
//!                                                              ▼
//!                                    SessionBoundSeat ─▶ RemoteDisplay
//!                                                              │
//!                                                  ServerConnector (TCP)
//! ```
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use narthex::prelude::*;
//!
//! # async fn run() -> Result<(), NarthexError> {
//! let mut registry = SessionRegistry::new();
//! // ... negotiation registers sessions ...
//! let session = registry.claim(SessionId(1))?;
//!
//! let mut manager = SeatManager::new(TcpConnector::default());
//! let seat = manager.add_session(session);
//! manager.bring_up(seat).await?;
//!
//! while let Some(event) = manager.next_event().await {
//!     println!("{event:?}");
//! }
//! # Ok(())
//! # }
//! ```

mod error;
mod manager;

pub use error::NarthexError;
pub use manager::SeatManager;

pub use narthex_authority::{
    Authority, DisplayId, DisplayNumber, SeatId, Secret, SessionId,
};
pub use narthex_display::{
    ConnectError, DisplayError, DisplayEvent, DisplayState, ProvisioningError,
    RemoteDisplay, RemoteEndpoint, ServerConnector, ServerLink, TcpConnector,
    TcpConnectorConfig,
};
pub use narthex_seat::{
    SeatConfig, SeatError, SeatEvent, SeatHandle, SeatInfo, SeatState, SeatVariant,
    SessionBoundSeat,
};
pub use narthex_session::{SessionError, SessionRegistry, XdmcpSession};

/// The most common imports in one place.
pub mod prelude {
    pub use crate::{
        Authority, DisplayNumber, NarthexError, SeatEvent, SeatManager, SeatState,
        Secret, SessionId, SessionRegistry, TcpConnector, XdmcpSession,
    };
}
