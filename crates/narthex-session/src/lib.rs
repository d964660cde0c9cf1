//! Negotiated remote-login sessions for Narthex.
//!
//! The negotiation subsystem runs the remote-login protocol exchange; what
//! comes out the other end is an [`XdmcpSession`]: a display number and an
//! [`Authority`](narthex_authority::Authority), valid for as long as the
//! remote client stays around.
//!
//! This crate owns two things:
//!
//! 1. **The session record** ([`XdmcpSession`]) — the authority and display
//!    number, plus the protocol-side state (established or closed).
//! 2. **The handover registry** ([`SessionRegistry`]) — negotiation
//!    registers finished sessions here; the seat framework claims them.
//!    A claim consumes the session, so each one is handed over at most
//!    once.
//!
//! # How it fits in the stack
//!
//! ```text
//! Seat layer (above)      ← claims a session, binds a seat to it for life
//!     ↕
//! Session layer (this crate)
//!     ↕
//! Negotiation (below, external)  ← produces sessions, retires them on
//!                                  client disconnect
//! ```

mod error;
mod registry;
mod session;

pub use error::SessionError;
pub use registry::SessionRegistry;
pub use session::{ProtocolState, XdmcpSession};
