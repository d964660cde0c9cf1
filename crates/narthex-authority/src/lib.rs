//! Identity and credential types for Narthex.
//!
//! This crate defines the types every other layer agrees on:
//!
//! - **Ids** ([`SeatId`], [`DisplayId`], [`SessionId`]) — newtype
//!   identifiers for the entities the framework tracks.
//! - **[`DisplayNumber`]** — an X display number, with its TCP port
//!   convention (display *n* listens on port 6000 + *n*).
//! - **[`Authority`]** — the credential issued by negotiation: a display
//!   number, an opaque [`Secret`], and the address of the display server
//!   the secret is good for. Immutable once issued.
//!
//! The credential layer sits below everything else. It knows nothing about
//! sessions, seats, or displays; it only names them.

mod authority;
mod error;
mod types;

pub use authority::{Authority, Secret, SECRET_LEN};
pub use error::AuthorityError;
pub use types::{DisplayId, DisplayNumber, SeatId, SessionId};
