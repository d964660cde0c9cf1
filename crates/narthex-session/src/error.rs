//! Error types for the session layer.

use narthex_authority::SessionId;

/// Errors that can occur during session handover.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// No session with this id was ever registered.
    #[error("session {0} not found")]
    NotFound(SessionId),

    /// The session was already handed over to a seat. Each negotiated
    /// session is claimable exactly once.
    #[error("session {0} already claimed")]
    AlreadyClaimed(SessionId),

    /// A session with this id is already registered.
    #[error("session {0} already registered")]
    Duplicate(SessionId),
}
