//! The handover registry: negotiated sessions waiting for a seat.

use std::collections::HashMap;

use narthex_authority::SessionId;

use crate::{SessionError, XdmcpSession};

/// What the registry knows about a session id.
///
/// Once claimed, only the marker stays behind; the session itself has
/// moved to its seat. Keeping the marker lets a double claim be reported as
/// misuse rather than "not found".
enum Slot {
    Ready(XdmcpSession),
    Claimed,
}

/// Holds finished negotiations until the seat framework picks them up.
///
/// Not thread-safe by itself: like the rest of the session layer it is
/// owned by a single task and accessed serially.
#[derive(Default)]
pub struct SessionRegistry {
    slots: HashMap<SessionId, Slot>,
}

impl SessionRegistry {
    /// Creates a new, empty registry.
    pub fn new() -> Self {
        Self {
            slots: HashMap::new(),
        }
    }

    /// Registers a freshly negotiated session.
    ///
    /// # Errors
    /// Returns [`SessionError::Duplicate`] if the id is already known
    /// (ready or claimed).
    pub fn register(&mut self, session: XdmcpSession) -> Result<(), SessionError> {
        let id = session.id();
        if self.slots.contains_key(&id) {
            return Err(SessionError::Duplicate(id));
        }
        self.slots.insert(id, Slot::Ready(session));
        tracing::info!(session = %id, "session registered");
        Ok(())
    }

    /// Hands a session over to its seat. Consumes the stored session, so
    /// each session is claimable exactly once.
    ///
    /// # Errors
    /// - [`SessionError::NotFound`] — the id was never registered (or was
    ///   forgotten).
    /// - [`SessionError::AlreadyClaimed`] — a seat already took this
    ///   session.
    pub fn claim(&mut self, id: SessionId) -> Result<XdmcpSession, SessionError> {
        let slot = self
            .slots
            .get_mut(&id)
            .ok_or(SessionError::NotFound(id))?;
        // Replacing Claimed with Claimed is harmless, so take first and
        // sort out which case it was afterwards.
        match std::mem::replace(slot, Slot::Claimed) {
            Slot::Ready(session) => {
                tracing::info!(session = %id, "session claimed by seat framework");
                Ok(session)
            }
            Slot::Claimed => Err(SessionError::AlreadyClaimed(id)),
        }
    }

    /// Drops all record of a session, claimed or not. Called when the
    /// remote client disconnects for good.
    pub fn forget(&mut self, id: SessionId) {
        if self.slots.remove(&id).is_some() {
            tracing::info!(session = %id, "session forgotten");
        }
    }

    /// Number of sessions the registry still tracks (ready or claimed).
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Number of sessions still waiting to be claimed.
    pub fn ready_count(&self) -> usize {
        self.slots
            .values()
            .filter(|slot| matches!(slot, Slot::Ready(_)))
            .count()
    }
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use narthex_authority::{Authority, DisplayNumber};

    fn session(id: u64) -> XdmcpSession {
        let number = DisplayNumber(id as u16);
        XdmcpSession::new(
            SessionId(id),
            number,
            Authority::generate(number, "10.0.0.7"),
        )
    }

    #[test]
    fn test_register_then_claim_hands_over_the_session() {
        let mut registry = SessionRegistry::new();
        registry.register(session(1)).unwrap();

        let claimed = registry.claim(SessionId(1)).expect("should hand over");
        assert_eq!(claimed.id(), SessionId(1));
        assert_eq!(registry.ready_count(), 0);
        assert_eq!(registry.len(), 1, "claim marker stays behind");
    }

    #[test]
    fn test_claim_twice_is_rejected_as_misuse() {
        let mut registry = SessionRegistry::new();
        registry.register(session(1)).unwrap();
        registry.claim(SessionId(1)).unwrap();

        let second = registry.claim(SessionId(1));
        assert!(matches!(
            second,
            Err(SessionError::AlreadyClaimed(SessionId(1)))
        ));
    }

    #[test]
    fn test_claim_unknown_session_is_not_found() {
        let mut registry = SessionRegistry::new();
        assert!(matches!(
            registry.claim(SessionId(9)),
            Err(SessionError::NotFound(SessionId(9)))
        ));
    }

    #[test]
    fn test_register_duplicate_id_is_rejected() {
        let mut registry = SessionRegistry::new();
        registry.register(session(1)).unwrap();
        assert!(matches!(
            registry.register(session(1)),
            Err(SessionError::Duplicate(SessionId(1)))
        ));
    }

    #[test]
    fn test_forget_removes_claimed_and_ready_sessions() {
        let mut registry = SessionRegistry::new();
        registry.register(session(1)).unwrap();
        registry.register(session(2)).unwrap();
        registry.claim(SessionId(1)).unwrap();

        registry.forget(SessionId(1));
        registry.forget(SessionId(2));
        assert!(registry.is_empty());

        // Forgetting something unknown is a no-op.
        registry.forget(SessionId(3));
    }

    #[test]
    fn test_forgotten_session_can_be_renegotiated() {
        // After a client disconnects and renegotiates, the same id may be
        // registered again.
        let mut registry = SessionRegistry::new();
        registry.register(session(1)).unwrap();
        registry.claim(SessionId(1)).unwrap();
        registry.forget(SessionId(1));

        registry.register(session(1)).expect("fresh negotiation");
        assert_eq!(registry.ready_count(), 1);
    }
}
