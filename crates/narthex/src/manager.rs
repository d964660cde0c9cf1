//! The seat manager: the framework side of the seat contract.
//!
//! Negotiated sessions come in, one seat actor per session goes out. The
//! manager drives provisioning and start-up, consumes the events seats
//! report, and tears seats down when their sessions end. One seat failing
//! never disturbs its siblings: each seat lives in its own task, and the
//! manager's reaction to a failure is scoped to that seat's handle.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use futures_util::future::join_all;
use narthex_authority::{DisplayId, SeatId};
use narthex_display::ServerConnector;
use narthex_seat::{
    SeatConfig, SeatEvent, SeatEventReceiver, SeatEventSender, SeatHandle,
    SeatVariant, SessionBoundSeat, seat_event_channel, spawn_seat,
};
use narthex_session::XdmcpSession;

use crate::NarthexError;

/// Counter for generating unique seat ids.
static NEXT_SEAT_ID: AtomicU64 = AtomicU64::new(1);

/// Manages all active seats and the event stream they report into.
pub struct SeatManager<C: ServerConnector> {
    connector: Arc<C>,
    config: SeatConfig,
    /// Active seats, keyed by seat id.
    seats: HashMap<SeatId, SeatHandle>,
    events_tx: SeatEventSender,
    events: SeatEventReceiver,
}

impl<C: ServerConnector> SeatManager<C> {
    /// Creates a manager with default seat settings.
    pub fn new(connector: C) -> Self {
        Self::with_config(connector, SeatConfig::default())
    }

    pub fn with_config(connector: C, config: SeatConfig) -> Self {
        let (events_tx, events) = seat_event_channel();
        Self {
            connector: Arc::new(connector),
            config,
            seats: HashMap::new(),
            events_tx,
            events,
        }
    }

    /// Binds a claimed session to a fresh seat and spawns its actor.
    /// Returns the new seat's id.
    pub fn add_session(&mut self, session: XdmcpSession) -> SeatId {
        let seat_id = SeatId(NEXT_SEAT_ID.fetch_add(1, Ordering::Relaxed));
        let variant = SeatVariant::from(SessionBoundSeat::new(session));
        let handle = spawn_seat(
            seat_id,
            variant,
            Arc::clone(&self.connector),
            self.events_tx.clone(),
            self.config.clone(),
        );
        self.seats.insert(seat_id, handle);
        tracing::info!(%seat_id, "seat created for negotiated session");
        seat_id
    }

    /// Provisions the seat's display and starts it.
    ///
    /// A provisioning or start failure leaves that one seat Failed and is
    /// returned to the caller; sibling seats are untouched. Whether to
    /// retry the whole session is the caller's decision.
    pub async fn bring_up(&self, seat_id: SeatId) -> Result<DisplayId, NarthexError> {
        let handle = self.handle(seat_id)?;
        let display = handle.create_display().await?;
        handle.start().await?;
        Ok(display)
    }

    /// Stops a seat without forgetting it.
    pub async fn stop_seat(&self, seat_id: SeatId) -> Result<(), NarthexError> {
        self.handle(seat_id)?.stop().await;
        Ok(())
    }

    /// Tears a seat down and forgets it. Called when its session ends.
    pub async fn remove_seat(&mut self, seat_id: SeatId) -> Result<(), NarthexError> {
        let handle = self
            .seats
            .remove(&seat_id)
            .ok_or(NarthexError::UnknownSeat(seat_id))?;
        handle.stop().await;
        tracing::info!(%seat_id, "seat removed");
        Ok(())
    }

    /// The next event any seat reported. Resolves to `None` only once the
    /// manager itself is being dropped.
    pub async fn next_event(&mut self) -> Option<SeatEvent> {
        self.events.recv().await
    }

    /// The handle for a managed seat.
    pub fn handle(&self, seat_id: SeatId) -> Result<&SeatHandle, NarthexError> {
        self.seats
            .get(&seat_id)
            .ok_or(NarthexError::UnknownSeat(seat_id))
    }

    pub fn seat_count(&self) -> usize {
        self.seats.len()
    }

    pub fn seat_ids(&self) -> Vec<SeatId> {
        self.seats.keys().copied().collect()
    }

    /// Stops every seat concurrently and forgets them all.
    pub async fn shutdown(&mut self) {
        let handles: Vec<SeatHandle> = self.seats.drain().map(|(_, h)| h).collect();
        join_all(handles.iter().map(|handle| handle.stop())).await;
        tracing::info!(seats = handles.len(), "all seats stopped");
    }
}
