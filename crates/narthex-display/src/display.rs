//! The remote display: lifecycle driver plus its monitor task.

use std::sync::{Arc, Mutex, PoisonError};

use narthex_authority::{Authority, DisplayId};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use crate::{
    DisplayError, DisplayEvent, DisplayEventSender, DisplayState, RemoteEndpoint,
    RemoteServerHandle, ServerConnector, ServerLink,
};

// ---------------------------------------------------------------------------
// StatusCell
// ---------------------------------------------------------------------------

/// The display's lifecycle status, shared between the display and its
/// monitor task. All writes go through the state machine's validity table.
#[derive(Clone, Debug)]
struct StatusCell(Arc<Mutex<DisplayState>>);

impl StatusCell {
    fn new() -> Self {
        Self(Arc::new(Mutex::new(DisplayState::Stopped)))
    }

    fn get(&self) -> DisplayState {
        *self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Validated transition; returns the previous state.
    fn advance(&self, to: DisplayState) -> Result<DisplayState, DisplayError> {
        let mut state = self.0.lock().unwrap_or_else(PoisonError::into_inner);
        let from = *state;
        if from.can_transition_to(to) {
            *state = to;
            Ok(from)
        } else {
            Err(DisplayError::InvalidTransition { from, to })
        }
    }

    /// Compare-and-advance: transitions only if the current state is
    /// exactly `from`. Returns whether the transition happened.
    fn advance_if(&self, from: DisplayState, to: DisplayState) -> bool {
        let mut state = self.0.lock().unwrap_or_else(PoisonError::into_inner);
        if *state == from && from.can_transition_to(to) {
            *state = to;
            true
        } else {
            false
        }
    }
}

// ---------------------------------------------------------------------------
// RemoteDisplay
// ---------------------------------------------------------------------------

#[derive(Debug)]
struct Monitor {
    /// Dropping this (or sending on it) tells the monitor to shut the link
    /// down and exit, so an undropped monitor can never outlive its
    /// display.
    stop: oneshot::Sender<()>,
    task: JoinHandle<()>,
}

/// A display backed by a remote X-protocol endpoint.
///
/// Owned exclusively by the seat that provisioned it. The display holds no
/// credentials: the owning seat lends the session's [`Authority`] to
/// [`start`](Self::start) for the duration of the call. While Running, a
/// monitor task watches the link and reports endpoint loss on the status
/// channel registered at construction.
#[derive(Debug)]
pub struct RemoteDisplay {
    id: DisplayId,
    endpoint: RemoteEndpoint,
    status: StatusCell,
    events: DisplayEventSender,
    monitor: Option<Monitor>,
}

impl RemoteDisplay {
    /// Consumes a provisioning-time [`RemoteServerHandle`], taking sole
    /// ownership of the endpoint it described. The authority borrow ends
    /// here. The display starts out Stopped.
    pub fn adopt(
        id: DisplayId,
        handle: RemoteServerHandle<'_>,
        events: DisplayEventSender,
    ) -> Self {
        let endpoint = handle.endpoint();
        tracing::debug!(display = %id, %endpoint, "display adopted");
        Self {
            id,
            endpoint,
            status: StatusCell::new(),
            events,
            monitor: None,
        }
    }

    pub fn id(&self) -> DisplayId {
        self.id
    }

    pub fn endpoint(&self) -> RemoteEndpoint {
        self.endpoint
    }

    /// Current lifecycle status. Pure read.
    pub fn status(&self) -> DisplayState {
        self.status.get()
    }

    /// Brings the display up: Stopped → Starting → Running.
    ///
    /// Establishes the remote connection through `connector`, lending
    /// `authority` for this call only, then hands the link to a monitor
    /// task.
    ///
    /// # Errors
    /// - [`DisplayError::InvalidTransition`] if the display is not Stopped
    ///   (status unchanged).
    /// - [`DisplayError::Connect`] if the server is unreachable or rejects
    ///   the setup; the display is left Failed.
    pub async fn start<C: ServerConnector>(
        &mut self,
        connector: &C,
        authority: &Authority,
    ) -> Result<(), DisplayError> {
        self.transition(DisplayState::Starting)?;

        match connector.connect(&self.endpoint, authority).await {
            Ok(link) => {
                self.transition(DisplayState::Running)?;
                let (stop_tx, stop_rx) = oneshot::channel();
                let task = tokio::spawn(monitor(
                    link,
                    self.id,
                    self.status.clone(),
                    self.events.clone(),
                    stop_rx,
                ));
                self.monitor = Some(Monitor {
                    stop: stop_tx,
                    task,
                });
                Ok(())
            }
            Err(err) => {
                tracing::warn!(display = %self.id, error = %err, "display start failed");
                self.transition(DisplayState::Failed)?;
                Err(DisplayError::Connect(err))
            }
        }
    }

    /// Takes the display down, releasing link resources unconditionally.
    ///
    /// Never errors and always leaves the status Stopped, whatever state
    /// the display was in, including Failed (where the resources are
    /// already gone and only the status is normalized) and Stopped itself
    /// (a no-op).
    pub async fn stop(&mut self) {
        if self.status.get().is_stopped() {
            return;
        }

        // Quiesce the monitor first: after this the link is shut down and
        // no concurrent writer remains.
        self.reap_monitor().await;

        let state = match self.status.get() {
            DisplayState::Stopped => return,
            state @ (DisplayState::Failed | DisplayState::Stopping) => state,
            state => {
                self.step(state, DisplayState::Stopping);
                DisplayState::Stopping
            }
        };
        self.step(state, DisplayState::Stopped);
    }

    /// Validated transition plus notification.
    fn transition(&self, to: DisplayState) -> Result<(), DisplayError> {
        let from = self.status.advance(to)?;
        self.emit(from, to);
        Ok(())
    }

    /// Transition known to be valid on the shutdown path.
    fn step(&self, from: DisplayState, to: DisplayState) {
        if self.status.advance_if(from, to) {
            self.emit(from, to);
        }
    }

    fn emit(&self, from: DisplayState, to: DisplayState) {
        tracing::info!(display = %self.id, %from, %to, "display status changed");
        let _ = self.events.send(DisplayEvent::StatusChanged {
            display: self.id,
            from,
            to,
        });
    }

    async fn reap_monitor(&mut self) {
        if let Some(Monitor { stop, task }) = self.monitor.take() {
            // The monitor may already have exited on a failure; a dead
            // receiver is fine.
            let _ = stop.send(());
            let _ = task.await;
        }
    }
}

/// Watches the link for endpoint loss until told to stop.
async fn monitor<L: ServerLink>(
    mut link: L,
    id: DisplayId,
    status: StatusCell,
    events: DisplayEventSender,
    mut stop: oneshot::Receiver<()>,
) {
    tokio::select! {
        reason = link.closed() => {
            // Only a Running display can fail from endpoint loss; if the
            // owner is already stopping us, stay quiet.
            if status.advance_if(DisplayState::Running, DisplayState::Failed) {
                tracing::warn!(display = %id, %reason, "remote endpoint lost");
                let _ = events.send(DisplayEvent::StatusChanged {
                    display: id,
                    from: DisplayState::Running,
                    to: DisplayState::Failed,
                });
            }
        }
        _ = &mut stop => {}
    }
    link.shutdown().await;
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display_event_channel;
    use narthex_authority::{DisplayNumber, Secret};

    fn display() -> (RemoteDisplay, crate::DisplayEventReceiver) {
        let authority = Authority::new(
            DisplayNumber(5),
            "10.0.0.7",
            Secret::new(b"abc".to_vec()),
        );
        let endpoint =
            RemoteEndpoint::new("10.0.0.7:6005".parse().unwrap(), DisplayNumber(5));
        let handle = RemoteServerHandle::new(endpoint, &authority);
        let (tx, rx) = display_event_channel();
        (RemoteDisplay::adopt(DisplayId(1), handle, tx), rx)
    }

    #[test]
    fn test_adopt_starts_out_stopped() {
        let (display, _rx) = display();
        assert_eq!(display.status(), DisplayState::Stopped);
        assert_eq!(display.id(), DisplayId(1));
        assert_eq!(display.endpoint().display_number(), DisplayNumber(5));
    }

    #[tokio::test]
    async fn test_stop_on_fresh_display_is_a_no_op() {
        let (mut display, mut rx) = display();
        display.stop().await;
        display.stop().await;
        assert_eq!(display.status(), DisplayState::Stopped);
        assert!(rx.try_recv().is_err(), "no transitions, no events");
    }

    #[test]
    fn test_status_cell_rejects_invalid_transition() {
        let cell = StatusCell::new();
        let err = cell.advance(DisplayState::Running).unwrap_err();
        assert!(matches!(
            err,
            DisplayError::InvalidTransition {
                from: DisplayState::Stopped,
                to: DisplayState::Running,
            }
        ));
        assert_eq!(cell.get(), DisplayState::Stopped, "state unchanged");
    }

    #[test]
    fn test_status_cell_advance_if_requires_exact_state() {
        let cell = StatusCell::new();
        assert!(!cell.advance_if(DisplayState::Running, DisplayState::Failed));
        assert!(cell.advance_if(DisplayState::Stopped, DisplayState::Starting));
        assert_eq!(cell.get(), DisplayState::Starting);
    }
}
