//! The seat actor: an isolated Tokio task that owns one seat.
//!
//! Each seat runs in its own task, communicating with the outside world
//! through an mpsc command channel. The actor owns the seat's displays and
//! its variant outright; the framework above holds only a [`SeatHandle`].
//! Serializing every lifecycle call through one task is what upholds the
//! single-logical-owner rule: no locks, no shared mutable state.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use narthex_authority::{DisplayId, SeatId};
use narthex_display::{
    DisplayEvent, DisplayEventReceiver, DisplayEventSender, DisplayState,
    ProvisioningError, RemoteDisplay, ServerConnector, display_event_channel,
};
use tokio::sync::{mpsc, oneshot};

use crate::{SeatConfig, SeatError, SeatEvent, SeatEventSender, SeatState, SeatVariant};

/// Counter for display ids, unique across all seats in the process.
static NEXT_DISPLAY_ID: AtomicU64 = AtomicU64::new(1);

/// Commands sent to a seat actor through its channel.
pub(crate) enum SeatCommand {
    /// Provision a new display surface for this seat.
    CreateDisplay {
        reply: oneshot::Sender<Result<DisplayId, SeatError>>,
    },

    /// Bring the seat's owned displays up.
    Start {
        reply: oneshot::Sender<Result<(), SeatError>>,
    },

    /// Tear the seat down. Always succeeds; the actor exits afterwards.
    Stop { reply: oneshot::Sender<()> },

    /// Request a snapshot of the seat's metadata.
    GetInfo { reply: oneshot::Sender<SeatInfo> },
}

/// A snapshot of seat metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeatInfo {
    /// The seat's unique id.
    pub seat: SeatId,
    /// Current lifecycle state.
    pub state: SeatState,
    /// Number of displays the seat currently owns.
    pub displays: usize,
}

// ---------------------------------------------------------------------------
// SeatHandle
// ---------------------------------------------------------------------------

/// Handle to a running seat actor. Cheap to clone.
#[derive(Clone)]
pub struct SeatHandle {
    seat_id: SeatId,
    sender: mpsc::Sender<SeatCommand>,
}

impl SeatHandle {
    pub fn seat_id(&self) -> SeatId {
        self.seat_id
    }

    /// Asks the seat to provision a new display. On success the seat has
    /// already adopted the display; the caller gets its id.
    ///
    /// # Errors
    /// - [`SeatError::AlreadyProvisioned`] — the seat already owns its
    ///   display (no state change).
    /// - [`SeatError::Provisioning`] — provisioning failed; the seat is
    ///   now Failed. [`ProvisioningError::Cancelled`] means a stop request
    ///   aborted the work.
    /// - [`SeatError::InvalidState`] / [`SeatError::Unavailable`] — misuse
    ///   or a dead actor.
    pub async fn create_display(&self) -> Result<DisplayId, SeatError> {
        let (tx, rx) = oneshot::channel();
        self.sender
            .send(SeatCommand::CreateDisplay { reply: tx })
            .await
            .map_err(|_| SeatError::Unavailable(self.seat_id))?;
        rx.await.map_err(|_| SeatError::Unavailable(self.seat_id))?
    }

    /// Brings the seat's owned displays up.
    ///
    /// Misuse (wrong state, dead actor) is reported here; a display that
    /// fails to connect is not; that surfaces as status transitions and
    /// the seat going Failed.
    pub async fn start(&self) -> Result<(), SeatError> {
        let (tx, rx) = oneshot::channel();
        self.sender
            .send(SeatCommand::Start { reply: tx })
            .await
            .map_err(|_| SeatError::Unavailable(self.seat_id))?;
        rx.await.map_err(|_| SeatError::Unavailable(self.seat_id))?
    }

    /// Stops the seat and its displays. Idempotent: stopping a seat whose
    /// actor already exited is a no-op.
    pub async fn stop(&self) {
        let (tx, rx) = oneshot::channel();
        if self
            .sender
            .send(SeatCommand::Stop { reply: tx })
            .await
            .is_err()
        {
            return;
        }
        let _ = rx.await;
    }

    /// Requests the current seat metadata.
    pub async fn info(&self) -> Result<SeatInfo, SeatError> {
        let (tx, rx) = oneshot::channel();
        self.sender
            .send(SeatCommand::GetInfo { reply: tx })
            .await
            .map_err(|_| SeatError::Unavailable(self.seat_id))?;
        rx.await.map_err(|_| SeatError::Unavailable(self.seat_id))
    }
}

// ---------------------------------------------------------------------------
// SeatActor
// ---------------------------------------------------------------------------

enum Flow {
    Continue,
    Exit,
}

/// The internal seat actor state. Runs inside a Tokio task.
struct SeatActor<C: ServerConnector> {
    seat_id: SeatId,
    state: SeatState,
    variant: SeatVariant,
    connector: Arc<C>,
    /// Owned displays, ordered by creation.
    displays: Vec<RemoteDisplay>,
    /// Sender handed to each display at construction time.
    display_events_tx: DisplayEventSender,
    display_events: DisplayEventReceiver,
    /// Upward channel to the management framework.
    events: SeatEventSender,
    receiver: mpsc::Receiver<SeatCommand>,
}

impl<C: ServerConnector> SeatActor<C> {
    /// Runs the actor loop, processing commands and display events until
    /// the seat is stopped or every handle is gone.
    async fn run(mut self) {
        tracing::info!(
            seat = %self.seat_id,
            kind = self.variant.kind(),
            "seat actor started"
        );

        loop {
            tokio::select! {
                cmd = self.receiver.recv() => {
                    let flow = match cmd {
                        Some(cmd) => self.handle_command(cmd).await,
                        None => {
                            // Every handle is gone; tear the seat down.
                            self.shut_down().await;
                            Flow::Exit
                        }
                    };
                    if matches!(flow, Flow::Exit) {
                        break;
                    }
                }
                Some(event) = self.display_events.recv() => {
                    self.handle_display_event(event);
                }
            }
        }

        tracing::info!(seat = %self.seat_id, "seat actor stopped");
    }

    async fn handle_command(&mut self, cmd: SeatCommand) -> Flow {
        match cmd {
            SeatCommand::CreateDisplay { reply } => {
                self.handle_create_display(reply).await
            }
            SeatCommand::Start { reply } => {
                let result = self.handle_start().await;
                let _ = reply.send(result);
                Flow::Continue
            }
            SeatCommand::GetInfo { reply } => {
                let _ = reply.send(self.info());
                Flow::Continue
            }
            SeatCommand::Stop { reply } => {
                self.shut_down().await;
                let _ = reply.send(());
                Flow::Exit
            }
        }
    }

    async fn handle_create_display(
        &mut self,
        reply: oneshot::Sender<Result<DisplayId, SeatError>>,
    ) -> Flow {
        if !self.displays.is_empty() || !self.variant.may_provision() {
            let _ = reply.send(Err(SeatError::AlreadyProvisioned(self.seat_id)));
            return Flow::Continue;
        }
        if !matches!(self.state, SeatState::Idle | SeatState::Starting) {
            let _ = reply.send(Err(SeatError::InvalidState(format!(
                "cannot provision a display in state {}",
                self.state
            ))));
            return Flow::Continue;
        }
        if self.state == SeatState::Idle {
            self.set_state(SeatState::Starting);
        }

        let seat_id = self.seat_id;
        let display_id = DisplayId(NEXT_DISPLAY_ID.fetch_add(1, Ordering::Relaxed));
        let events = self.display_events_tx.clone();

        enum Outcome {
            Done(Result<RemoteDisplay, SeatError>),
            Stopped(oneshot::Sender<()>),
            Abandoned,
        }

        // Keep one ear on the command channel while the variant works: a
        // stop request cancels the in-flight provisioning instead of
        // queueing behind it. Anything else arriving mid-flight is
        // rejected, upholding the one-provision-at-a-time rule.
        let outcome = {
            let provision = self.variant.provision(seat_id, display_id, events);
            tokio::pin!(provision);
            loop {
                tokio::select! {
                    result = &mut provision => break Outcome::Done(result),
                    cmd = self.receiver.recv() => match cmd {
                        Some(SeatCommand::Stop { reply }) => {
                            break Outcome::Stopped(reply);
                        }
                        Some(SeatCommand::CreateDisplay { reply }) => {
                            let _ = reply.send(Err(SeatError::InvalidState(
                                "provisioning already in flight".to_string(),
                            )));
                        }
                        Some(SeatCommand::Start { reply }) => {
                            let _ = reply.send(Err(SeatError::InvalidState(
                                "provisioning in flight".to_string(),
                            )));
                        }
                        Some(SeatCommand::GetInfo { reply }) => {
                            let _ = reply.send(SeatInfo {
                                seat: seat_id,
                                state: self.state,
                                displays: self.displays.len(),
                            });
                        }
                        None => break Outcome::Abandoned,
                    },
                }
            }
        };

        match outcome {
            Outcome::Done(Ok(display)) => {
                // The seat adopts the display before its id is handed out.
                self.displays.push(display);
                let _ = reply.send(Ok(display_id));
                Flow::Continue
            }
            Outcome::Done(Err(err)) => {
                tracing::warn!(seat = %seat_id, error = %err, "provisioning failed");
                if !matches!(err, SeatError::AlreadyProvisioned(_)) {
                    self.set_state(SeatState::Failed);
                }
                let _ = reply.send(Err(err));
                Flow::Continue
            }
            Outcome::Stopped(stop_reply) => {
                // The provisioning future was dropped above; if the variant
                // had finished anyway, its display is Stopped and gone.
                let _ = reply.send(Err(SeatError::Provisioning(
                    ProvisioningError::Cancelled,
                )));
                self.shut_down().await;
                let _ = stop_reply.send(());
                Flow::Exit
            }
            Outcome::Abandoned => {
                let _ = reply.send(Err(SeatError::Provisioning(
                    ProvisioningError::Cancelled,
                )));
                self.shut_down().await;
                Flow::Exit
            }
        }
    }

    async fn handle_start(&mut self) -> Result<(), SeatError> {
        match self.state {
            SeatState::Idle | SeatState::Starting => {}
            state => {
                return Err(SeatError::InvalidState(format!(
                    "cannot start seat in state {state}"
                )));
            }
        }
        if self.state == SeatState::Idle {
            self.set_state(SeatState::Starting);
        }

        let connector = Arc::clone(&self.connector);
        let mut start_failed = false;
        {
            let authority = self.variant.authority();
            for display in &mut self.displays {
                if let Err(err) = display.start(connector.as_ref(), authority).await {
                    let display_id = display.id();
                    tracing::warn!(
                        seat = %self.seat_id,
                        display = %display_id,
                        error = %err,
                        "display start failed"
                    );
                    start_failed = true;
                    break;
                }
            }
        }

        if start_failed {
            // The request was well-formed, so the reply stays Ok; the
            // failure surfaces through status transitions.
            self.set_state(SeatState::Failed);
        } else {
            self.set_state(SeatState::Running);
        }
        Ok(())
    }

    fn handle_display_event(&mut self, event: DisplayEvent) {
        let DisplayEvent::StatusChanged { display, from, to } = event;
        let _ = self.events.send(SeatEvent::DisplayStatusChanged {
            seat: self.seat_id,
            display,
            from,
            to,
        });

        // Losing a monitored display fails the seat; whether to retry the
        // session is the framework's call, not ours.
        if to == DisplayState::Failed && self.state.is_active() {
            self.set_state(SeatState::Failed);
        }
    }

    /// Stops every owned display, forwards their final transitions, closes
    /// the variant's resources, and settles the seat state.
    async fn shut_down(&mut self) {
        if !self.state.is_terminal() && self.state != SeatState::Stopping {
            self.set_state(SeatState::Stopping);
        }

        for display in &mut self.displays {
            display.stop().await;
        }
        self.drain_display_events();
        self.displays.clear();
        self.variant.shutdown();

        if self.state == SeatState::Stopping {
            self.set_state(SeatState::Stopped);
        }
    }

    /// Forwards whatever the displays emitted before the actor exits.
    fn drain_display_events(&mut self) {
        while let Ok(event) = self.display_events.try_recv() {
            self.handle_display_event(event);
        }
    }

    fn set_state(&mut self, to: SeatState) {
        let from = self.state;
        // Terminal states (Failed in particular) absorb further changes.
        if from == to || !from.can_transition_to(to) {
            return;
        }
        self.state = to;
        tracing::info!(seat = %self.seat_id, %from, %to, "seat state changed");
        let _ = self.events.send(SeatEvent::StateChanged {
            seat: self.seat_id,
            from,
            to,
        });
    }

    fn info(&self) -> SeatInfo {
        SeatInfo {
            seat: self.seat_id,
            state: self.state,
            displays: self.displays.len(),
        }
    }
}

/// Spawns a new seat actor task and returns a handle to communicate with
/// it.
///
/// `events` is where the seat reports state changes and display status
/// changes; the framework registers it once at spawn time.
pub fn spawn_seat<C: ServerConnector>(
    seat_id: SeatId,
    variant: SeatVariant,
    connector: Arc<C>,
    events: SeatEventSender,
    config: SeatConfig,
) -> SeatHandle {
    let (tx, rx) = mpsc::channel(config.command_channel_size);
    let (display_events_tx, display_events) = display_event_channel();

    let actor = SeatActor {
        seat_id,
        state: SeatState::Idle,
        variant,
        connector,
        displays: Vec::new(),
        display_events_tx,
        display_events,
        events,
        receiver: rx,
    };

    tokio::spawn(actor.run());

    SeatHandle {
        seat_id,
        sender: tx,
    }
}
