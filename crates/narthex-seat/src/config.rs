//! Seat configuration and state machine.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// SeatConfig
// ---------------------------------------------------------------------------

/// Configuration for a seat actor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeatConfig {
    /// Size of the bounded command channel between handle and actor.
    pub command_channel_size: usize,
}

impl Default for SeatConfig {
    fn default() -> Self {
        Self {
            command_channel_size: 64,
        }
    }
}

// ---------------------------------------------------------------------------
// SeatState
// ---------------------------------------------------------------------------

/// The lifecycle state of a seat.
///
/// ```text
/// Idle → Starting → Running → Stopping → Stopped
///          │           │
///          └───────────┴──→ Failed
/// ```
///
/// - **Idle**: the seat exists but owns nothing yet.
/// - **Starting**: provisioning and display start-up in progress.
/// - **Running**: the seat's displays are up and serving.
/// - **Stopping**: displays being torn down.
/// - **Stopped**: terminal; the actor has exited.
/// - **Failed**: absorbing; provisioning failed or a monitored display was
///   lost. The framework decides whether to retry the whole session.
///
/// A stop request is valid from every non-terminal state, so Idle and
/// Starting may also step into Stopping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SeatState {
    Idle,
    Starting,
    Running,
    Stopping,
    Stopped,
    Failed,
}

impl SeatState {
    /// Returns `true` for states the seat never leaves.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Stopped | Self::Failed)
    }

    /// Returns `true` while the seat is bringing displays up or serving.
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Starting | Self::Running)
    }

    /// Returns `true` if transitioning to `target` is a valid lifecycle
    /// step.
    pub fn can_transition_to(self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::Idle, Self::Starting)
                | (Self::Idle, Self::Stopping)
                | (Self::Starting, Self::Running)
                | (Self::Starting, Self::Stopping)
                | (Self::Starting, Self::Failed)
                | (Self::Running, Self::Stopping)
                | (Self::Running, Self::Failed)
                | (Self::Stopping, Self::Stopped)
        )
    }
}

impl std::fmt::Display for SeatState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Idle => write!(f, "Idle"),
            Self::Starting => write!(f, "Starting"),
            Self::Running => write!(f, "Running"),
            Self::Stopping => write!(f, "Stopping"),
            Self::Stopped => write!(f, "Stopped"),
            Self::Failed => write!(f, "Failed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forward_path() {
        assert!(SeatState::Idle.can_transition_to(SeatState::Starting));
        assert!(SeatState::Starting.can_transition_to(SeatState::Running));
        assert!(SeatState::Running.can_transition_to(SeatState::Stopping));
        assert!(SeatState::Stopping.can_transition_to(SeatState::Stopped));
    }

    #[test]
    fn test_failed_is_reachable_from_starting_and_running_only() {
        assert!(SeatState::Starting.can_transition_to(SeatState::Failed));
        assert!(SeatState::Running.can_transition_to(SeatState::Failed));
        assert!(!SeatState::Idle.can_transition_to(SeatState::Failed));
        assert!(!SeatState::Stopping.can_transition_to(SeatState::Failed));
    }

    #[test]
    fn test_terminal_states_have_no_exits() {
        for target in [
            SeatState::Idle,
            SeatState::Starting,
            SeatState::Running,
            SeatState::Stopping,
            SeatState::Stopped,
            SeatState::Failed,
        ] {
            assert!(!SeatState::Stopped.can_transition_to(target));
            assert!(!SeatState::Failed.can_transition_to(target));
        }
        assert!(SeatState::Stopped.is_terminal());
        assert!(SeatState::Failed.is_terminal());
    }

    #[test]
    fn test_stop_is_reachable_from_every_live_state() {
        assert!(SeatState::Idle.can_transition_to(SeatState::Stopping));
        assert!(SeatState::Starting.can_transition_to(SeatState::Stopping));
        assert!(SeatState::Running.can_transition_to(SeatState::Stopping));
    }

    #[test]
    fn test_is_active() {
        assert!(SeatState::Starting.is_active());
        assert!(SeatState::Running.is_active());
        assert!(!SeatState::Idle.is_active());
        assert!(!SeatState::Stopped.is_active());
    }

    #[test]
    fn test_seat_config_default() {
        assert_eq!(SeatConfig::default().command_channel_size, 64);
    }
}
