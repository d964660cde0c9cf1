//! The display lifecycle state machine.

use serde::{Deserialize, Serialize};

/// The lifecycle state of a display.
///
/// The forward path is strictly ordered, with two terminal edges off it:
///
/// ```text
/// Stopped → Starting → Running → Stopping → Stopped
///                         │
///                         └──(endpoint lost)──→ Failed ──(stop)──→ Stopped
/// ```
///
/// - **Stopped**: no resources held. Both the initial state and the resting
///   state after any shutdown.
/// - **Starting**: connection to the remote server in progress. Never
///   re-entered once Running has been reached.
/// - **Running**: the remote connection is up and ready to carry the login
///   surface.
/// - **Stopping**: resources being released.
/// - **Failed**: the remote endpoint was lost or never reachable. A stop
///   normalizes this to Stopped once the owner has acknowledged the
///   failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DisplayState {
    Stopped,
    Starting,
    Running,
    Stopping,
    Failed,
}

impl DisplayState {
    /// Returns `true` if the display is actively serving.
    pub fn is_running(&self) -> bool {
        matches!(self, Self::Running)
    }

    /// Returns `true` if no resources are held in this state.
    pub fn is_stopped(&self) -> bool {
        matches!(self, Self::Stopped)
    }

    /// Returns `true` if transitioning to `target` is a valid lifecycle
    /// step.
    pub fn can_transition_to(self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::Stopped, Self::Starting)
                | (Self::Starting, Self::Running)
                | (Self::Starting, Self::Stopping)
                | (Self::Starting, Self::Failed)
                | (Self::Running, Self::Stopping)
                | (Self::Running, Self::Failed)
                | (Self::Stopping, Self::Stopped)
                | (Self::Failed, Self::Stopped)
        )
    }
}

impl std::fmt::Display for DisplayState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Stopped => write!(f, "Stopped"),
            Self::Starting => write!(f, "Starting"),
            Self::Running => write!(f, "Running"),
            Self::Stopping => write!(f, "Stopping"),
            Self::Failed => write!(f, "Failed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forward_path_is_valid() {
        assert!(DisplayState::Stopped.can_transition_to(DisplayState::Starting));
        assert!(DisplayState::Starting.can_transition_to(DisplayState::Running));
        assert!(DisplayState::Running.can_transition_to(DisplayState::Stopping));
        assert!(DisplayState::Stopping.can_transition_to(DisplayState::Stopped));
    }

    #[test]
    fn test_failure_edges() {
        assert!(DisplayState::Starting.can_transition_to(DisplayState::Failed));
        assert!(DisplayState::Running.can_transition_to(DisplayState::Failed));
        assert!(DisplayState::Failed.can_transition_to(DisplayState::Stopped));
    }

    #[test]
    fn test_starting_is_never_reentered() {
        for state in [
            DisplayState::Starting,
            DisplayState::Running,
            DisplayState::Stopping,
            DisplayState::Failed,
        ] {
            assert!(
                !state.can_transition_to(DisplayState::Starting),
                "{state} must not re-enter Starting"
            );
        }
    }

    #[test]
    fn test_stop_path_exists_from_every_live_state() {
        assert!(DisplayState::Starting.can_transition_to(DisplayState::Stopping));
        assert!(DisplayState::Running.can_transition_to(DisplayState::Stopping));
    }

    #[test]
    fn test_predicates() {
        assert!(DisplayState::Running.is_running());
        assert!(!DisplayState::Starting.is_running());
        assert!(DisplayState::Stopped.is_stopped());
        assert!(!DisplayState::Failed.is_stopped());
    }

    #[test]
    fn test_display_format() {
        assert_eq!(DisplayState::Running.to_string(), "Running");
        assert_eq!(DisplayState::Failed.to_string(), "Failed");
    }
}
