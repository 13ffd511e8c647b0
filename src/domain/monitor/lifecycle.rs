//! Change monitor lifecycle state machine

use std::fmt;
use thiserror::Error;

/// Monitor states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MonitorState {
    #[default]
    Stopped,
    Starting,
    Running,
    Stopping,
}

impl MonitorState {
    /// Get the string representation
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Stopped => "stopped",
            Self::Starting => "starting",
            Self::Running => "running",
            Self::Stopping => "stopping",
        }
    }
}

impl fmt::Display for MonitorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error when an invalid state transition is attempted
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid state transition: cannot {action} while {current_state}")]
pub struct InvalidStateTransition {
    pub current_state: MonitorState,
    pub action: String,
}

/// Monitor lifecycle entity.
///
/// State machine:
///   STOPPED -> STARTING (begin_start)
///   STARTING -> RUNNING (complete_start)
///   STARTING -> STOPPED (abort_start)
///   RUNNING -> STOPPING (begin_stop)
///   STOPPING -> STOPPED (complete_stop)
#[derive(Debug, Default)]
pub struct MonitorLifecycle {
    state: MonitorState,
}

impl MonitorLifecycle {
    /// Create a new lifecycle in the stopped state
    pub fn new() -> Self {
        Self {
            state: MonitorState::Stopped,
        }
    }

    /// Get the current state
    pub fn state(&self) -> MonitorState {
        self.state
    }

    pub fn is_stopped(&self) -> bool {
        self.state == MonitorState::Stopped
    }

    pub fn is_running(&self) -> bool {
        self.state == MonitorState::Running
    }

    /// Transition from STOPPED to STARTING
    pub fn begin_start(&mut self) -> Result<(), InvalidStateTransition> {
        self.transition(MonitorState::Stopped, MonitorState::Starting, "start")
    }

    /// Transition from STARTING to RUNNING
    pub fn complete_start(&mut self) -> Result<(), InvalidStateTransition> {
        self.transition(MonitorState::Starting, MonitorState::Running, "complete start")
    }

    /// Transition from STARTING back to STOPPED after a failed registration
    pub fn abort_start(&mut self) -> Result<(), InvalidStateTransition> {
        self.transition(MonitorState::Starting, MonitorState::Stopped, "abort start")
    }

    /// Transition from RUNNING to STOPPING
    pub fn begin_stop(&mut self) -> Result<(), InvalidStateTransition> {
        self.transition(MonitorState::Running, MonitorState::Stopping, "stop")
    }

    /// Transition from STOPPING to STOPPED
    pub fn complete_stop(&mut self) -> Result<(), InvalidStateTransition> {
        self.transition(MonitorState::Stopping, MonitorState::Stopped, "complete stop")
    }

    fn transition(
        &mut self,
        from: MonitorState,
        to: MonitorState,
        action: &str,
    ) -> Result<(), InvalidStateTransition> {
        if self.state != from {
            return Err(InvalidStateTransition {
                current_state: self.state,
                action: action.to_string(),
            });
        }
        self.state = to;
        Ok(())
    }
}
