// ABOUTME: Error type for dispatcher actions
// Every variant is recoverable by the user and gets surfaced as a notification

use crate::models::session::{SessionEvent, ServerStatus, TransitionError};
use crate::tmux::TerminalError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("Missing {0}")]
    MissingParameter(&'static str),

    #[error("{0}")]
    InvalidContext(String),

    #[error("Server already took off")]
    AlreadyRunning,

    #[error("No development server is running")]
    NotRunning,

    #[error("Cancelled")]
    UserCancelled,

    #[error("Cannot {event} while the server is {from}")]
    InvalidTransition {
        from: ServerStatus,
        event: SessionEvent,
    },

    #[error("Terminal error: {0}")]
    Terminal(#[from] TerminalError),
}

impl DispatchError {
    /// Cancellations are the user's own choice and get a softer notification.
    pub fn is_cancellation(&self) -> bool {
        matches!(self, DispatchError::UserCancelled)
    }
}

impl From<TransitionError> for DispatchError {
    fn from(err: TransitionError) -> Self {
        match (err.from, err.event) {
            (ServerStatus::Starting | ServerStatus::Running, SessionEvent::Develop) => {
                DispatchError::AlreadyRunning
            }
            (ServerStatus::Stopped, SessionEvent::Dispose) => DispatchError::NotRunning,
            (from, event) => DispatchError::InvalidTransition { from, event },
        }
    }
}
