// ABOUTME: Server session model tracking the believed state of the gatsby development server
// Holds the explicit transition table; illegal transitions are rejected with a typed error

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ServerStatus {
    Stopped,
    Starting,
    Running,
    Stopping,
}

/// Events that move the session between states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionEvent {
    Develop,
    Settled,
    Dispose,
}

impl fmt::Display for SessionEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SessionEvent::Develop => "develop",
            SessionEvent::Settled => "settle",
            SessionEvent::Dispose => "dispose",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("cannot {event} while the server is {from}")]
pub struct TransitionError {
    pub from: ServerStatus,
    pub event: SessionEvent,
}

impl ServerStatus {
    pub fn indicator(&self) -> &'static str {
        match self {
            ServerStatus::Stopped => "⏸",
            ServerStatus::Starting => "◐",
            ServerStatus::Running => "●",
            ServerStatus::Stopping => "◑",
        }
    }

    pub fn is_running(&self) -> bool {
        matches!(self, ServerStatus::Running)
    }

    /// The transition table. Anything not listed here is illegal.
    pub fn next(self, event: SessionEvent) -> Result<ServerStatus, TransitionError> {
        use ServerStatus::*;
        use SessionEvent::*;

        match (self, event) {
            (Stopped, Develop) => Ok(Starting),
            (Starting, Settled) => Ok(Running),
            (Starting, Dispose) | (Running, Dispose) => Ok(Stopping),
            (Stopping, Settled) => Ok(Stopped),
            (from, event) => Err(TransitionError { from, event }),
        }
    }
}

impl fmt::Display for ServerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ServerStatus::Stopped => "stopped",
            ServerStatus::Starting => "starting",
            ServerStatus::Running => "running",
            ServerStatus::Stopping => "stopping",
        };
        f.write_str(name)
    }
}

impl Default for ServerStatus {
    fn default() -> Self {
        ServerStatus::Stopped
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServerSession {
    status: ServerStatus,
}

impl ServerSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self) -> ServerStatus {
        self.status
    }

    /// Applies `event`, returning the new status. The session is left untouched on error.
    pub fn apply(&mut self, event: SessionEvent) -> Result<ServerStatus, TransitionError> {
        let next = self.status.next(event)?;
        self.status = next;
        Ok(next)
    }
}
