// ABOUTME: Error types for terminal sessions
// Defines error conditions that can occur when driving host tmux sessions

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TerminalError {
    #[error("Tmux not installed on host")]
    TmuxNotInstalled,

    #[error("Terminal not found: {0}")]
    SessionNotFound(String),

    #[error("Terminal {0} is not asking for a password; enter it there directly")]
    NotAwaitingSecret(String),

    #[error("Terminal command failed ({command}): {stderr}")]
    CommandFailed { command: String, stderr: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}
