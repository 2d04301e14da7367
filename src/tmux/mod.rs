// ABOUTME: Host-based tmux terminals
// Plays the role of the integrated terminal: gatsby commands are typed into tmux sessions

pub mod error;
pub mod session;

pub use error::TerminalError;
pub use session::{TmuxTerminal, TmuxTerminalHost};
