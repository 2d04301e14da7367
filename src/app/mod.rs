// ABOUTME: Application structure: REPL event parsing and the process-lifetime app state

pub mod events;
pub mod state;

pub use events::{AppEvent, EventHandler, ParseError};
pub use state::{App, Flow};
