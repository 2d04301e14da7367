// ABOUTME: Console status indicator mirroring the dev server button of an editor status bar

use crate::host::StatusIndicator;
use std::sync::{Mutex, PoisonError};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusLabel {
    /// Transition in progress.
    Working(String),
    /// Server up; the next action stops it.
    Offline(u16),
    /// No server; the next action starts one.
    Online,
    Disposed,
}

impl StatusLabel {
    pub fn render(&self) -> String {
        match self {
            StatusLabel::Working(label) => format!("⟳ {label}"),
            StatusLabel::Offline(port) => format!("● port:{port} (stop to shut down)"),
            StatusLabel::Online => "▶ Gatsby Develop".to_string(),
            StatusLabel::Disposed => String::new(),
        }
    }
}

pub struct ConsoleStatus {
    current: Mutex<StatusLabel>,
    echo: bool,
}

impl ConsoleStatus {
    /// With `echo` set, every change is printed to stderr as it happens.
    pub fn new(echo: bool) -> Self {
        Self {
            current: Mutex::new(StatusLabel::Online),
            echo,
        }
    }

    pub fn current(&self) -> StatusLabel {
        self.current
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn update(&self, label: StatusLabel) {
        let mut current = self.current.lock().unwrap_or_else(PoisonError::into_inner);
        if *current == StatusLabel::Disposed {
            return;
        }
        debug!("Status indicator: {:?}", label);
        if self.echo && label != StatusLabel::Disposed {
            eprintln!("  {}", label.render());
        }
        *current = label;
    }
}

impl StatusIndicator for ConsoleStatus {
    fn set_working(&self, label: &str) {
        self.update(StatusLabel::Working(label.to_string()));
    }

    fn set_offline(&self, port: u16) {
        self.update(StatusLabel::Offline(port));
    }

    fn set_online(&self) {
        self.update(StatusLabel::Online);
    }

    fn dispose(&self) {
        self.update(StatusLabel::Disposed);
    }
}
