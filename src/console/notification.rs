// ABOUTME: Notifications printed to the controlling terminal
// Mirrors every user-facing message into the log as well

use crate::host::Notifier;
use crossterm::style::{StyledContent, Stylize};
use tracing::{error, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationType {
    Error,
    Info,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
    pub notification_type: NotificationType,
}

impl Notification {
    pub fn new(message: String, notification_type: NotificationType) -> Self {
        Self {
            message,
            notification_type,
        }
    }

    pub fn error(message: String) -> Self {
        Self::new(message, NotificationType::Error)
    }

    pub fn info(message: String) -> Self {
        Self::new(message, NotificationType::Info)
    }

    pub fn warning(message: String) -> Self {
        Self::new(message, NotificationType::Warning)
    }

    pub fn label(&self) -> &'static str {
        match self.notification_type {
            NotificationType::Error => "error",
            NotificationType::Info => "info",
            NotificationType::Warning => "warning",
        }
    }

    fn styled_label(&self) -> StyledContent<&'static str> {
        let label = self.label();
        match self.notification_type {
            NotificationType::Error => label.red().bold(),
            NotificationType::Info => label.cyan().bold(),
            NotificationType::Warning => label.yellow().bold(),
        }
    }

    /// Plain rendering, used when stderr is not a terminal.
    pub fn plain(&self) -> String {
        format!("[{}] {}", self.label(), self.message)
    }

    pub fn styled(&self) -> String {
        format!("[{}] {}", self.styled_label(), self.message)
    }
}

pub struct ConsoleNotifier {
    color: bool,
}

impl ConsoleNotifier {
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    pub fn show(&self, notification: &Notification) {
        match notification.notification_type {
            NotificationType::Error => error!("{}", notification.message),
            NotificationType::Warning => warn!("{}", notification.message),
            NotificationType::Info => info!("{}", notification.message),
        }

        if self.color {
            eprintln!("{}", notification.styled());
        } else {
            eprintln!("{}", notification.plain());
        }
    }
}

impl Notifier for ConsoleNotifier {
    fn info(&self, message: &str) {
        self.show(&Notification::info(message.to_string()));
    }

    fn warning(&self, message: &str) {
        self.show(&Notification::warning(message.to_string()));
    }

    fn error(&self, message: &str) {
        self.show(&Notification::error(message.to_string()));
    }
}
