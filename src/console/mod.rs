// ABOUTME: Console implementations of the host interfaces: prompts, notifications, status

pub mod notification;
pub mod prompt;
pub mod status;

pub use notification::{ConsoleNotifier, Notification, NotificationType};
pub use prompt::ConsolePrompt;
pub use status::{ConsoleStatus, StatusLabel};
