// ABOUTME: Collaborator interfaces the dispatcher drives: terminals, workspace, prompts,
// notifications, the status indicator and the install-hint source

use crate::models::PackageLinks;
use async_trait::async_trait;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

pub use crate::tmux::TerminalError;

/// A terminal that accepts text to execute.
#[cfg_attr(test, mockall::automock)]
pub trait TerminalHandle: Send + Sync {
    fn name(&self) -> String;

    /// Types `text` into the terminal followed by Enter.
    fn send_text(&self, text: &str) -> Result<(), TerminalError>;

    /// Answers a password prompt already waiting in the terminal. The value
    /// must not be echoed, kept in scrollback, or passed on a command line.
    fn send_secret(&self, secret: Secret) -> Result<(), TerminalError>;

    fn show(&self) -> Result<(), TerminalError>;

    fn dispose(&self) -> Result<(), TerminalError>;
}

#[cfg_attr(test, mockall::automock)]
pub trait TerminalHost: Send + Sync {
    fn get_or_create_terminal(&self, name: &str) -> Result<Arc<dyn TerminalHandle>, TerminalError>;
}

#[cfg_attr(test, mockall::automock)]
pub trait WorkspaceInspector: Send + Sync {
    fn is_initialized_project(&self) -> bool;

    fn root_path(&self) -> Option<PathBuf>;
}

/// An opaque credential. Debug output is redacted and the value can only be
/// taken out once.
pub struct Secret(String);

impl Secret {
    pub fn new(value: String) -> Self {
        Self(value)
    }

    pub fn expose(self) -> String {
        self.0
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret(***)")
    }
}

/// Interactive input. `None` means the prompt was dismissed.
#[async_trait]
pub trait PromptProvider: Send + Sync {
    async fn prompt_text(&self, placeholder: &str) -> Option<String>;

    async fn prompt_secret(&self, placeholder: &str) -> Option<Secret>;

    async fn prompt_choice(&self, message: &str, options: &[&str]) -> Option<String>;
}

#[cfg_attr(test, mockall::automock)]
pub trait Notifier: Send + Sync {
    fn info(&self, message: &str);

    fn warning(&self, message: &str);

    fn error(&self, message: &str);
}

#[cfg_attr(test, mockall::automock)]
pub trait StatusIndicator: Send + Sync {
    /// Transient label shown while a transition settles.
    fn set_working(&self, label: &str);

    /// The server is up on `port`; the indicator offers to stop it.
    fn set_offline(&self, port: u16);

    /// No server; the indicator offers to start one.
    fn set_online(&self);

    fn dispose(&self);
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait InstallHintSource: Send + Sync {
    async fn resolve_install_hint(&self, links: &PackageLinks) -> Option<String>;
}

/// Hint source that never resolves; installs always use the generic fallback.
pub struct NoInstallHints;

#[async_trait]
impl InstallHintSource for NoInstallHints {
    async fn resolve_install_hint(&self, _links: &PackageLinks) -> Option<String> {
        None
    }
}

/// Everything the dispatcher talks to, bundled so it can be built in one place.
#[derive(Clone)]
pub struct HostServices {
    pub terminals: Arc<dyn TerminalHost>,
    pub workspace: Arc<dyn WorkspaceInspector>,
    pub prompts: Arc<dyn PromptProvider>,
    pub notifier: Arc<dyn Notifier>,
    pub status: Arc<dyn StatusIndicator>,
    pub hints: Arc<dyn InstallHintSource>,
}
