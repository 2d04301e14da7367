// ABOUTME: Command dispatcher translating user actions into gatsby shell commands
// Owns the server session and the pending settle transition

pub mod commands;
pub mod scheduler;

pub use scheduler::TransitionScheduler;

use crate::config::AppConfig;
use crate::error::DispatchError;
use crate::host::{HostServices, TerminalHandle};
use crate::models::package::is_theme_name;
use crate::models::{Action, CommandRequest, PackageLinks, ServerSession, ServerStatus, SessionEvent};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

const NOT_A_SITE_MSG: &str =
    "Open up a new workspace containing only the site you are working on.";
const NESTED_SITE_MSG: &str = "Can't create a site in a Gatsby workspace. If you would like to start a new project, navigate to the parent directory and create a site there.";
const NO_WORKSPACE_MSG: &str = "Open a folder or workspace first";
const SERVE_WARNING: &str = "This serves the production build for testing purposes. Ensure the build command was run successfully before running this command.";
const CONTINUE: &str = "Continue";
const CANCEL: &str = "Cancel";

pub struct Dispatcher {
    config: AppConfig,
    host: HostServices,
    session: Arc<Mutex<ServerSession>>,
    scheduler: TransitionScheduler,
}

impl Dispatcher {
    pub fn new(config: AppConfig, host: HostServices) -> Self {
        host.status.set_online();
        Self {
            config,
            host,
            session: Arc::new(Mutex::new(ServerSession::new())),
            scheduler: TransitionScheduler::new(),
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Shared handle to the session, for callers that display it.
    pub fn session(&self) -> Arc<Mutex<ServerSession>> {
        self.session.clone()
    }

    pub async fn status(&self) -> ServerStatus {
        self.session.lock().await.status()
    }

    /// Routes `request` to its action. Failures are reported through the
    /// notifier before being returned.
    pub async fn dispatch(&mut self, request: CommandRequest) -> Result<(), DispatchError> {
        let action = request.action();
        debug!("Dispatching {}", action);

        let params = request.params();
        let result = match action {
            Action::CreateSite => {
                self.create_site(params.site_name.clone(), params.template_repo.clone())
                    .await
            }
            Action::Develop => self.develop().await,
            Action::Dispose => self.dispose().await,
            Action::Build => self.build().await,
            Action::Serve => self.serve().await,
            Action::InstallDependency => match params.package_name.as_deref() {
                Some(name) => self.install_dependency(name, &params.links).await,
                None => Err(DispatchError::MissingParameter("package name")),
            },
            Action::InstallCli => self.install_cli().await,
        };

        if let Err(err) = &result {
            self.report(action, err);
        }
        result
    }

    fn report(&self, action: Action, err: &DispatchError) {
        if err.is_cancellation() {
            info!("{} cancelled by user", action);
            self.host.notifier.warning(&format!("{action}: {err}"));
        } else {
            warn!("{} failed: {}", action, err);
            self.host.notifier.error(&err.to_string());
        }
    }

    fn terminal(&self) -> Result<Arc<dyn TerminalHandle>, DispatchError> {
        Ok(self
            .host
            .terminals
            .get_or_create_terminal(&self.config.terminal.session)?)
    }

    fn server_terminal(&self) -> Result<Arc<dyn TerminalHandle>, DispatchError> {
        Ok(self
            .host
            .terminals
            .get_or_create_terminal(&self.config.server_terminal_name())?)
    }

    fn require_site(&self) -> Result<(), DispatchError> {
        if self.host.workspace.is_initialized_project() {
            Ok(())
        } else {
            Err(DispatchError::InvalidContext(NOT_A_SITE_MSG.to_string()))
        }
    }

    pub async fn create_site(
        &mut self,
        name: Option<String>,
        template_repo: Option<String>,
    ) -> Result<(), DispatchError> {
        if self.host.workspace.is_initialized_project() {
            return Err(DispatchError::InvalidContext(NESTED_SITE_MSG.to_string()));
        }

        let name = match name {
            Some(name) => name,
            None => self
                .host
                .prompts
                .prompt_text("Enter name of new site")
                .await
                .unwrap_or_default(),
        };
        let name = name.trim();
        if name.is_empty() {
            return Err(DispatchError::MissingParameter("site name"));
        }

        let command = commands::create_site(name, template_repo.as_deref());
        let terminal = self.terminal()?;
        terminal.send_text(&command)?;
        terminal.show()?;

        info!("Creating site {} ({})", name, command);
        Ok(())
    }

    pub async fn develop(&mut self) -> Result<(), DispatchError> {
        let mut session = self.session.lock().await;
        session.status().next(SessionEvent::Develop)?;

        if self.host.workspace.root_path().is_none() {
            return Err(DispatchError::InvalidContext(NO_WORKSPACE_MSG.to_string()));
        }
        self.require_site()?;

        self.scheduler.cancel();

        let command = self.config.develop_command();
        let terminal = self.server_terminal()?;
        terminal.send_text(&command)?;

        session.apply(SessionEvent::Develop)?;
        drop(session);

        let port = self.config.develop.port;
        self.host.status.set_working("Blast Off...");
        self.host.notifier.info(&format!("Starting up port:{port}"));
        if let Err(e) = terminal.show() {
            warn!("Could not show server terminal: {}", e);
        }

        self.scheduler.schedule(
            self.config.develop_settle_delay(),
            scheduler::settle(
                self.session.clone(),
                ServerStatus::Starting,
                self.host.status.clone(),
                port,
            ),
        );

        info!("Started development server ({})", command);
        Ok(())
    }

    pub async fn dispose(&mut self) -> Result<(), DispatchError> {
        let mut session = self.session.lock().await;
        session.status().next(SessionEvent::Dispose)?;

        let terminal = self.server_terminal()?;
        terminal.dispose()?;

        self.scheduler.cancel();
        session.apply(SessionEvent::Dispose)?;
        drop(session);

        let port = self.config.develop.port;
        self.host.status.set_working("Shutting Down...");
        self.host.notifier.info(&format!("Shutting down port:{port}"));

        self.scheduler.schedule(
            self.config.dispose_settle_delay(),
            scheduler::settle(
                self.session.clone(),
                ServerStatus::Stopping,
                self.host.status.clone(),
                port,
            ),
        );

        info!("Disposed development server terminal");
        Ok(())
    }

    pub async fn build(&mut self) -> Result<(), DispatchError> {
        self.require_site()?;

        let command = self.config.build_command();
        let terminal = self.terminal()?;
        terminal.show()?;
        terminal.send_text(&command)?;

        info!("Building site ({})", command);
        Ok(())
    }

    /// Serving needs a finished build, which only the user can vouch for.
    pub async fn serve(&mut self) -> Result<(), DispatchError> {
        self.require_site()?;

        let choice = self
            .host
            .prompts
            .prompt_choice(SERVE_WARNING, &[CONTINUE, CANCEL])
            .await;
        if choice.as_deref() != Some(CONTINUE) {
            return Err(DispatchError::UserCancelled);
        }

        let command = self.config.serve_command();
        let terminal = self.terminal()?;
        terminal.show()?;
        terminal.send_text(&command)?;

        info!("Serving production build ({})", command);
        Ok(())
    }

    pub async fn install_dependency(
        &mut self,
        name: &str,
        links: &PackageLinks,
    ) -> Result<(), DispatchError> {
        self.require_site()?;

        let command = match self.host.hints.resolve_install_hint(links).await {
            Some(hint) => {
                debug!("Using registry install hint for {}", name);
                hint
            }
            None => commands::npm_install(name),
        };

        let terminal = self.terminal()?;
        terminal.send_text(&command)?;
        terminal.show()?;

        let follow_up = if is_theme_name(name) {
            "Refer to this theme's documentation regarding implementation."
        } else {
            "Refer to this plugin's documentation regarding further configuration."
        };
        self.host.notifier.info(follow_up);

        info!("Installing {} ({})", name, command);
        Ok(())
    }

    /// With elevation, sudo is started first and the password is only asked
    /// for once its prompt is up; it then goes straight to that prompt.
    pub async fn install_cli(&mut self) -> Result<(), DispatchError> {
        let terminal = self.terminal()?;

        if !self.config.install_needs_elevation() {
            terminal.send_text(commands::INSTALL_CLI)?;
            terminal.show()?;
            info!("Installing gatsby-cli");
            return Ok(());
        }

        terminal.send_text(&commands::elevated(commands::INSTALL_CLI))?;
        terminal.show()?;

        // A dismissed prompt leaves sudo waiting; the user can still answer it in the terminal
        let secret = self
            .host
            .prompts
            .prompt_secret("Input administrator password")
            .await
            .ok_or(DispatchError::UserCancelled)?;
        terminal.send_secret(secret)?;

        info!("Installing gatsby-cli with elevated privileges");
        Ok(())
    }

    /// Tears down the indicator and any pending transition.
    pub fn shutdown(&mut self) {
        self.scheduler.cancel();
        self.host.status.dispose();
    }
}
