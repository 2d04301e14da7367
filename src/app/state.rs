// ABOUTME: Application state: owns the dispatcher for the process lifetime and runs the REPL

use crate::app::events::{AppEvent, EventHandler, HELP};
use crate::console::prompt::read_line;
use crate::dispatcher::Dispatcher;
use crate::error::DispatchError;
use crate::host::Notifier;
use crate::models::{CommandRequest, PackageLinks};
use crate::preview;
use crate::registry::{Catalog, NpmRegistry, RegistryError};
use anyhow::Result;
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct App {
    dispatcher: Dispatcher,
    registry: Arc<NpmRegistry>,
    notifier: Arc<dyn Notifier>,
}

impl App {
    pub fn new(dispatcher: Dispatcher, registry: Arc<NpmRegistry>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            dispatcher,
            registry,
            notifier,
        }
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    pub fn dispatcher_mut(&mut self) -> &mut Dispatcher {
        &mut self.dispatcher
    }

    /// Interactive loop; ends on `quit` or EOF.
    pub async fn run(&mut self) -> Result<()> {
        eprintln!("gatsby-hub: type 'help' for commands");

        loop {
            let status = self.dispatcher.status().await;
            let prompt = format!("gatsby-hub {} > ", status.indicator());
            let line = tokio::task::spawn_blocking(move || read_line(&prompt)).await??;
            let Some(line) = line else {
                break;
            };

            let event = match EventHandler::parse_line(&line) {
                Ok(event) => event,
                Err(e) => {
                    self.notifier.warning(&e.to_string());
                    continue;
                }
            };

            // Failures were already shown to the user; keep the loop going
            if let Ok(Flow::Quit) = self.handle_event(event).await {
                break;
            }
        }

        self.dispatcher.shutdown();
        info!("REPL finished");
        Ok(())
    }

    pub async fn handle_event(&mut self, event: AppEvent) -> Result<Flow> {
        match event {
            AppEvent::Dispatch(request) => self.dispatcher.dispatch(request).await?,
            AppEvent::Install(name) => self.install(&name).await?,
            AppEvent::Info(name) => self.show_info(&name).await?,
            AppEvent::List(catalog) => self.list(catalog).await?,
            AppEvent::Status => {
                let status = self.dispatcher.status().await;
                let port = self.dispatcher.config().develop.port;
                if status.is_running() {
                    println!("{} development server {} on port {}", status.indicator(), status, port);
                } else {
                    println!("{} development server {}", status.indicator(), status);
                }
            }
            AppEvent::Help => println!("{HELP}"),
            AppEvent::Quit => return Ok(Flow::Quit),
            AppEvent::Empty => {}
        }
        Ok(Flow::Continue)
    }

    /// Looks up the package links for a better install hint; a failed lookup
    /// still installs with the generic command.
    pub async fn install(&mut self, name: &str) -> Result<(), DispatchError> {
        let links = match self.registry.fetch_package(name).await {
            Ok(details) => details.package.links,
            Err(e) => {
                warn!("No registry metadata for {}: {}", name, e);
                PackageLinks::default()
            }
        };

        let request = match CommandRequest::install_dependency(name, links) {
            Ok(request) => request,
            Err(e) => {
                self.notifier.error(&e.to_string());
                return Err(e);
            }
        };
        self.dispatcher.dispatch(request).await
    }

    pub async fn show_info(&self, name: &str) -> Result<(), RegistryError> {
        match self.registry.fetch_package(name).await {
            Ok(details) => {
                println!("{}", preview::render(&details.package, details.readme.as_deref()));
                Ok(())
            }
            Err(e) => {
                self.notifier.error(&e.to_string());
                Err(e)
            }
        }
    }

    pub async fn list(&self, catalog: Catalog) -> Result<(), RegistryError> {
        match self.registry.list(catalog).await {
            Ok(packages) => {
                for package in &packages {
                    let description = package.description.as_deref().unwrap_or("");
                    println!("{:<45} {:<10} {}", package.name, package.version, description);
                }
                self.notifier
                    .info(&format!("{} {} found", packages.len(), catalog));
                Ok(())
            }
            Err(e) => {
                self.notifier.error(&e.to_string());
                Err(e)
            }
        }
    }
}
