// ABOUTME: Main entry point for gatsby-hub: one-shot subcommands or the interactive REPL

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use crossterm::terminal::disable_raw_mode;
use gatsby_hub::app::App;
use gatsby_hub::config::AppConfig;
use gatsby_hub::console::{ConsoleNotifier, ConsolePrompt, ConsoleStatus};
use gatsby_hub::dispatcher::Dispatcher;
use gatsby_hub::host::{HostServices, Notifier};
use gatsby_hub::models::{Action, CommandRequest};
use gatsby_hub::registry::{Catalog, NpmRegistry};
use gatsby_hub::tmux::TmuxTerminalHost;
use gatsby_hub::workspace::FsWorkspace;
use std::io::IsTerminal;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "gatsby-hub", version, about = "Drive the gatsby CLI from one place")]
struct Cli {
    /// Config file (defaults to the user config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Site directory (defaults to the current directory)
    #[arg(long, global = true)]
    dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new site, optionally from a starter repository
    New {
        name: Option<String>,
        template: Option<String>,
    },
    /// Build the site for production
    Build,
    /// Serve the production build
    Serve,
    /// Install a plugin or theme into the site
    Install { package: String },
    /// Install gatsby-cli globally
    InstallCli,
    /// Show package details from the registry
    Info { package: String },
    /// List plugins, themes or starters
    List { catalog: Catalog },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = setup_logging() {
        eprintln!("Logging disabled: {e:#}");
    }
    setup_panic_handler();

    match run(cli).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            error!("gatsby-hub failed: {:#}", e);
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

/// Returns whether the requested command succeeded. Dispatcher failures have
/// already been shown through the notifier.
async fn run(cli: Cli) -> Result<bool> {
    let config = match &cli.config {
        Some(path) => AppConfig::load_from(path),
        None => AppConfig::load(),
    }
    .context("Failed to load configuration")?;

    let color = std::io::stderr().is_terminal();
    let notifier = Arc::new(ConsoleNotifier::new(color));
    let registry = Arc::new(NpmRegistry::new(&config.registry)?);

    // Registry-only commands work without tmux
    match &cli.command {
        Some(Commands::Info { package }) => {
            let app = offline_app(&config, &registry, &notifier);
            return Ok(app.show_info(package).await.is_ok());
        }
        Some(Commands::List { catalog }) => {
            let app = offline_app(&config, &registry, &notifier);
            return Ok(app.list(*catalog).await.is_ok());
        }
        _ => {}
    }

    let root = match cli.dir.clone() {
        Some(dir) => dir,
        None => std::env::current_dir().context("Cannot determine the current directory")?,
    };
    let terminals = TmuxTerminalHost::new(root.clone())
        .context("gatsby-hub runs gatsby commands inside tmux; install tmux and try again")?;

    let interactive = cli.command.is_none();
    let host = HostServices {
        terminals: Arc::new(terminals),
        workspace: Arc::new(FsWorkspace::new(Some(root))),
        prompts: Arc::new(ConsolePrompt::new()),
        notifier: notifier.clone(),
        status: Arc::new(ConsoleStatus::new(interactive)),
        hints: registry.clone(),
    };
    let dispatcher = Dispatcher::new(config, host);
    let mut app = App::new(dispatcher, registry, notifier.clone());

    let Some(command) = cli.command else {
        info!("Starting gatsby-hub REPL");
        app.run().await?;
        return Ok(true);
    };

    let result = match command {
        Commands::New { name, template } => match CommandRequest::create_site(name, template) {
            Ok(request) => app.dispatcher_mut().dispatch(request).await,
            Err(e) => {
                notifier.error(&e.to_string());
                Err(e)
            }
        },
        Commands::Build => dispatch_simple(&mut app, Action::Build).await,
        Commands::Serve => dispatch_simple(&mut app, Action::Serve).await,
        Commands::InstallCli => dispatch_simple(&mut app, Action::InstallCli).await,
        Commands::Install { package } => app.install(&package).await,
        Commands::Info { .. } | Commands::List { .. } => Ok(()),
    };
    app.dispatcher_mut().shutdown();

    Ok(result.is_ok())
}

async fn dispatch_simple(
    app: &mut App,
    action: Action,
) -> Result<(), gatsby_hub::error::DispatchError> {
    let request = CommandRequest::simple(action)?;
    app.dispatcher_mut().dispatch(request).await
}

/// An app whose terminals are never touched; used for registry lookups.
fn offline_app(
    config: &AppConfig,
    registry: &Arc<NpmRegistry>,
    notifier: &Arc<ConsoleNotifier>,
) -> App {
    use gatsby_hub::host::NoInstallHints;

    let host = HostServices {
        terminals: Arc::new(NoTerminals),
        workspace: Arc::new(FsWorkspace::new(None)),
        prompts: Arc::new(ConsolePrompt::new()),
        notifier: notifier.clone(),
        status: Arc::new(ConsoleStatus::new(false)),
        hints: Arc::new(NoInstallHints),
    };
    App::new(
        Dispatcher::new(config.clone(), host),
        registry.clone(),
        notifier.clone(),
    )
}

struct NoTerminals;

impl gatsby_hub::host::TerminalHost for NoTerminals {
    fn get_or_create_terminal(
        &self,
        _name: &str,
    ) -> Result<Arc<dyn gatsby_hub::host::TerminalHandle>, gatsby_hub::host::TerminalError> {
        Err(gatsby_hub::host::TerminalError::TmuxNotInstalled)
    }
}

fn setup_logging() -> Result<()> {
    use std::fs::OpenOptions;
    use tracing_subscriber::prelude::*;

    let log_dir = dirs::home_dir()
        .map(|home| home.join(".gatsby-hub").join("logs"))
        .unwrap_or_else(|| PathBuf::from(".gatsby-hub/logs"));
    std::fs::create_dir_all(&log_dir)
        .with_context(|| format!("Cannot create log directory {}", log_dir.display()))?;

    let log_file = log_dir.join(format!(
        "gatsby-hub-{}.log",
        chrono::Local::now().format("%Y%m%d-%H%M%S")
    ));
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_file)
        .with_context(|| format!("Cannot open log file {}", log_file.display()))?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(file)
                .with_ansi(false),
        )
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gatsby_hub=info".into()),
        )
        .try_init()
        .context("Logging was already initialised")?;
    Ok(())
}

fn setup_panic_handler() {
    std::panic::set_hook(Box::new(|panic_info| {
        // Secret prompts put the terminal in raw mode
        let _ = disable_raw_mode();

        error!("Application panicked: {}", panic_info);
        eprintln!("Application panicked: {}", panic_info);
        eprintln!("Please check the logs for more details.");
    }));
}
