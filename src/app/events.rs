// ABOUTME: Maps REPL input lines to app events
// Parameters are validated here, at the input boundary, before anything is dispatched

use crate::error::DispatchError;
use crate::models::{Action, CommandRequest};
use crate::registry::Catalog;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    /// A dispatcher action that needs no registry lookup.
    Dispatch(CommandRequest),
    /// Install a package; its links are looked up before dispatching.
    Install(String),
    Info(String),
    List(Catalog),
    Status,
    Help,
    Quit,
    Empty,
}

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Unknown command '{0}'. Type 'help' for the list of commands.")]
    UnknownCommand(String),
    #[error("Usage: {0}")]
    Usage(&'static str),
    #[error(transparent)]
    Invalid(#[from] DispatchError),
}

pub const HELP: &str = "\
Commands:
  new [name] [template]   create a site (optionally from a starter repository)
  develop                 start the development server
  stop                    stop the development server
  build                   build the site for production
  serve                   serve the production build
  install <package>       install a plugin or theme
  install-cli             install gatsby-cli globally
  info <package>          show package details
  list <plugins|themes|starters>
  status                  show the development server state
  help                    show this help
  quit                    leave gatsby-hub";

pub struct EventHandler;

impl EventHandler {
    pub fn parse_line(line: &str) -> Result<AppEvent, ParseError> {
        let mut words = line.split_whitespace();
        let Some(command) = words.next() else {
            return Ok(AppEvent::Empty);
        };
        let args: Vec<&str> = words.collect();

        let event = match command.to_ascii_lowercase().as_str() {
            "new" | "create" => {
                if args.len() > 2 {
                    return Err(ParseError::Usage("new [name] [template]"));
                }
                let name = args.first().map(|s| (*s).to_string());
                let template = args.get(1).map(|s| (*s).to_string());
                AppEvent::Dispatch(CommandRequest::create_site(name, template)?)
            }
            "develop" | "start" => AppEvent::Dispatch(CommandRequest::simple(Action::Develop)?),
            "stop" | "dispose" => AppEvent::Dispatch(CommandRequest::simple(Action::Dispose)?),
            "build" => AppEvent::Dispatch(CommandRequest::simple(Action::Build)?),
            "serve" => AppEvent::Dispatch(CommandRequest::simple(Action::Serve)?),
            "install-cli" => AppEvent::Dispatch(CommandRequest::simple(Action::InstallCli)?),
            "install" | "add" => match args.as_slice() {
                [package] => AppEvent::Install((*package).to_string()),
                _ => return Err(ParseError::Usage("install <package>")),
            },
            "info" => match args.as_slice() {
                [package] => AppEvent::Info((*package).to_string()),
                _ => return Err(ParseError::Usage("info <package>")),
            },
            "list" => match args.as_slice() {
                [catalog] => AppEvent::List(
                    catalog
                        .parse()
                        .map_err(|_| ParseError::Usage("list <plugins|themes|starters>"))?,
                ),
                _ => return Err(ParseError::Usage("list <plugins|themes|starters>")),
            },
            "status" => AppEvent::Status,
            "help" | "?" => AppEvent::Help,
            "quit" | "exit" | "q" => AppEvent::Quit,
            other => return Err(ParseError::UnknownCommand(other.to_string())),
        };

        Ok(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_line_is_empty() {
        assert_eq!(EventHandler::parse_line("   ").unwrap(), AppEvent::Empty);
    }

    #[test]
    fn test_new_with_name_and_template() {
        let event =
            EventHandler::parse_line("new blog https://github.com/gatsbyjs/gatsby-starter-blog")
                .unwrap();
        let AppEvent::Dispatch(request) = event else {
            panic!("expected a dispatch event");
        };
        assert_eq!(request.action(), Action::CreateSite);
        assert_eq!(request.params().site_name.as_deref(), Some("blog"));
        assert_eq!(
            request.params().template_repo.as_deref(),
            Some("https://github.com/gatsbyjs/gatsby-starter-blog")
        );
    }

    #[test]
    fn test_new_without_name_defers_to_prompt() {
        let AppEvent::Dispatch(request) = EventHandler::parse_line("new").unwrap() else {
            panic!("expected a dispatch event");
        };
        assert!(request.params().site_name.is_none());
    }

    #[test]
    fn test_lifecycle_aliases() {
        for (line, action) in [
            ("develop", Action::Develop),
            ("START", Action::Develop),
            ("stop", Action::Dispose),
            ("build", Action::Build),
            ("serve", Action::Serve),
            ("install-cli", Action::InstallCli),
        ] {
            let AppEvent::Dispatch(request) = EventHandler::parse_line(line).unwrap() else {
                panic!("expected a dispatch event for {line}");
            };
            assert_eq!(request.action(), action);
        }
    }

    #[test]
    fn test_install_requires_exactly_one_package() {
        assert_eq!(
            EventHandler::parse_line("install gatsby-plugin-sharp").unwrap(),
            AppEvent::Install("gatsby-plugin-sharp".to_string())
        );
        assert!(matches!(
            EventHandler::parse_line("install"),
            Err(ParseError::Usage(_))
        ));
    }

    #[test]
    fn test_list_and_unknown() {
        assert_eq!(
            EventHandler::parse_line("list themes").unwrap(),
            AppEvent::List(Catalog::Themes)
        );
        assert!(matches!(
            EventHandler::parse_line("list widgets"),
            Err(ParseError::Usage(_))
        ));
        assert!(matches!(
            EventHandler::parse_line("deploy"),
            Err(ParseError::UnknownCommand(_))
        ));
    }
}
