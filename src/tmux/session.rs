// ABOUTME: Tmux-backed terminals for running gatsby commands
// Each terminal is a detached tmux session the user can attach to

use crate::dispatcher::commands::shell_quote;
use crate::host::{Secret, TerminalHandle, TerminalHost};
use crate::tmux::error::TerminalError;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tracing::{debug, info, warn};

const SHELLS: &[&str] = &["bash", "zsh", "sh", "dash", "ash", "fish", "ksh", "tcsh", "csh"];
const SECRET_PROMPT_POLLS: u32 = 10;
const SECRET_PROMPT_INTERVAL: Duration = Duration::from_millis(200);

/// What to do with an existing session before handing it out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reroot {
    /// Already in the workspace root.
    Keep,
    /// An idle shell in another directory.
    ChangeDir,
    /// Something is running in another directory; start over.
    Recreate,
}

/// Decides how to bring a pane at `current_path`, running `current_command`,
/// into `root`.
pub fn reroot_action(current_path: &Path, current_command: &str, root: &Path) -> Reroot {
    if same_dir(current_path, root) {
        return Reroot::Keep;
    }
    let command = current_command.trim().trim_start_matches('-');
    if SHELLS.contains(&command) {
        Reroot::ChangeDir
    } else {
        Reroot::Recreate
    }
}

fn same_dir(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}

/// Whether the last visible line of a pane is a password prompt,
/// e.g. `[sudo] password for dev:` or `Password:`.
pub fn awaiting_password(pane: &str) -> bool {
    pane.lines()
        .map(str::trim_end)
        .filter(|line| !line.is_empty())
        .last()
        .is_some_and(|line| line.ends_with(':') && line.to_ascii_lowercase().contains("password"))
}

/// Creates tmux sessions on demand, rooted at the workspace directory.
pub struct TmuxTerminalHost {
    working_dir: PathBuf,
}

impl TmuxTerminalHost {
    pub fn new(working_dir: PathBuf) -> Result<Self, TerminalError> {
        check_tmux_installed()?;
        Ok(Self { working_dir })
    }

    /// Whether a tmux session with this name exists.
    pub fn has_session(name: &str) -> Result<bool, TerminalError> {
        let output = Command::new("tmux")
            .args(["has-session", &format!("-t={}", session_name(name))])
            .output()?;
        Ok(output.status.success())
    }

    fn create_session(&self, session: &str) -> Result<(), TerminalError> {
        let working_dir = self.working_dir.to_string_lossy();
        run_tmux(&["new-session", "-d", "-s", session, "-c", &working_dir])?;
        run_tmux(&["set-option", "-t", session, "history-limit", "10000"])?;
        info!("Created terminal {} in {}", session, working_dir);
        Ok(())
    }

    /// Sessions outlive the process, so a reused one may sit in another
    /// project. Commands must only ever run in the workspace root.
    fn reroot_session(&self, session: &str) -> Result<(), TerminalError> {
        let output = run_tmux(&[
            "display-message",
            "-p",
            "-t",
            session,
            "#{pane_current_path}\t#{pane_current_command}",
        ])?;
        let stdout = String::from_utf8_lossy(&output.stdout);
        let (path, command) = stdout.trim_end().split_once('\t').unwrap_or((stdout.trim_end(), ""));

        match reroot_action(Path::new(path), command, &self.working_dir) {
            Reroot::Keep => {}
            Reroot::ChangeDir => {
                let cd = format!("cd -- {}", shell_quote(&self.working_dir.to_string_lossy()));
                TmuxTerminal::for_session(session).send_text(&cd)?;
                info!("Moved terminal {} from {} to {}", session, path, self.working_dir.display());
            }
            Reroot::Recreate => {
                warn!(
                    "Terminal {} is busy ({}) in {}; recreating it in {}",
                    session,
                    command,
                    path,
                    self.working_dir.display()
                );
                run_tmux(&["kill-session", "-t", session])?;
                self.create_session(session)?;
            }
        }
        Ok(())
    }
}

impl TerminalHost for TmuxTerminalHost {
    fn get_or_create_terminal(&self, name: &str) -> Result<Arc<dyn TerminalHandle>, TerminalError> {
        let session = session_name(name);

        if Self::has_session(name)? {
            self.reroot_session(&session)?;
        } else {
            self.create_session(&session)?;
        }

        Ok(Arc::new(TmuxTerminal::for_session(&session)))
    }
}

pub struct TmuxTerminal {
    name: String,
}

impl TmuxTerminal {
    fn for_session(session: &str) -> Self {
        Self {
            name: session.to_string(),
        }
    }

    /// Visible contents of the pane.
    pub fn capture(&self) -> Result<String, TerminalError> {
        let output = run_tmux(&["capture-pane", "-p", "-t", &self.name])?;
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    fn wait_for_password_prompt(&self) -> Result<bool, TerminalError> {
        for _ in 0..SECRET_PROMPT_POLLS {
            if awaiting_password(&self.capture()?) {
                return Ok(true);
            }
            thread::sleep(SECRET_PROMPT_INTERVAL);
        }
        Ok(false)
    }

    /// Puts `bytes` into a tmux paste buffer through stdin, keeping them off
    /// the process table.
    fn load_buffer(buffer: &str, bytes: &[u8]) -> Result<(), TerminalError> {
        let mut child = Command::new("tmux")
            .args(["load-buffer", "-b", buffer, "-"])
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()?;
        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(bytes)?;
        }
        let output = child.wait_with_output()?;
        if !output.status.success() {
            return Err(TerminalError::CommandFailed {
                command: "tmux load-buffer".to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(())
    }
}

impl TerminalHandle for TmuxTerminal {
    fn name(&self) -> String {
        self.name.clone()
    }

    fn send_text(&self, text: &str) -> Result<(), TerminalError> {
        // -l sends the text literally so words like "Enter" are not read as key names
        run_tmux(&["send-keys", "-t", &self.name, "-l", "--", text])?;
        run_tmux(&["send-keys", "-t", &self.name, "Enter"])?;
        debug!("Sent {} bytes to {}", text.len(), self.name);
        Ok(())
    }

    fn send_secret(&self, secret: Secret) -> Result<(), TerminalError> {
        // Only a waiting prompt has echo off; anything else would print the secret
        if !self.wait_for_password_prompt()? {
            return Err(TerminalError::NotAwaitingSecret(self.name.clone()));
        }

        let buffer = format!("{}-secret", self.name);
        Self::load_buffer(&buffer, secret.expose().as_bytes())?;
        if let Err(e) = run_tmux(&["paste-buffer", "-d", "-b", &buffer, "-t", &self.name]) {
            let _ = run_tmux(&["delete-buffer", "-b", &buffer]);
            return Err(e);
        }
        run_tmux(&["send-keys", "-t", &self.name, "Enter"])?;
        debug!("Answered password prompt in {}", self.name);
        Ok(())
    }

    fn show(&self) -> Result<(), TerminalError> {
        if std::env::var_os("TMUX").is_some() {
            run_tmux(&["switch-client", "-t", &self.name])?;
        } else {
            eprintln!("  ↳ follow along with: tmux attach -t {}", self.name);
        }
        Ok(())
    }

    fn dispose(&self) -> Result<(), TerminalError> {
        let output = Command::new("tmux")
            .args(["kill-session", "-t", &self.name])
            .output()?;

        // Killing a session that is already gone is fine
        if output.status.success() {
            info!("Disposed terminal {}", self.name);
        } else {
            debug!("Terminal {} was not running", self.name);
        }
        Ok(())
    }
}

/// Check if tmux is installed on the host
pub fn check_tmux_installed() -> Result<(), TerminalError> {
    let output = Command::new("which")
        .arg("tmux")
        .output()
        .map_err(|_| TerminalError::TmuxNotInstalled)?;

    if !output.status.success() {
        return Err(TerminalError::TmuxNotInstalled);
    }
    Ok(())
}

/// Sanitize a terminal name into a tmux session name.
pub fn session_name(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_whitespace() || c == '.' || c == ':' { '_' } else { c })
        .collect()
}

fn run_tmux(args: &[&str]) -> Result<Output, TerminalError> {
    let output = Command::new("tmux").args(args).output()?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        if stderr.contains("can't find session") || stderr.contains("no server running") {
            let target = args
                .iter()
                .position(|a| *a == "-t")
                .and_then(|i| args.get(i + 1))
                .map_or_else(String::new, |t| (*t).to_string());
            return Err(TerminalError::SessionNotFound(target));
        }
        return Err(TerminalError::CommandFailed {
            command: format!("tmux {}", args.first().copied().unwrap_or_default()),
            stderr,
        });
    }

    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_session_name_sanitized() {
        assert_eq!(session_name("gatsbyhub-server"), "gatsbyhub-server");
        assert_eq!(session_name("my site.dev"), "my_site_dev");
        assert_eq!(session_name("a:b"), "a_b");
    }

    #[test]
    fn test_reroot_action() {
        let site_a = TempDir::new().unwrap();
        let site_b = TempDir::new().unwrap();

        assert_eq!(reroot_action(site_a.path(), "bash", site_a.path()), Reroot::Keep);
        assert_eq!(reroot_action(site_a.path(), "node", site_a.path()), Reroot::Keep);
        assert_eq!(reroot_action(site_a.path(), "zsh", site_b.path()), Reroot::ChangeDir);
        assert_eq!(reroot_action(site_a.path(), "-bash", site_b.path()), Reroot::ChangeDir);
        assert_eq!(reroot_action(site_a.path(), "node", site_b.path()), Reroot::Recreate);
    }

    #[test]
    fn test_reroot_compares_resolved_paths() {
        let site = TempDir::new().unwrap();
        let dotted = site.path().join(".");
        assert_eq!(reroot_action(&dotted, "node", site.path()), Reroot::Keep);
    }

    #[test]
    fn test_awaiting_password() {
        assert!(awaiting_password("$ sudo npm install -g gatsby-cli\n[sudo] password for dev: \n\n"));
        assert!(awaiting_password("Password:"));
        assert!(!awaiting_password("$ sudo npm install -g gatsby-cli\n$ "));
        assert!(!awaiting_password("added 1 package\n$ "));
        assert!(!awaiting_password(""));
    }
}
