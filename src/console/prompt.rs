// ABOUTME: Stdin-backed prompts: free text, choices, and secrets typed without echo

use crate::host::{PromptProvider, Secret};
use async_trait::async_trait;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use std::io::{self, BufRead, Write};
use tracing::warn;

pub struct ConsolePrompt;

impl ConsolePrompt {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ConsolePrompt {
    fn default() -> Self {
        Self::new()
    }
}

/// Reads one line from stdin. `None` on EOF.
pub fn read_line(prompt: &str) -> io::Result<Option<String>> {
    let mut stderr = io::stderr();
    write!(stderr, "{prompt}")?;
    stderr.flush()?;

    let mut line = String::new();
    let read = io::stdin().lock().read_line(&mut line)?;
    if read == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
}

async fn read_line_blocking(prompt: String) -> Option<String> {
    match tokio::task::spawn_blocking(move || read_line(&prompt)).await {
        Ok(Ok(line)) => line,
        Ok(Err(e)) => {
            warn!("Failed to read from stdin: {}", e);
            None
        }
        Err(e) => {
            warn!("Prompt task failed: {}", e);
            None
        }
    }
}

/// Matches an answer against `options` by 1-based index or by name.
pub fn match_choice(answer: &str, options: &[&str]) -> Option<String> {
    let answer = answer.trim();
    if let Ok(index) = answer.parse::<usize>() {
        return index
            .checked_sub(1)
            .and_then(|i| options.get(i))
            .map(|option| (*option).to_string());
    }
    options
        .iter()
        .find(|option| option.eq_ignore_ascii_case(answer))
        .map(|option| (*option).to_string())
}

struct RawModeGuard;

impl RawModeGuard {
    fn enable() -> io::Result<Self> {
        enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
    }
}

fn read_secret(prompt: &str) -> io::Result<Option<String>> {
    let mut stderr = io::stderr();
    write!(stderr, "{prompt}: ")?;
    stderr.flush()?;

    // Piped stdin has no tty to put in raw mode
    let Ok(guard) = RawModeGuard::enable() else {
        return read_line("");
    };

    let mut value = String::new();
    let result = loop {
        match event::read()? {
            Event::Key(KeyEvent {
                code,
                modifiers,
                kind: KeyEventKind::Press,
                ..
            }) => match code {
                KeyCode::Enter => break Some(value),
                KeyCode::Esc => break None,
                KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => break None,
                KeyCode::Backspace => {
                    value.pop();
                }
                KeyCode::Char(c) => value.push(c),
                _ => {}
            },
            _ => {}
        }
    };

    drop(guard);
    writeln!(stderr)?;
    Ok(result)
}

#[async_trait]
impl PromptProvider for ConsolePrompt {
    async fn prompt_text(&self, placeholder: &str) -> Option<String> {
        read_line_blocking(format!("{placeholder}: ")).await
    }

    async fn prompt_secret(&self, placeholder: &str) -> Option<Secret> {
        let placeholder = placeholder.to_string();
        match tokio::task::spawn_blocking(move || read_secret(&placeholder)).await {
            Ok(Ok(value)) => value.map(Secret::new),
            Ok(Err(e)) => {
                warn!("Failed to read secret: {}", e);
                None
            }
            Err(e) => {
                warn!("Secret prompt task failed: {}", e);
                None
            }
        }
    }

    async fn prompt_choice(&self, message: &str, options: &[&str]) -> Option<String> {
        let mut menu = format!("{message}\n");
        for (i, option) in options.iter().enumerate() {
            menu.push_str(&format!("  {}) {}\n", i + 1, option));
        }
        menu.push_str("> ");

        let answer = read_line_blocking(menu).await?;
        match_choice(&answer, options)
    }
}
