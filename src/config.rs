// ABOUTME: Application configuration loaded from TOML, plus the gatsby command lines derived from it

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur when loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file '{path}': {source}")]
    ParseError {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Config validation failed: {message}")]
    ValidationError { message: String },
}

/// Root configuration container.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub develop: DevelopConfig,
    #[serde(default)]
    pub build: BuildConfig,
    #[serde(default)]
    pub serve: ServeConfig,
    #[serde(default)]
    pub terminal: TerminalConfig,
    #[serde(default)]
    pub install: InstallConfig,
    #[serde(default)]
    pub registry: RegistryConfig,
}

/// Options for `gatsby develop`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DevelopConfig {
    #[serde(default = "default_develop_port")]
    pub port: u16,
    #[serde(default = "default_host")]
    pub host: String,
    /// Open the site in a browser once it is up (`-o`).
    #[serde(default = "default_true")]
    pub open: bool,
    /// Serve over HTTPS (`-S`).
    #[serde(default)]
    pub https: bool,
    /// How long to wait before assuming the server has bound its port.
    #[serde(default = "default_develop_settle_ms")]
    pub settle_ms: u64,
}

/// Options for `gatsby build`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildConfig {
    #[serde(default)]
    pub prefix_paths: bool,
}

/// Options for `gatsby serve`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServeConfig {
    #[serde(default = "default_serve_port")]
    pub port: u16,
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_true")]
    pub open: bool,
    #[serde(default)]
    pub prefix_paths: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TerminalConfig {
    /// Name of the general-purpose terminal; the dev server runs in `<session>-server`.
    #[serde(default = "default_session")]
    pub session: String,
    #[serde(default = "default_dispose_settle_ms")]
    pub dispose_settle_ms: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstallConfig {
    /// Force (or skip) `sudo` for the global gatsby-cli install. Unset means
    /// "decide from the platform".
    #[serde(default)]
    pub elevate: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryConfig {
    #[serde(default = "default_registry_url")]
    pub url: String,
    #[serde(default = "default_registry_timeout")]
    pub timeout_seconds: u64,
}

fn default_true() -> bool {
    true
}

fn default_develop_port() -> u16 {
    8000
}

fn default_serve_port() -> u16 {
    9000
}

fn default_host() -> String {
    "localhost".to_string()
}

fn default_develop_settle_ms() -> u64 {
    6000
}

fn default_dispose_settle_ms() -> u64 {
    3000
}

fn default_session() -> String {
    "gatsbyhub".to_string()
}

fn default_registry_url() -> String {
    "https://registry.npmjs.org".to_string()
}

fn default_registry_timeout() -> u64 {
    10
}

impl Default for DevelopConfig {
    fn default() -> Self {
        Self {
            port: default_develop_port(),
            host: default_host(),
            open: true,
            https: false,
            settle_ms: default_develop_settle_ms(),
        }
    }
}

impl Default for ServeConfig {
    fn default() -> Self {
        Self {
            port: default_serve_port(),
            host: default_host(),
            open: true,
            prefix_paths: false,
        }
    }
}

impl Default for TerminalConfig {
    fn default() -> Self {
        Self {
            session: default_session(),
            dispose_settle_ms: default_dispose_settle_ms(),
        }
    }
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            url: default_registry_url(),
            timeout_seconds: default_registry_timeout(),
        }
    }
}

impl AppConfig {
    /// Returns the path to the configuration file.
    ///
    /// Uses `~/.config/gatsby-hub/config.toml` on Unix/macOS,
    /// or equivalent on other platforms via `dirs::config_dir()`.
    /// Falls back to current directory if config_dir is unavailable.
    pub fn config_path() -> PathBuf {
        let config_dir = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        config_dir.join("gatsby-hub").join("config.toml")
    }

    /// Loads configuration from the default config file.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::config_path())
    }

    /// Loads configuration from `path`.
    ///
    /// - If the file doesn't exist, returns `AppConfig::default()`.
    /// - If the file exists, parses it as TOML and validates.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        let config: AppConfig = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            source: e,
        })?;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.develop.port == 0 || self.serve.port == 0 {
            return Err(ConfigError::ValidationError {
                message: "Ports must be between 1 and 65535".to_string(),
            });
        }

        if self.terminal.session.trim().is_empty() {
            return Err(ConfigError::ValidationError {
                message: "Terminal session name cannot be empty".to_string(),
            });
        }

        if self.registry.url.trim().is_empty() {
            return Err(ConfigError::ValidationError {
                message: "Registry URL cannot be empty".to_string(),
            });
        }

        Ok(())
    }

    pub fn develop_settle_delay(&self) -> Duration {
        Duration::from_millis(self.develop.settle_ms)
    }

    pub fn dispose_settle_delay(&self) -> Duration {
        Duration::from_millis(self.terminal.dispose_settle_ms)
    }

    pub fn server_terminal_name(&self) -> String {
        format!("{}-server", self.terminal.session)
    }

    pub fn develop_command(&self) -> String {
        let develop = &self.develop;
        let mut cmd = format!("gatsby develop -H {} -p {}", develop.host, develop.port);
        if develop.open {
            cmd.push_str(" -o");
        }
        if develop.https {
            cmd.push_str(" -S");
        }
        cmd
    }

    pub fn build_command(&self) -> String {
        if self.build.prefix_paths {
            "gatsby build --prefix-paths".to_string()
        } else {
            "gatsby build".to_string()
        }
    }

    pub fn serve_command(&self) -> String {
        let serve = &self.serve;
        let mut cmd = format!("gatsby serve -H {} -p {}", serve.host, serve.port);
        if serve.open {
            cmd.push_str(" -o");
        }
        if serve.prefix_paths {
            cmd.push_str(" --prefix-paths");
        }
        cmd
    }

    /// Whether the global CLI install needs `sudo` and a password.
    pub fn install_needs_elevation(&self) -> bool {
        self.install.elevate.unwrap_or_else(platform_needs_elevation)
    }
}

#[cfg(unix)]
fn platform_needs_elevation() -> bool {
    !nix::unistd::Uid::effective().is_root()
}

#[cfg(not(unix))]
fn platform_needs_elevation() -> bool {
    false
}
