//! Configuration management for datastacks-shell.
//!
//! Configuration is loaded with the following priority (highest to lowest):
//! 1. Command-line arguments
//! 2. Environment variables
//! 3. Configuration file (JSON)
//! 4. Default values
//!
//! Connection values only seed the defaults offered by the startup
//! prompts unless prompting is disabled.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::cli::Args;
use crate::logging::DEFAULT_FILTER;
use crate::protocol::Framing;
use crate::session::SessionOptions;

pub const DEFAULT_HOST: &str = "localhost";
pub const DEFAULT_PORT: u16 = 3008;
pub const DEFAULT_PASSWORD: &str = "123";

/// Application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Connection configuration.
    pub connection: ConnectionSection,
    /// Logging configuration.
    pub logging: LoggingSection,
}

/// Connection configuration section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectionSection {
    /// Server host name or address.
    pub host: String,
    /// Server port.
    pub port: u16,
    /// Handshake password.
    pub password: String,
    /// Message framing.
    pub framing: Framing,
    /// Reply timeout in seconds; unset waits forever.
    pub read_timeout_secs: Option<u64>,
    /// Abort when the server does not answer `OK` to the handshake.
    pub strict_auth: bool,
    /// Ask for host, password and port at startup.
    pub prompt: bool,
}

impl Default for ConnectionSection {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            password: DEFAULT_PASSWORD.to_string(),
            framing: Framing::default(),
            read_timeout_secs: None,
            strict_auth: false,
            prompt: true,
        }
    }
}

/// Logging configuration section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Level or filter directive (error, warn, info, debug, trace).
    pub level: String,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: DEFAULT_FILTER.to_string(),
        }
    }
}

impl Config {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::Io)?;
        serde_json::from_str(&content).map_err(ConfigError::Json)
    }

    /// Apply environment variable overrides, reading them through `lookup`.
    pub fn apply_env_with<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("DATASTACKS_HOST").filter(|h| !h.is_empty()) {
            self.connection.host = host;
        }

        if let Some(port) = lookup("DATASTACKS_PORT") {
            self.connection.port = port
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidEnv("DATASTACKS_PORT", port))?;
        }

        if let Some(password) = lookup("DATASTACKS_PASSWORD").filter(|p| !p.is_empty()) {
            self.connection.password = password;
        }

        if let Some(level) = lookup("DATASTACKS_LOG_LEVEL") {
            self.logging.level = level;
        } else if let Some(level) = lookup("RUST_LOG") {
            self.logging.level = level;
        }

        Ok(())
    }

    /// Apply CLI argument overrides.
    pub fn apply_args(&mut self, args: &Args) {
        if let Some(ref host) = args.host {
            self.connection.host = host.clone();
        }

        if let Some(port) = args.port {
            self.connection.port = port;
        }

        if let Some(framing) = args.framing {
            self.connection.framing = framing;
        }

        if let Some(secs) = args.timeout {
            self.connection.read_timeout_secs = Some(secs);
        }

        if args.strict_auth {
            self.connection.strict_auth = true;
        }

        if args.no_prompt {
            self.connection.prompt = false;
        }

        if let Some(ref level) = args.log_level {
            self.logging.level = level.clone();
        }
    }

    /// Load configuration with full priority chain.
    ///
    /// Priority: CLI args > env vars > config file > defaults
    pub fn load(args: &Args) -> Result<Self, ConfigError> {
        Self::load_with(args, |key| std::env::var(key).ok())
    }

    /// Same as [`Config::load`], reading variables through `lookup`.
    pub fn load_with<F>(args: &Args, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match args.config {
            Some(ref path) => Config::from_file(path)?,
            None => Config::default(),
        };

        config.apply_env_with(lookup)?;
        config.apply_args(args);

        Ok(config)
    }

    /// Session options derived from the connection section.
    pub fn session_options(&self) -> SessionOptions {
        SessionOptions {
            framing: self.connection.framing,
            // A zero timeout would fail every read
            read_timeout: self
                .connection
                .read_timeout_secs
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs),
            strict_auth: self.connection.strict_auth,
        }
    }

    /// Get the log level filter string.
    pub fn log_filter(&self) -> &str {
        &self.logging.level
    }
}

/// Configuration errors.
#[derive(Debug)]
pub enum ConfigError {
    /// IO error reading config file.
    Io(std::io::Error),
    /// JSON parsing error.
    Json(serde_json::Error),
    /// Environment variable holds an unusable value.
    InvalidEnv(&'static str, String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "failed to read config file: {}", e),
            Self::Json(e) => write!(f, "failed to parse config file: {}", e),
            Self::InvalidEnv(name, value) => write!(f, "invalid value for {}: '{}'", name, value),
        }
    }
}

impl std::error::Error for ConfigError {}
