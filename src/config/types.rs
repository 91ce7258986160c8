//! Configuration types and CLI options.
//!
//! This module defines enums and structs used for command-line argument parsing
//! and configuration.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::config::constants::{
    DEFAULT_BIND_ADDRESS, DEFAULT_FETCH_TIMEOUT_MS, DEFAULT_PORT, DEFAULT_USER_AGENT,
    MAX_FETCH_TIMEOUT_MS, MIN_FETCH_TIMEOUT_MS,
};
use crate::detection::DetectionMode;
use crate::error_handling::ConfigError;

/// Logging level for the application.
///
/// Controls the verbosity of log output, from most restrictive (Error) to most
/// verbose (Trace).
#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    /// Only error messages
    Error,
    /// Error and warning messages
    Warn,
    /// Error, warning, and informational messages
    Info,
    /// All messages except trace
    Debug,
    /// All messages including trace
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Log output format.
///
/// - `Plain`: Human-readable format with colors (default)
/// - `Json`: Structured JSON format for machine parsing
#[derive(Clone, Debug, ValueEnum)]
pub enum LogFormat {
    /// Human-readable format with colors (default)
    Plain,
    /// Structured JSON format for machine parsing
    Json,
}

/// Library configuration (no CLI dependencies).
///
/// Shared by the detection endpoint and the one-shot `check` command.
///
/// # Examples
///
/// ```no_run
/// use widget_scout::Config;
///
/// let config = Config {
///     timeout_ms: 3000,
///     ..Default::default()
/// };
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// Log level
    pub log_level: LogLevel,

    /// Log format
    pub log_format: LogFormat,

    /// Outbound fetch deadline in milliseconds
    pub timeout_ms: u64,

    /// HTTP User-Agent header value for the outbound fetch
    pub user_agent: String,

    /// Alternative signature table (JSON file); built-in table when `None`
    pub signatures: Option<PathBuf>,

    /// Address the endpoint binds to
    pub bind_address: String,

    /// Port the endpoint listens on
    pub port: u16,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: LogLevel::Info,
            log_format: LogFormat::Plain,
            timeout_ms: DEFAULT_FETCH_TIMEOUT_MS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            signatures: None,
            bind_address: DEFAULT_BIND_ADDRESS.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

impl Config {
    /// Checks that the values are usable before any resource is created.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` naming the first offending option.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(MIN_FETCH_TIMEOUT_MS..=MAX_FETCH_TIMEOUT_MS).contains(&self.timeout_ms) {
            return Err(ConfigError::InvalidTimeout {
                value: self.timeout_ms,
                min: MIN_FETCH_TIMEOUT_MS,
                max: MAX_FETCH_TIMEOUT_MS,
            });
        }
        if self.user_agent.trim().is_empty() {
            return Err(ConfigError::EmptyUserAgent);
        }
        if self.bind_address.trim().is_empty() {
            return Err(ConfigError::EmptyBindAddress);
        }
        Ok(())
    }

    /// Outbound fetch deadline as a `Duration`
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Command-line interface.
///
/// # Examples
///
/// ```bash
/// # Run the detection endpoint
/// widget_scout serve --port 8080
///
/// # One-shot detection, printed as JSON
/// widget_scout check example.ru --mode widgets
/// ```
#[derive(Debug, Parser)]
#[command(
    name = "widget_scout",
    about = "Detects chat widgets, analytics trackers and messengers installed on a website."
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOptions,

    #[command(subcommand)]
    pub command: Command,
}

/// Options shared by every subcommand
#[derive(Debug, Args)]
pub struct GlobalOptions {
    /// Log level: error|warn|info|debug|trace
    #[arg(long, global = true, value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,

    /// Log format: plain|json
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Plain)]
    pub log_format: LogFormat,

    /// Outbound fetch deadline in milliseconds
    #[arg(long, global = true, env = "WIDGET_SCOUT_TIMEOUT_MS", default_value_t = DEFAULT_FETCH_TIMEOUT_MS)]
    pub timeout_ms: u64,

    /// HTTP User-Agent header value for the outbound fetch
    #[arg(long, global = true, default_value = DEFAULT_USER_AGENT)]
    pub user_agent: String,

    /// Signature table to load instead of the built-in one (JSON file)
    #[arg(long, global = true, env = "WIDGET_SCOUT_SIGNATURES")]
    pub signatures: Option<PathBuf>,
}

/// Subcommands
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the detection endpoint
    Serve {
        /// Address to bind
        #[arg(long, default_value = DEFAULT_BIND_ADDRESS)]
        bind: String,

        /// Port to listen on
        #[arg(long, env = "WIDGET_SCOUT_PORT", default_value_t = DEFAULT_PORT)]
        port: u16,
    },
    /// Detect services on a single site and print the result as JSON
    Check {
        /// Domain or URL to inspect
        url: String,

        /// Which signature categories to evaluate
        #[arg(long, value_enum, default_value_t = DetectionMode::All)]
        mode: DetectionMode,
    },
}

impl From<&Cli> for Config {
    fn from(cli: &Cli) -> Self {
        let (bind_address, port) = match &cli.command {
            Command::Serve { bind, port } => (bind.clone(), *port),
            Command::Check { .. } => (DEFAULT_BIND_ADDRESS.to_string(), DEFAULT_PORT),
        };
        Self {
            log_level: cli.global.log_level.clone(),
            log_format: cli.global.log_format.clone(),
            timeout_ms: cli.global.timeout_ms,
            user_agent: cli.global.user_agent.clone(),
            signatures: cli.global.signatures.clone(),
            bind_address,
            port,
        }
    }
}
