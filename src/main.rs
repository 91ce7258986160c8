//! Main application entry point (CLI binary).
//!
//! This is a thin wrapper around the `widget_scout` library that handles:
//! - Command-line argument parsing
//! - Environment variable loading (.env file)
//! - Logger initialization
//! - Running the endpoint or a one-off check
//!
//! All core functionality is implemented in the library crate.

use std::process;

use anyhow::{Context, Result};
use clap::Parser;
use log::{info, warn};
use tokio_util::sync::CancellationToken;

use widget_scout::initialization::{init_logger_with, init_site_parser};
use widget_scout::server::{start_server, AppState};
use widget_scout::{normalize_url, Cli, Command, Config, DetectionMode, ParseOptions, ParserResult};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file (if it exists)
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    let config = Config::from(&cli);
    config.validate().context("Invalid configuration")?;

    init_logger_with(config.log_level.clone().into(), config.log_format.clone())
        .context("Failed to initialize logger")?;

    let outcome = match &cli.command {
        Command::Serve { .. } => serve(&config).await,
        Command::Check { url, mode } => check(&config, url, *mode).await,
    };

    if let Err(e) = outcome {
        eprintln!("widget_scout error: {:#}", e);
        process::exit(1);
    }
    Ok(())
}

async fn serve(config: &Config) -> Result<()> {
    let parser = init_site_parser(config).context("Failed to initialize site parser")?;
    let state = AppState {
        parser,
        timeout: config.fetch_timeout(),
    };

    let shutdown = CancellationToken::new();
    let signal_token = shutdown.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("Received Ctrl-C, shutting down");
                signal_token.cancel();
            }
            Err(e) => warn!("Failed to listen for Ctrl-C: {}", e),
        }
    });

    start_server(&config.bind_address, config.port, state, shutdown).await
}

async fn check(config: &Config, raw_url: &str, mode: DetectionMode) -> Result<()> {
    let url = normalize_url(raw_url)
        .with_context(|| format!("'{}' is not a valid website address", raw_url))?;
    let parser = init_site_parser(config).context("Failed to initialize site parser")?;

    let options = ParseOptions {
        mode,
        timeout: config.fetch_timeout(),
    };
    let result = match parser.parse_website(&url, options).await {
        Ok(result) => result,
        Err(e) => {
            warn!("Detection failed for {}: {}", url, e);
            ParserResult::fallback(&url, e.code)
        }
    };

    let json = serde_json::to_string_pretty(&result).context("Failed to serialize result")?;
    println!("{}", json);
    Ok(())
}
