//! Application initialization and resource setup.
//!
//! This module provides functions to initialize the shared resources:
//! - Logger
//! - HTTP client
//! - Signature catalog
//! - Site parser
//!
//! All initialization functions return proper error types for error handling.

mod client;
mod logger;

use std::sync::Arc;

use log::info;

use crate::config::Config;
use crate::error_handling::InitializationError;
use crate::fetch::SiteParser;
use crate::signatures::SignatureCatalog;

// Re-export public API
pub use client::init_client;
pub use logger::init_logger_with;

/// Loads the signature catalog named by the configuration.
///
/// Uses the table at `config.signatures` when set, the built-in table otherwise.
///
/// # Errors
///
/// Returns `InitializationError::CatalogError` if the custom table is unreadable or
/// invalid.
pub fn init_catalog(config: &Config) -> Result<Arc<SignatureCatalog>, InitializationError> {
    let catalog = match &config.signatures {
        Some(path) => SignatureCatalog::from_path(path)?,
        None => SignatureCatalog::builtin().clone(),
    };
    info!("Signature catalog ready ({} signatures)", catalog.len());
    Ok(Arc::new(catalog))
}

/// Builds the site parser from the HTTP client and catalog.
///
/// # Errors
///
/// Propagates failures from [`init_client`] and [`init_catalog`].
pub fn init_site_parser(config: &Config) -> Result<Arc<SiteParser>, InitializationError> {
    let client = init_client(config)?;
    let catalog = init_catalog(config)?;
    Ok(Arc::new(SiteParser::new(client, catalog)))
}
