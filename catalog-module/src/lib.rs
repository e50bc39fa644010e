//! # Catalog Module
//!
//! Wires the fixture provider, the processors and the in-memory catalog
//! into a runnable service.
//!
//! This crate provides configuration, dependency wiring and the HTTP
//! router mounted under the plugin namespace.

pub mod config;

pub use config::{Dependencies, LogFormat, ModuleConfig};

use thiserror::Error;

/// Errors that can occur during module initialization or execution.
#[derive(Error, Debug)]
pub enum ModuleError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Provider error during registration.
    #[error("Provider error: {0}")]
    ProviderError(#[from] catalog_ingest::ProviderError),

    /// Ingest error.
    #[error("Ingest error: {0}")]
    IngestError(#[from] catalog_ingest::IngestError),

    /// IO error.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl ModuleError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }
}
