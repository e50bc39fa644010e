//! Module settings read from the environment.

use std::env;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use crate::ModuleError;

/// Default HTTP listen address.
const DEFAULT_HTTP_ADDR: &str = "0.0.0.0:7007";

/// Default plugin id; routes are mounted under `/api/<plugin_id>`.
const DEFAULT_PLUGIN_ID: &str = "catalog";

/// Default time between processing passes.
const DEFAULT_PROCESSING_INTERVAL_MS: u64 = 1000;

/// Default upper bound on entities in one mutation.
const DEFAULT_MAX_MUTATION_SIZE: usize = 10_000;

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = ModuleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pretty" | "text" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(ModuleError::config(format!("Unknown LOG_FORMAT '{}'", other))),
        }
    }
}

/// Settings for the catalog module.
#[derive(Debug, Clone)]
pub struct ModuleConfig {
    pub http_addr: SocketAddr,
    pub plugin_id: String,
    pub processing_interval: Duration,
    pub max_mutation_size: usize,
    pub log_format: LogFormat,
}

impl ModuleConfig {
    /// Read settings from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `CATALOG_HTTP_ADDR`: listen address (default: 0.0.0.0:7007)
    /// - `CATALOG_PLUGIN_ID`: route namespace (default: catalog)
    /// - `CATALOG_PROCESSING_INTERVAL_MS`: processing tick (default: 1000)
    /// - `CATALOG_MAX_MUTATION_SIZE`: mutation size limit (default: 10000)
    /// - `LOG_FORMAT`: `pretty` or `json` (default: pretty)
    pub fn from_env() -> Result<Self, ModuleError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Read settings through an arbitrary lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ModuleError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let http_addr = parse_or(&lookup, "CATALOG_HTTP_ADDR", DEFAULT_HTTP_ADDR)?;

        let plugin_id = lookup("CATALOG_PLUGIN_ID")
            .unwrap_or_else(|| DEFAULT_PLUGIN_ID.to_string())
            .trim()
            .trim_matches('/')
            .to_string();
        if plugin_id.is_empty() || plugin_id.contains('/') {
            return Err(ModuleError::config(format!(
                "CATALOG_PLUGIN_ID '{}' must be a single path segment",
                plugin_id
            )));
        }

        let interval_ms: u64 = parse_or(
            &lookup,
            "CATALOG_PROCESSING_INTERVAL_MS",
            &DEFAULT_PROCESSING_INTERVAL_MS.to_string(),
        )?;
        if interval_ms == 0 {
            return Err(ModuleError::config(
                "CATALOG_PROCESSING_INTERVAL_MS must be greater than zero",
            ));
        }

        let max_mutation_size = parse_or(
            &lookup,
            "CATALOG_MAX_MUTATION_SIZE",
            &DEFAULT_MAX_MUTATION_SIZE.to_string(),
        )?;

        let log_format = lookup("LOG_FORMAT")
            .map(|v| v.parse())
            .transpose()?
            .unwrap_or(LogFormat::Pretty);

        Ok(Self {
            http_addr,
            plugin_id,
            processing_interval: Duration::from_millis(interval_ms),
            max_mutation_size,
            log_format,
        })
    }

    /// Path prefix the module's routes are mounted under.
    pub fn route_prefix(&self) -> String {
        format!("/api/{}", self.plugin_id)
    }
}

impl Default for ModuleConfig {
    fn default() -> Self {
        Self {
            http_addr: SocketAddr::from(([0, 0, 0, 0], 7007)),
            plugin_id: DEFAULT_PLUGIN_ID.to_string(),
            processing_interval: Duration::from_millis(DEFAULT_PROCESSING_INTERVAL_MS),
            max_mutation_size: DEFAULT_MAX_MUTATION_SIZE,
            log_format: LogFormat::Pretty,
        }
    }
}

fn parse_or<T, F>(lookup: &F, key: &str, default: &str) -> Result<T, ModuleError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    let raw = lookup(key).unwrap_or_else(|| default.to_string());
    raw.trim()
        .parse()
        .map_err(|e| ModuleError::config(format!("Invalid {} '{}': {}", key, raw, e)))
}
