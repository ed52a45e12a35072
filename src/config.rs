//! Application configuration
//!
//! Defaults suit local development; each field can be overridden from the
//! environment.

use std::net::SocketAddr;
use std::time::Duration;
use thiserror::Error;

pub const ENV_DB: &str = "PETCONNECT_DB";
pub const ENV_ADDR: &str = "PETCONNECT_ADDR";
pub const ENV_WORKERS: &str = "PETCONNECT_WORKERS";
pub const ENV_SEED: &str = "PETCONNECT_SEED";
pub const ENV_CORS_ORIGIN: &str = "PETCONNECT_CORS_ORIGIN";
pub const ENV_BUSY_TIMEOUT_MS: &str = "PETCONNECT_BUSY_TIMEOUT_MS";
pub const ENV_LOG: &str = "RUST_LOG";

/// The dev servers the web client runs on.
pub const DEFAULT_CORS_ORIGINS: [&str; 3] = [
    "http://localhost:3000",
    "http://localhost:5173",
    "http://localhost:5174",
];

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{var}: invalid value `{value}` ({reason})")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

/// Application configuration structure
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// SQLite database file
    pub db_path: String,
    pub bind_addr: SocketAddr,
    /// Upper bound on request-handling threads
    pub max_workers: usize,
    /// Insert demo records into empty tables at startup
    pub seed_demo_data: bool,
    /// Browser origins allowed to call the API
    pub cors_origins: Vec<String>,
    pub busy_timeout: Duration,
    /// `tracing_subscriber::EnvFilter` directive
    pub log_filter: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            db_path: "petconnect.sqlite3".to_string(),
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            max_workers: 8,
            seed_demo_data: true,
            cors_origins: DEFAULT_CORS_ORIGINS.iter().map(|o| o.to_string()).collect(),
            busy_timeout: Duration::from_secs(5),
            log_filter: "info".to_string(),
        }
    }
}

impl AppConfig {
    /// Defaults overridden by the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Same as [`AppConfig::from_env`], reading variables through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Self::default();

        if let Some(v) = lookup(ENV_DB) {
            cfg.db_path = v;
        }
        if let Some(v) = lookup(ENV_ADDR) {
            cfg.bind_addr = parse(ENV_ADDR, &v)?;
        }
        if let Some(v) = lookup(ENV_WORKERS) {
            cfg.max_workers = parse(ENV_WORKERS, &v)?;
            if cfg.max_workers == 0 {
                return Err(invalid(ENV_WORKERS, &v, "must be at least 1"));
            }
        }
        if let Some(v) = lookup(ENV_SEED) {
            cfg.seed_demo_data = parse_flag(ENV_SEED, &v)?;
        }
        if let Some(v) = lookup(ENV_CORS_ORIGIN) {
            cfg.cors_origins = parse_origins(&v)?;
        }
        if let Some(v) = lookup(ENV_BUSY_TIMEOUT_MS) {
            cfg.busy_timeout = Duration::from_millis(parse(ENV_BUSY_TIMEOUT_MS, &v)?);
        }
        if let Some(v) = lookup(ENV_LOG) {
            cfg.log_filter = v;
        }

        Ok(cfg)
    }
}

fn invalid(var: &'static str, value: &str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        var,
        value: value.to_string(),
        reason: reason.into(),
    }
}

fn parse<T>(var: &'static str, value: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value.trim().parse().map_err(|e: T::Err| invalid(var, value, e.to_string()))
}

/// Comma-separated list, blanks ignored.
fn parse_origins(value: &str) -> Result<Vec<String>, ConfigError> {
    let origins: Vec<String> = value
        .split(',')
        .map(str::trim)
        .filter(|o| !o.is_empty())
        .map(|o| o.trim_end_matches('/').to_string())
        .collect();
    if origins.is_empty() {
        return Err(invalid(ENV_CORS_ORIGIN, value, "expected at least one origin"));
    }
    Ok(origins)
}

fn parse_flag(var: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(invalid(var, value, "expected true/false")),
    }
}
