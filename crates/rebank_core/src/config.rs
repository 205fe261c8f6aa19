//! Connection descriptor consumed by the account repository.
//!
//! # Responsibility
//! - Describe which SQLite database to open and how to size the pool.
//! - Build that description from a URL, the process environment, or serde.
//!
//! # Invariants
//! - In-memory targets always use a single pooled connection.
//! - Configuration failures are reported as `ConfigError`, never as repository errors.

use serde::Deserialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub const DATABASE_URL_ENV: &str = "REBANK_DATABASE_URL";
pub const POOL_SIZE_ENV: &str = "REBANK_DB_POOL_SIZE";
pub const BUSY_TIMEOUT_ENV: &str = "REBANK_DB_BUSY_TIMEOUT_MS";

const MEMORY_URLS: &[&str] = &["sqlite::memory:", ":memory:"];
const SQLITE_SCHEME: &str = "sqlite://";

const DEFAULT_POOL_SIZE: u32 = 4;
const DEFAULT_BUSY_TIMEOUT_MS: u32 = 5_000;
const DEFAULT_CONNECT_TIMEOUT_MS: u64 = 5_000;

/// Where the account database lives.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DbTarget {
    File { path: PathBuf },
    Memory,
}

/// Ready-made connection parameters for `SqliteAccountRepository::connect`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ConnectionConfig {
    pub target: DbTarget,
    #[serde(default = "default_pool_size")]
    pub pool_size: u32,
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u32,
    #[serde(default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,
}

impl ConnectionConfig {
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self::with_target(DbTarget::File { path: path.into() })
    }

    pub fn memory() -> Self {
        Self::with_target(DbTarget::Memory)
    }

    fn with_target(target: DbTarget) -> Self {
        Self {
            target,
            pool_size: DEFAULT_POOL_SIZE,
            busy_timeout_ms: DEFAULT_BUSY_TIMEOUT_MS,
            connect_timeout_ms: DEFAULT_CONNECT_TIMEOUT_MS,
        }
    }

    /// Parses a connection string.
    ///
    /// Accepted forms: `sqlite::memory:`, `:memory:`, `sqlite://<path>`, or a
    /// bare filesystem path.
    ///
    /// # Errors
    /// - Returns `ConfigError::Invalid` for empty input or an empty path.
    pub fn from_url(url: &str) -> Result<Self, ConfigError> {
        let trimmed = url.trim();
        if trimmed.is_empty() {
            return Err(ConfigError::Invalid {
                key: DATABASE_URL_ENV,
                message: "database url cannot be empty".to_string(),
            });
        }

        if MEMORY_URLS.contains(&trimmed) {
            return Ok(Self::memory());
        }

        let path = trimmed.strip_prefix(SQLITE_SCHEME).unwrap_or(trimmed);
        if path.is_empty() {
            return Err(ConfigError::Invalid {
                key: DATABASE_URL_ENV,
                message: format!("database url `{trimmed}` has no path"),
            });
        }

        Ok(Self::file(path))
    }

    /// Loads configuration from `REBANK_*` environment variables.
    ///
    /// # Errors
    /// - `ConfigError::Missing` when `REBANK_DATABASE_URL` is unset.
    /// - `ConfigError::Invalid` when a value cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as `from_env`, reading values through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let url = lookup(DATABASE_URL_ENV).ok_or(ConfigError::Missing(DATABASE_URL_ENV))?;
        let mut config = Self::from_url(&url)?;

        if let Some(raw) = lookup(POOL_SIZE_ENV) {
            config.pool_size = parse_number(POOL_SIZE_ENV, &raw)?;
            if config.pool_size == 0 {
                return Err(ConfigError::Invalid {
                    key: POOL_SIZE_ENV,
                    message: "pool size must be at least 1".to_string(),
                });
            }
        }
        if let Some(raw) = lookup(BUSY_TIMEOUT_ENV) {
            config.busy_timeout_ms = parse_number(BUSY_TIMEOUT_ENV, &raw)?;
        }

        Ok(config)
    }

    /// Pool size after applying target constraints.
    ///
    /// Every SQLite in-memory connection is a separate database, so memory
    /// targets are pinned to one connection.
    pub fn effective_pool_size(&self) -> u32 {
        match self.target {
            DbTarget::Memory => 1,
            DbTarget::File { .. } => self.pool_size.max(1),
        }
    }

    /// Short label for log lines: `file` or `memory`.
    pub fn mode(&self) -> &'static str {
        match self.target {
            DbTarget::Memory => "memory",
            DbTarget::File { .. } => "file",
        }
    }
}

fn parse_number<T: std::str::FromStr>(key: &'static str, raw: &str) -> Result<T, ConfigError> {
    raw.trim().parse::<T>().map_err(|_| ConfigError::Invalid {
        key,
        message: format!("`{}` is not a valid number", raw.trim()),
    })
}

fn default_pool_size() -> u32 {
    DEFAULT_POOL_SIZE
}

fn default_busy_timeout_ms() -> u32 {
    DEFAULT_BUSY_TIMEOUT_MS
}

fn default_connect_timeout_ms() -> u64 {
    DEFAULT_CONNECT_TIMEOUT_MS
}

/// Errors raised while building a `ConnectionConfig`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid {
        key: &'static str,
        message: String,
    },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Missing(key) => write!(f, "missing required setting {key}"),
            Self::Invalid { key, message } => write!(f, "invalid {key}: {message}"),
        }
    }
}

impl Error for ConfigError {}
