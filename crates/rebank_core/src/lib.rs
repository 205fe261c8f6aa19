//! Account persistence for reBank.
//! This crate owns the `account` table and every SQL statement run against it.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use config::{ConfigError, ConnectionConfig, DbTarget};
pub use logging::{default_log_level, init_logging, logging_status, LogSettings, LoggingError};
pub use model::account::{Account, AccountId, AccountValidationError};
pub use repo::account_repo::{
    AccountLookup, AccountRepository, RepoError, RepoResult, SqliteAccountRepository,
};
pub use service::account_service::AccountService;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
