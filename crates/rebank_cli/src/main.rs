//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify that `rebank_core` can connect, create its schema, and read accounts.
//! - Keep output deterministic for quick local sanity checks.

use rebank_core::{
    core_version, default_log_level, init_logging, AccountRepository, ConfigError,
    ConnectionConfig, LogSettings, SqliteAccountRepository,
};
use std::error::Error;
use std::process::ExitCode;

const LOG_DIR_ENV: &str = "REBANK_LOG_DIR";
const FALLBACK_DATABASE_URL: &str = "sqlite::memory:";

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("rebank error={err}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    if let Ok(log_dir) = std::env::var(LOG_DIR_ENV) {
        init_logging(&LogSettings::new(default_log_level(), log_dir))?;
    }

    let config = match ConnectionConfig::from_env() {
        Ok(config) => config,
        Err(ConfigError::Missing(_)) => ConnectionConfig::from_url(FALLBACK_DATABASE_URL)?,
        Err(err) => return Err(err.into()),
    };

    let repo = SqliteAccountRepository::connect(&config)?;
    repo.initialize()?;
    let accounts = repo.get_accounts()?;

    println!("rebank_core version={}", core_version());
    println!("rebank_core mode={} accounts={}", config.mode(), accounts.len());

    repo.close();
    Ok(())
}
