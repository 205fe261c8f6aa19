//! Connection pool bootstrap for SQLite.
//!
//! # Responsibility
//! - Open file or in-memory SQLite pools from a `ConnectionConfig`.
//! - Configure pragmas on every pooled connection.
//! - Verify liveness with a round-trip query.
//!
//! # Invariants
//! - Memory pools hold exactly one connection that is never recycled.
//! - File pools run in WAL mode so readers do not block the single writer.
//! - `open_pool` does not touch the schema.

use super::DbResult;
use crate::config::{ConnectionConfig, DbTarget};
use log::{error, info};
use r2d2::{CustomizeConnection, Pool};
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::Connection;
use std::time::{Duration, Instant};

pub type ConnectionPool = Pool<SqliteConnectionManager>;
pub type PooledConnection = r2d2::PooledConnection<SqliteConnectionManager>;

#[derive(Debug)]
struct PragmaCustomizer {
    busy_timeout_ms: u32,
}

impl CustomizeConnection<Connection, rusqlite::Error> for PragmaCustomizer {
    fn on_acquire(&self, conn: &mut Connection) -> Result<(), rusqlite::Error> {
        conn.busy_timeout(Duration::from_millis(u64::from(self.busy_timeout_ms)))?;
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA foreign_keys = ON;",
        )?;
        Ok(())
    }
}

/// Builds a connection pool for the configured target.
///
/// # Side effects
/// - Opens at least one connection (creating the database file if missing).
/// - Emits `db_open` logging events with duration and status.
pub fn open_pool(config: &ConnectionConfig) -> DbResult<ConnectionPool> {
    let started_at = Instant::now();
    let mode = config.mode();
    info!("event=db_open module=db status=start mode={mode}");

    let manager = match &config.target {
        DbTarget::File { path } => SqliteConnectionManager::file(path),
        DbTarget::Memory => SqliteConnectionManager::memory(),
    };

    let mut builder = Pool::builder()
        .max_size(config.effective_pool_size())
        .connection_timeout(Duration::from_millis(config.connect_timeout_ms))
        .connection_customizer(Box::new(PragmaCustomizer {
            busy_timeout_ms: config.busy_timeout_ms,
        }));
    if matches!(config.target, DbTarget::Memory) {
        // The database disappears with its only connection.
        builder = builder.idle_timeout(None).max_lifetime(None);
    }

    match builder.build(manager) {
        Ok(pool) => {
            info!(
                "event=db_open module=db status=ok mode={mode} pool_size={} duration_ms={}",
                pool.max_size(),
                started_at.elapsed().as_millis()
            );
            Ok(pool)
        }
        Err(err) => {
            error!(
                "event=db_open module=db status=error mode={mode} duration_ms={} error_code=db_open_failed error={}",
                started_at.elapsed().as_millis(),
                err
            );
            Err(err.into())
        }
    }
}

/// Checks out one connection and runs `SELECT 1`.
pub fn ping(pool: &ConnectionPool) -> DbResult<()> {
    let conn = pool.get()?;
    conn.query_row("SELECT 1;", [], |row| row.get::<_, i64>(0))?;
    Ok(())
}
