//! SQLite storage bootstrap and schema entry points.
//!
//! # Responsibility
//! - Build the connection pool the repository owns.
//! - Create the `account` table idempotently.
//!
//! # Invariants
//! - Pooled connections have `foreign_keys=ON` and the configured busy timeout.
//! - Schema creation never alters an existing `account` table.

use std::error::Error;
use std::fmt::{Display, Formatter};

mod open;
pub mod schema;

pub use open::{open_pool, ping, ConnectionPool, PooledConnection};
pub use schema::{account_columns, ensure_schema, ACCOUNT_COLUMNS};

pub type DbResult<T> = Result<T, DbError>;

/// Transport-level failure from SQLite or the pool.
#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
    Pool(r2d2::Error),
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::Pool(err) => write!(f, "connection pool: {err}"),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::Pool(err) => Some(err),
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}

impl From<r2d2::Error> for DbError {
    fn from(value: r2d2::Error) -> Self {
        Self::Pool(value)
    }
}
