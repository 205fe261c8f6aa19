//! Account repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide create/read/update/delete over the `account` table.
//! - Own the connection pool for the repository's lifetime.
//! - Map rows into `Account` through one shared routine.
//!
//! # Invariants
//! - Every public operation issues exactly one SQL statement.
//! - Lookups return the first matching row; duplicates are ignored.
//! - `create_account` does not report the assigned identifier.
//! - `update_account` performs no mutation and always succeeds.
//! - `delete_account` succeeds whether or not a row matched.

use crate::config::ConnectionConfig;
use crate::db::{self, ConnectionPool, DbError, PooledConnection, ACCOUNT_COLUMNS};
use crate::model::account::{Account, AccountId, AccountValidationError};
use chrono::{DateTime, Utc};
use log::{debug, error, info};
use rusqlite::types::{FromSql, ToSql};
use rusqlite::{params, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

const ACCOUNT_SELECT_SQL: &str = "SELECT * FROM account";

pub type RepoResult<T> = Result<T, RepoError>;

/// Key a lookup was performed with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccountLookup {
    Id(AccountId),
    Number(i64),
    UserName(String),
}

impl Display for AccountLookup {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Id(id) => write!(f, "account with id {id}"),
            Self::Number(number) => write!(f, "account with number {number}"),
            Self::UserName(user_name) => write!(f, "account with username {user_name}"),
        }
    }
}

/// Repository error for account persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    /// The database could not be opened or did not answer the ping.
    Connection(DbError),
    /// Table creation failed.
    Schema(DbError),
    /// An insert or delete failed to execute.
    Write(DbError),
    /// A select failed to prepare or execute.
    Read(DbError),
    /// A lookup matched no row.
    NotFound(AccountLookup),
    /// A row could not be converted into an `Account`.
    Mapping(String),
    /// The record violates column bounds and was not sent to storage.
    Validation(AccountValidationError),
}

impl RepoError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Stable token used as `error_code` in log events.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Connection(_) => "connection_failed",
            Self::Schema(_) => "schema_failed",
            Self::Write(_) => "write_failed",
            Self::Read(_) => "read_failed",
            Self::NotFound(_) => "not_found",
            Self::Mapping(_) => "mapping_failed",
            Self::Validation(_) => "validation_failed",
        }
    }

    fn read(err: impl Into<DbError>) -> Self {
        Self::Read(err.into())
    }

    fn write(err: impl Into<DbError>) -> Self {
        Self::Write(err.into())
    }
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Connection(err) => write!(f, "cannot connect to account database: {err}"),
            Self::Schema(err) => write!(f, "cannot create account table: {err}"),
            Self::Write(err) => write!(f, "account write failed: {err}"),
            Self::Read(err) => write!(f, "account read failed: {err}"),
            Self::NotFound(lookup) => write!(f, "{lookup} not found"),
            Self::Mapping(message) => write!(f, "cannot map account row: {message}"),
            Self::Validation(err) => write!(f, "{err}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Connection(err) | Self::Schema(err) | Self::Write(err) | Self::Read(err) => {
                Some(err)
            }
            Self::Validation(err) => Some(err),
            Self::NotFound(_) | Self::Mapping(_) => None,
        }
    }
}

impl From<AccountValidationError> for RepoError {
    fn from(value: AccountValidationError) -> Self {
        Self::Validation(value)
    }
}

/// Repository interface for account CRUD operations.
pub trait AccountRepository {
    fn create_account(&self, account: &Account) -> RepoResult<()>;
    fn update_account(&self, account: &Account) -> RepoResult<()>;
    fn delete_account(&self, id: AccountId) -> RepoResult<()>;
    fn get_accounts(&self) -> RepoResult<Vec<Account>>;
    fn get_account_by_id(&self, id: AccountId) -> RepoResult<Account>;
    fn get_account_by_number(&self, number: i64) -> RepoResult<Account>;
    fn get_account_by_user_name(&self, user_name: &str) -> RepoResult<Account>;
}

impl<R: AccountRepository + ?Sized> AccountRepository for &R {
    fn create_account(&self, account: &Account) -> RepoResult<()> {
        (**self).create_account(account)
    }

    fn update_account(&self, account: &Account) -> RepoResult<()> {
        (**self).update_account(account)
    }

    fn delete_account(&self, id: AccountId) -> RepoResult<()> {
        (**self).delete_account(id)
    }

    fn get_accounts(&self) -> RepoResult<Vec<Account>> {
        (**self).get_accounts()
    }

    fn get_account_by_id(&self, id: AccountId) -> RepoResult<Account> {
        (**self).get_account_by_id(id)
    }

    fn get_account_by_number(&self, number: i64) -> RepoResult<Account> {
        (**self).get_account_by_number(number)
    }

    fn get_account_by_user_name(&self, user_name: &str) -> RepoResult<Account> {
        (**self).get_account_by_user_name(user_name)
    }
}

/// SQLite-backed account repository.
///
/// Owns a connection pool, so one instance can be shared across threads
/// (for example behind an `Arc`). Operations take no in-process locks;
/// concurrent writers are serialized by SQLite itself.
pub struct SqliteAccountRepository {
    pool: ConnectionPool,
}

impl SqliteAccountRepository {
    /// Opens the pool and verifies liveness with a ping.
    ///
    /// # Errors
    /// - `RepoError::Connection` when the database cannot be opened or pinged.
    pub fn connect(config: &ConnectionConfig) -> RepoResult<Self> {
        let pool = db::open_pool(config).map_err(RepoError::Connection)?;
        if let Err(err) = db::ping(&pool) {
            error!(
                "event=repo_connect module=repo status=error mode={} error_code=ping_failed error={}",
                config.mode(),
                err
            );
            return Err(RepoError::Connection(err));
        }

        info!(
            "event=repo_connect module=repo status=ok mode={}",
            config.mode()
        );
        Ok(Self { pool })
    }

    /// Ensures the `account` table exists. Safe to call on every startup.
    ///
    /// # Errors
    /// - `RepoError::Schema` when a connection cannot be checked out or DDL fails.
    pub fn initialize(&self) -> RepoResult<()> {
        let started_at = Instant::now();
        let result = self
            .pool
            .get()
            .map_err(DbError::from)
            .and_then(|conn| db::ensure_schema(&conn));

        match result {
            Ok(()) => {
                info!(
                    "event=schema_init module=repo status=ok duration_ms={}",
                    started_at.elapsed().as_millis()
                );
                Ok(())
            }
            Err(err) => {
                error!(
                    "event=schema_init module=repo status=error duration_ms={} error_code=schema_failed error={}",
                    started_at.elapsed().as_millis(),
                    err
                );
                Err(RepoError::Schema(err))
            }
        }
    }

    /// Releases every pooled connection.
    pub fn close(self) {
        let state = self.pool.state();
        drop(self.pool);
        info!(
            "event=repo_close module=repo status=ok connections={}",
            state.connections
        );
    }

    fn conn_for_write(&self) -> RepoResult<PooledConnection> {
        self.pool.get().map_err(RepoError::write)
    }

    fn conn_for_read(&self) -> RepoResult<PooledConnection> {
        self.pool.get().map_err(RepoError::read)
    }

    fn find_first(
        &self,
        key_column: &'static str,
        key: &dyn ToSql,
        lookup: AccountLookup,
    ) -> RepoResult<Account> {
        let conn = self.conn_for_read()?;
        let mut stmt = conn
            .prepare(&format!("{ACCOUNT_SELECT_SQL} WHERE {key_column} = ?1;"))
            .map_err(RepoError::read)?;
        let mut rows = stmt.query([key]).map_err(RepoError::read)?;

        if let Some(row) = rows.next().map_err(RepoError::read)? {
            return parse_account_row(row);
        }

        Err(RepoError::NotFound(lookup))
    }
}

impl AccountRepository for SqliteAccountRepository {
    fn create_account(&self, account: &Account) -> RepoResult<()> {
        account.validate()?;

        let conn = self.conn_for_write()?;
        conn.execute(
            "INSERT INTO account (
                username,
                first_name,
                last_name,
                encrypted_password,
                number,
                balance,
                created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7);",
            params![
                account.user_name.as_str(),
                account.first_name.as_str(),
                account.last_name.as_str(),
                account.encrypted_password.as_str(),
                account.number,
                account.balance,
                account.created_at,
            ],
        )
        .map_err(|err| log_failure("account_create", RepoError::write(err)))?;

        debug!(
            "event=account_create module=repo status=ok number={}",
            account.number
        );
        Ok(())
    }

    fn update_account(&self, account: &Account) -> RepoResult<()> {
        // Updates are not persisted; callers rely on this returning Ok.
        debug!(
            "event=account_update module=repo status=skipped id={}",
            account.id
        );
        Ok(())
    }

    fn delete_account(&self, id: AccountId) -> RepoResult<()> {
        let conn = self.conn_for_write()?;
        let removed = conn
            .execute("DELETE FROM account WHERE id = ?1;", [id])
            .map_err(|err| log_failure("account_delete", RepoError::write(err)))?;

        debug!("event=account_delete module=repo status=ok id={id} rows={removed}");
        Ok(())
    }

    fn get_accounts(&self) -> RepoResult<Vec<Account>> {
        let conn = self.conn_for_read()?;
        let mut stmt = conn
            .prepare(&format!("{ACCOUNT_SELECT_SQL};"))
            .map_err(RepoError::read)?;
        let mut rows = stmt.query([]).map_err(RepoError::read)?;

        let mut accounts = Vec::new();
        while let Some(row) = rows.next().map_err(RepoError::read)? {
            accounts.push(parse_account_row(row).map_err(|err| log_failure("account_list", err))?);
        }

        debug!(
            "event=account_list module=repo status=ok count={}",
            accounts.len()
        );
        Ok(accounts)
    }

    fn get_account_by_id(&self, id: AccountId) -> RepoResult<Account> {
        self.find_first("id", &id, AccountLookup::Id(id))
            .map_err(|err| log_failure("account_get_by_id", err))
    }

    fn get_account_by_number(&self, number: i64) -> RepoResult<Account> {
        self.find_first("number", &number, AccountLookup::Number(number))
            .map_err(|err| log_failure("account_get_by_number", err))
    }

    fn get_account_by_user_name(&self, user_name: &str) -> RepoResult<Account> {
        self.find_first(
            "username",
            &user_name,
            AccountLookup::UserName(user_name.to_string()),
        )
        .map_err(|err| log_failure("account_get_by_user_name", err))
    }
}

/// Maps one `account` row positionally into an `Account`.
fn parse_account_row(row: &Row<'_>) -> RepoResult<Account> {
    let column_count = row.as_ref().column_count();
    if column_count != ACCOUNT_COLUMNS.len() {
        return Err(RepoError::Mapping(format!(
            "expected {} columns, row has {column_count}",
            ACCOUNT_COLUMNS.len()
        )));
    }

    Ok(Account {
        id: column(row, 0)?,
        user_name: column(row, 1)?,
        first_name: column(row, 2)?,
        last_name: column(row, 3)?,
        encrypted_password: column(row, 4)?,
        number: column(row, 5)?,
        balance: column(row, 6)?,
        created_at: column::<DateTime<Utc>>(row, 7)?,
    })
}

fn column<T: FromSql>(row: &Row<'_>, index: usize) -> RepoResult<T> {
    row.get(index).map_err(|err| {
        RepoError::Mapping(format!(
            "column {} (`{}`): {err}",
            index, ACCOUNT_COLUMNS[index]
        ))
    })
}

fn log_failure(event: &str, err: RepoError) -> RepoError {
    match &err {
        RepoError::NotFound(lookup) => {
            debug!("event={event} module=repo status=not_found key=\"{lookup}\"");
        }
        other => {
            error!(
                "event={event} module=repo status=error error_code={} error={}",
                other.code(),
                other
            );
        }
    }
    err
}
