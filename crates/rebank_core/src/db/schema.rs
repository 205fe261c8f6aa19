//! `account` table definition.
//!
//! # Invariants
//! - DDL is `IF NOT EXISTS` only; running it again never alters the table.
//! - `ACCOUNT_COLUMNS` matches the table's column order, which row mapping relies on.
//! - `username` and `number` carry no unique index.

use super::DbResult;
use rusqlite::Connection;

/// Column names of `account`, in declaration order.
pub const ACCOUNT_COLUMNS: [&str; 8] = [
    "id",
    "username",
    "first_name",
    "last_name",
    "encrypted_password",
    "number",
    "balance",
    "created_at",
];

// `number` emulates a serial column: SQLite only auto-increments the rowid,
// so rows inserted without a number get MAX(number) + 1.
const ACCOUNT_SCHEMA_SQL: &str = "
CREATE TABLE IF NOT EXISTS account (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    username VARCHAR(32),
    first_name VARCHAR(32),
    last_name VARCHAR(32),
    encrypted_password VARCHAR(64),
    number INTEGER,
    balance INTEGER,
    created_at TIMESTAMP
);

CREATE TRIGGER IF NOT EXISTS account_number_serial
AFTER INSERT ON account
FOR EACH ROW WHEN NEW.number IS NULL
BEGIN
    UPDATE account
    SET number = (SELECT COALESCE(MAX(number), 0) + 1 FROM account)
    WHERE id = NEW.id;
END;
";

/// Creates the `account` table and its number trigger when missing.
pub fn ensure_schema(conn: &Connection) -> DbResult<()> {
    conn.execute_batch(ACCOUNT_SCHEMA_SQL)?;
    Ok(())
}

/// Reads the live column names of `account` in declaration order.
///
/// Returns an empty vector when the table does not exist.
pub fn account_columns(conn: &Connection) -> DbResult<Vec<String>> {
    let mut stmt = conn.prepare("SELECT name FROM pragma_table_info('account') ORDER BY cid;")?;
    let names = stmt
        .query_map([], |row| row.get::<_, String>(0))?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(names)
}
