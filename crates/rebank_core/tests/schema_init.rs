use rebank_core::db::{account_columns, ACCOUNT_COLUMNS};
use rebank_core::{
    Account, AccountRepository, ConnectionConfig, RepoError, SqliteAccountRepository,
};
use rusqlite::Connection;
use std::path::Path;

fn connect_file(path: &Path) -> SqliteAccountRepository {
    match SqliteAccountRepository::connect(&ConnectionConfig::file(path)) {
        Ok(repo) => repo,
        Err(err) => panic!("connect failed: {err}"),
    }
}

#[test]
fn initialize_twice_keeps_schema_and_rows() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("rebank.db");
    let repo = connect_file(&path);

    repo.initialize().unwrap();
    repo.create_account(&Account::new("Olga", "O", "olga", "hash", 1))
        .unwrap();
    repo.initialize().unwrap();

    let conn = Connection::open(&path).unwrap();
    assert_eq!(account_columns(&conn).unwrap(), ACCOUNT_COLUMNS);
    assert_eq!(object_count(&conn, "table", "account"), 1);
    assert_eq!(object_count(&conn, "trigger", "account_number_serial"), 1);
    assert_eq!(repo.get_accounts().unwrap().len(), 1);
}

#[test]
fn initialize_on_memory_database_is_idempotent() {
    let repo = SqliteAccountRepository::connect(&ConnectionConfig::memory()).unwrap();
    repo.initialize().unwrap();
    repo.initialize().unwrap();
    assert!(repo.get_accounts().unwrap().is_empty());
}

#[test]
fn connect_fails_when_database_cannot_be_opened() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = ConnectionConfig::file(dir.path().join("missing").join("rebank.db"));
    config.connect_timeout_ms = 200;

    match SqliteAccountRepository::connect(&config) {
        Err(RepoError::Connection(_)) => {}
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("expected connection error"),
    }
}

#[test]
fn initialize_reports_schema_error_when_name_is_taken_by_a_view() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("view.db");
    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("CREATE VIEW account AS SELECT 1 AS id;")
        .unwrap();
    drop(conn);

    let repo = connect_file(&path);
    let err = repo.initialize().unwrap_err();
    assert!(matches!(err, RepoError::Schema(_)));
}

#[test]
fn operations_before_initialize_fail_with_read_or_write_errors() {
    let repo = SqliteAccountRepository::connect(&ConnectionConfig::memory()).unwrap();

    assert!(matches!(
        repo.get_accounts().unwrap_err(),
        RepoError::Read(_)
    ));
    assert!(matches!(
        repo.create_account(&Account::new("Pia", "P", "pia", "hash", 2))
            .unwrap_err(),
        RepoError::Write(_)
    ));
}

#[test]
fn close_releases_pool_and_data_survives_reconnect() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("reopen.db");

    let repo = connect_file(&path);
    repo.initialize().unwrap();
    repo.create_account(&Account::new("Quinn", "Q", "quinn", "hash", 31))
        .unwrap();
    repo.close();

    let reopened = connect_file(&path);
    reopened.initialize().unwrap();
    assert_eq!(reopened.get_account_by_user_name("quinn").unwrap().number, 31);
}

#[test]
fn rows_inserted_without_number_get_next_serial_value() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("serial.db");
    let repo = connect_file(&path);
    repo.initialize().unwrap();
    repo.create_account(&Account::new("Rita", "R", "rita", "hash", 500))
        .unwrap();

    let conn = Connection::open(&path).unwrap();
    conn.execute(
        "INSERT INTO account (username, first_name, last_name, encrypted_password, balance, created_at)
         VALUES ('sam', 'Sam', 'S', 'hash', 0, '2024-01-01 00:00:00+00:00');",
        [],
    )
    .unwrap();

    let sam = repo.get_account_by_number(501).unwrap();
    assert_eq!(sam.user_name, "sam");
}

#[test]
fn extra_column_is_a_mapping_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("drift.db");
    let repo = connect_file(&path);
    repo.initialize().unwrap();
    repo.create_account(&Account::new("Tom", "T", "tom", "hash", 9))
        .unwrap();

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("ALTER TABLE account ADD COLUMN nickname TEXT;")
        .unwrap();

    assert!(matches!(
        repo.get_account_by_number(9).unwrap_err(),
        RepoError::Mapping(_)
    ));
    assert!(matches!(
        repo.get_accounts().unwrap_err(),
        RepoError::Mapping(_)
    ));
}

#[test]
fn null_or_malformed_columns_are_mapping_errors() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("malformed.db");
    let repo = connect_file(&path);
    repo.initialize().unwrap();

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch(
        "INSERT INTO account (username, first_name, last_name, encrypted_password, number, balance, created_at)
         VALUES (NULL, 'Una', 'U', 'hash', 10, 0, '2024-01-01 00:00:00+00:00');
         INSERT INTO account (username, first_name, last_name, encrypted_password, number, balance, created_at)
         VALUES ('vic', 'Vic', 'V', 'hash', 11, 0, 'not a timestamp');",
    )
    .unwrap();

    let null_name = repo.get_account_by_number(10).unwrap_err();
    assert!(matches!(null_name, RepoError::Mapping(ref message) if message.contains("username")));

    let bad_time = repo.get_account_by_user_name("vic").unwrap_err();
    assert!(matches!(bad_time, RepoError::Mapping(ref message) if message.contains("created_at")));
}

fn object_count(conn: &Connection, kind: &str, name: &str) -> i64 {
    conn.query_row(
        "SELECT COUNT(*) FROM sqlite_master WHERE type = ?1 AND name = ?2;",
        [kind, name],
        |row| row.get(0),
    )
    .unwrap()
}
