use chrono::{TimeZone, Timelike, Utc};
use rebank_core::model::account::{MAX_ENCRYPTED_PASSWORD_CHARS, MAX_NAME_CHARS};
use rebank_core::{Account, AccountValidationError};

#[test]
fn account_new_sets_defaults() {
    let account = Account::new("Alice", "A", "alice", "hash", 1001);

    assert_eq!(account.id, 0);
    assert!(!account.is_persisted());
    assert_eq!(account.first_name, "Alice");
    assert_eq!(account.last_name, "A");
    assert_eq!(account.user_name, "alice");
    assert_eq!(account.encrypted_password, "hash");
    assert_eq!(account.number, 1001);
    assert_eq!(account.balance, 0);
    assert_eq!(account.created_at.nanosecond() % 1_000, 0);
}

#[test]
fn validate_accepts_fields_at_their_bounds() {
    let account = Account::new(
        "é".repeat(MAX_NAME_CHARS),
        "l".repeat(MAX_NAME_CHARS),
        "u".repeat(MAX_NAME_CHARS),
        "p".repeat(MAX_ENCRYPTED_PASSWORD_CHARS),
        1,
    );
    assert_eq!(account.validate(), Ok(()));
}

#[test]
fn validate_rejects_first_oversized_field() {
    let mut account = Account::new("Bob", "B", "bob", "hash", 2);
    account.last_name = "x".repeat(MAX_NAME_CHARS + 1);
    account.encrypted_password = "p".repeat(MAX_ENCRYPTED_PASSWORD_CHARS + 5);

    let err = account.validate().unwrap_err();
    assert_eq!(
        err,
        AccountValidationError::FieldTooLong {
            field: "last_name",
            max_chars: MAX_NAME_CHARS,
            actual_chars: MAX_NAME_CHARS + 1,
        }
    );
    assert!(err.to_string().contains("last_name"));
}

#[test]
fn account_serialization_uses_column_names() {
    let mut account = Account::new("Cara", "C", "cara", "hash", 3003);
    account.id = 7;
    account.balance = 250;
    account.created_at = Utc.with_ymd_and_hms(2024, 2, 29, 12, 0, 0).unwrap();

    let json = serde_json::to_value(&account).unwrap();
    assert_eq!(json["id"], 7);
    assert_eq!(json["username"], "cara");
    assert_eq!(json["first_name"], "Cara");
    assert_eq!(json["encrypted_password"], "hash");
    assert_eq!(json["number"], 3003);
    assert_eq!(json["balance"], 250);
    assert_eq!(json["created_at"], "2024-02-29T12:00:00Z");

    let decoded: Account = serde_json::from_value(json).unwrap();
    assert_eq!(decoded, account);
}
