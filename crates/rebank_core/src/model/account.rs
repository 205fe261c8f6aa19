//! Account domain model.
//!
//! # Responsibility
//! - Define the single persisted record of the account store.
//! - Check column bounds before a record reaches storage.
//!
//! # Invariants
//! - `id` is assigned by storage and never changes afterwards.
//! - `id == 0` marks a record that has not been persisted.
//! - Neither `user_name` nor `number` is unique; lookups return the first match.

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Storage-assigned primary key of an account row.
pub type AccountId = i64;

/// Upper bound for `username`, `first_name` and `last_name` columns.
pub const MAX_NAME_CHARS: usize = 32;
/// Upper bound for the `encrypted_password` column.
pub const MAX_ENCRYPTED_PASSWORD_CHARS: usize = 64;

/// Bank account record as stored in the `account` table.
///
/// Field order mirrors the table's column order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Primary key. `0` until storage assigns one.
    pub id: AccountId,
    /// Serialized as `username` to match the column name.
    #[serde(rename = "username")]
    pub user_name: String,
    pub first_name: String,
    pub last_name: String,
    /// Already encrypted by the caller; stored as-is.
    pub encrypted_password: String,
    /// External account reference. Not enforced unique.
    pub number: i64,
    /// Minor currency units.
    pub balance: i64,
    pub created_at: DateTime<Utc>,
}

impl Account {
    /// Builds an unsaved account with zero balance, stamped with the current time.
    ///
    /// The timestamp is truncated to microseconds so the record compares equal
    /// after a storage round trip.
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        user_name: impl Into<String>,
        encrypted_password: impl Into<String>,
        number: i64,
    ) -> Self {
        Self {
            id: 0,
            user_name: user_name.into(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            encrypted_password: encrypted_password.into(),
            number,
            balance: 0,
            created_at: Utc::now().trunc_subsecs(6),
        }
    }

    /// Returns whether storage has assigned an identifier.
    pub fn is_persisted(&self) -> bool {
        self.id != 0
    }

    /// Checks column length bounds.
    ///
    /// # Errors
    /// - Returns `FieldTooLong` for the first field exceeding its bound.
    pub fn validate(&self) -> Result<(), AccountValidationError> {
        check_len("username", &self.user_name, MAX_NAME_CHARS)?;
        check_len("first_name", &self.first_name, MAX_NAME_CHARS)?;
        check_len("last_name", &self.last_name, MAX_NAME_CHARS)?;
        check_len(
            "encrypted_password",
            &self.encrypted_password,
            MAX_ENCRYPTED_PASSWORD_CHARS,
        )?;
        Ok(())
    }
}

fn check_len(
    field: &'static str,
    value: &str,
    max_chars: usize,
) -> Result<(), AccountValidationError> {
    let actual_chars = value.chars().count();
    if actual_chars > max_chars {
        return Err(AccountValidationError::FieldTooLong {
            field,
            max_chars,
            actual_chars,
        });
    }
    Ok(())
}

/// Validation failures for account records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccountValidationError {
    FieldTooLong {
        field: &'static str,
        max_chars: usize,
        actual_chars: usize,
    },
}

impl Display for AccountValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::FieldTooLong {
                field,
                max_chars,
                actual_chars,
            } => write!(
                f,
                "{field} is {actual_chars} characters long; at most {max_chars} allowed"
            ),
        }
    }
}

impl Error for AccountValidationError {}
