//! Account use-case service.
//!
//! # Responsibility
//! - Give application code an injectable entry point for account persistence.
//! - Delegate every call to the wrapped repository unchanged.
//!
//! # Invariants
//! - The service adds no business rules and never bypasses the repository.

use crate::model::account::{Account, AccountId};
use crate::repo::account_repo::{AccountRepository, RepoResult};

/// Use-case service wrapper for account CRUD operations.
pub struct AccountService<R: AccountRepository> {
    repo: R,
}

impl<R: AccountRepository> AccountService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Borrows the wrapped repository.
    pub fn repository(&self) -> &R {
        &self.repo
    }

    /// Stores a new account. The assigned identifier is not reported back.
    pub fn create_account(&self, account: &Account) -> RepoResult<()> {
        self.repo.create_account(account)
    }

    /// Accepted and ignored; see `AccountRepository::update_account`.
    pub fn update_account(&self, account: &Account) -> RepoResult<()> {
        self.repo.update_account(account)
    }

    pub fn delete_account(&self, id: AccountId) -> RepoResult<()> {
        self.repo.delete_account(id)
    }

    pub fn get_accounts(&self) -> RepoResult<Vec<Account>> {
        self.repo.get_accounts()
    }

    pub fn get_account_by_id(&self, id: AccountId) -> RepoResult<Account> {
        self.repo.get_account_by_id(id)
    }

    pub fn get_account_by_number(&self, number: i64) -> RepoResult<Account> {
        self.repo.get_account_by_number(number)
    }

    pub fn get_account_by_user_name(&self, user_name: &str) -> RepoResult<Account> {
        self.repo.get_account_by_user_name(user_name)
    }
}
