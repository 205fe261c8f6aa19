//! Domain model for the account store.
//!
//! # Responsibility
//! - Define the record shape shared by repository and callers.
//!
//! # Invariants
//! - Every account is identified by a storage-assigned `AccountId`.
//! - Deletion is a hard delete; there is no tombstone state.

pub mod account;
