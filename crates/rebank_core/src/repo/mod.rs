//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the account data access contract.
//! - Isolate SQLite query details from callers.
//!
//! # Invariants
//! - Repository APIs return semantic errors (`NotFound`, `Mapping`) in
//!   addition to transport errors.

pub mod account_repo;
