//! Core use-case services.
//!
//! # Responsibility
//! - Hand repository access to application code by injection.
//! - Keep callers decoupled from storage details.

pub mod account_service;
