//! Chart of accounts.
//!
//! This module implements the account reference data and directory rules:
//! - Account categories and their normal balance sides
//! - The account type registry (immutable reference data)
//! - The account entity and its hierarchy (parent tree)
//! - Cycle detection and ancestor walks

pub mod error;
pub mod hierarchy;
pub mod types;

pub use error::AccountError;
pub use hierarchy::{ancestor_chain, full_path, level, would_create_cycle};
pub use types::{
    Account, AccountCategory, AccountType, AccountTypeRegistry, BalanceSide, NewAccount,
};
