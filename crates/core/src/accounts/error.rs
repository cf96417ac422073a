//! Account directory error types.

use atelia_shared::types::AccountId;
use thiserror::Error;

/// Errors that can occur in the account directory.
#[derive(Debug, Error)]
pub enum AccountError {
    /// Account code is empty after trimming.
    #[error("Account code cannot be empty")]
    EmptyCode,

    /// Account code is already taken.
    #[error("Account code already exists: {0}")]
    DuplicateCode(String),

    /// Parent assignment would make the account its own ancestor.
    #[error("Parent assignment would create a cycle for account {0}")]
    HierarchyCycle(AccountId),

    /// Referenced parent account does not exist.
    #[error("Parent account not found: {0}")]
    ParentNotFound(AccountId),

    /// Account not found.
    #[error("Account not found: {0}")]
    NotFound(AccountId),

    /// No account carries the given code.
    #[error("No account with code {0}")]
    CodeNotFound(String),

    /// Account has transaction lines and cannot be deleted.
    #[error("Account {0} has transaction lines and cannot be deleted")]
    HasTransactionLines(AccountId),
}

impl AccountError {
    /// Returns the stable error code for this error.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::EmptyCode => "EMPTY_CODE",
            Self::DuplicateCode(_) => "DUPLICATE_CODE",
            Self::HierarchyCycle(_) => "HIERARCHY_CYCLE",
            Self::ParentNotFound(_) => "PARENT_NOT_FOUND",
            Self::NotFound(_) => "ACCOUNT_NOT_FOUND",
            Self::CodeNotFound(_) => "ACCOUNT_CODE_NOT_FOUND",
            Self::HasTransactionLines(_) => "ACCOUNT_HAS_TRANSACTION_LINES",
        }
    }
}
