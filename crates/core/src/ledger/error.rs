//! Ledger error types for validation and state errors.

use atelia_shared::types::{AccountId, TransactionId};
use rust_decimal::Decimal;
use thiserror::Error;

/// Errors that can occur during ledger operations.
#[derive(Debug, Error)]
pub enum LedgerError {
    // ========== Validation Errors ==========
    /// Line has both debit and credit positive.
    #[error("Line must debit or credit, not both")]
    LineBothSides,

    /// Line has neither debit nor credit positive.
    #[error("Line must carry a debit or a credit amount")]
    LineNoAmount,

    /// Line amount cannot be negative.
    #[error("Line amount cannot be negative")]
    NegativeAmount,

    /// Transaction must have at least 2 lines.
    #[error("Transaction must have at least 2 lines")]
    InsufficientLines,

    /// Transaction is not balanced (debits != credits).
    #[error("Transaction is not balanced. Debit: {debit}, Credit: {credit}")]
    Unbalanced {
        /// Total debit amount.
        debit: Decimal,
        /// Total credit amount.
        credit: Decimal,
    },

    /// Transaction totals are zero.
    #[error("Transaction totals must be positive")]
    EmptyTransaction,

    // ========== Account Errors ==========
    /// Account not found.
    #[error("Account not found: {0}")]
    AccountNotFound(AccountId),

    /// Account is inactive and cannot be posted to.
    #[error("Account {0} is inactive")]
    AccountInactive(AccountId),

    /// Account does not allow postings.
    #[error("Account {0} does not allow postings")]
    PostingNotAllowed(AccountId),

    // ========== Transaction State Errors ==========
    /// Transaction has already been posted.
    #[error("Transaction {0} has already been posted")]
    AlreadyPosted(TransactionId),

    /// Transaction has been cancelled.
    #[error("Transaction {0} has been cancelled")]
    TransactionCancelled(TransactionId),

    /// Only posted transactions can be reversed or cancelled.
    #[error("Transaction {0} is not posted")]
    NotPosted(TransactionId),

    /// Cannot modify a transaction that has left draft.
    #[error("Cannot modify a transaction that has left draft")]
    NotEditable,

    /// Can only delete draft transactions.
    #[error("Can only delete draft transactions")]
    CanOnlyDeleteDraft,

    /// Transaction not found.
    #[error("Transaction not found: {0}")]
    TransactionNotFound(TransactionId),
}

impl LedgerError {
    /// Returns the stable error code for this error.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::LineBothSides => "LINE_BOTH_SIDES",
            Self::LineNoAmount => "LINE_NO_AMOUNT",
            Self::NegativeAmount => "NEGATIVE_AMOUNT",
            Self::InsufficientLines => "INSUFFICIENT_LINES",
            Self::Unbalanced { .. } => "UNBALANCED_TRANSACTION",
            Self::EmptyTransaction => "EMPTY_TRANSACTION",
            Self::AccountNotFound(_) => "ACCOUNT_NOT_FOUND",
            Self::AccountInactive(_) => "ACCOUNT_INACTIVE",
            Self::PostingNotAllowed(_) => "POSTING_NOT_ALLOWED",
            Self::AlreadyPosted(_) => "ALREADY_POSTED",
            Self::TransactionCancelled(_) => "TRANSACTION_CANCELLED",
            Self::NotPosted(_) => "NOT_POSTED",
            Self::NotEditable => "NOT_EDITABLE",
            Self::CanOnlyDeleteDraft => "CAN_ONLY_DELETE_DRAFT",
            Self::TransactionNotFound(_) => "TRANSACTION_NOT_FOUND",
        }
    }

    /// Returns true if this is a validation error (caller's fault) rather
    /// than a state error.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::LineBothSides | Self::LineNoAmount | Self::NegativeAmount
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_error_codes() {
        assert_eq!(LedgerError::InsufficientLines.error_code(), "INSUFFICIENT_LINES");
        assert_eq!(
            LedgerError::Unbalanced {
                debit: dec!(100),
                credit: dec!(50),
            }
            .error_code(),
            "UNBALANCED_TRANSACTION"
        );
        assert_eq!(
            LedgerError::AlreadyPosted(TransactionId::new()).error_code(),
            "ALREADY_POSTED"
        );
    }

    #[test]
    fn test_error_display() {
        let err = LedgerError::Unbalanced {
            debit: dec!(100.00),
            credit: dec!(50.00),
        };
        assert_eq!(
            err.to_string(),
            "Transaction is not balanced. Debit: 100.00, Credit: 50.00"
        );
    }

    #[test]
    fn test_validation_classification() {
        assert!(LedgerError::LineBothSides.is_validation());
        assert!(LedgerError::LineNoAmount.is_validation());
        assert!(!LedgerError::InsufficientLines.is_validation());
        assert!(!LedgerError::AlreadyPosted(TransactionId::new()).is_validation());
    }
}
