//! Advance ledger error types.

use atelia_shared::types::AdvanceId;
use rust_decimal::Decimal;
use thiserror::Error;

use super::types::AdvanceStatus;
use crate::accounts::AccountError;
use crate::ledger::LedgerError;

/// Errors that can occur in the customer advance ledger.
#[derive(Debug, Error)]
pub enum AdvanceError {
    /// Consumption amount must be positive.
    #[error("Advance amount must be positive, got {0}")]
    InvalidAmount(Decimal),

    /// Requested more than the remaining amount.
    #[error("Cannot use {requested}: only {remaining} remaining")]
    ExceedsRemaining {
        /// The amount requested.
        requested: Decimal,
        /// The amount still available.
        remaining: Decimal,
    },

    /// Advance is not in a consumable status.
    #[error("Advance is {0:?} and cannot be consumed")]
    NotConsumable(AdvanceStatus),

    /// Only an untouched advance can be cancelled.
    #[error("Advance is {0:?} and cannot be cancelled")]
    NotCancellable(AdvanceStatus),

    /// Nothing remains to refund.
    #[error("Advance is {0:?} and cannot be refunded")]
    NotRefundable(AdvanceStatus),

    /// Advance not found.
    #[error("Advance not found: {0}")]
    NotFound(AdvanceId),

    /// The companion posting failed.
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// A required account is missing or invalid.
    #[error(transparent)]
    Account(#[from] AccountError),
}

impl AdvanceError {
    /// Returns the stable error code for this error.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidAmount(_) => "INVALID_ADVANCE_AMOUNT",
            Self::ExceedsRemaining { .. } => "EXCEEDS_REMAINING",
            Self::NotConsumable(_) => "ADVANCE_NOT_CONSUMABLE",
            Self::NotCancellable(_) => "ADVANCE_NOT_CANCELLABLE",
            Self::NotRefundable(_) => "ADVANCE_NOT_REFUNDABLE",
            Self::NotFound(_) => "ADVANCE_NOT_FOUND",
            Self::Ledger(err) => err.error_code(),
            Self::Account(err) => err.error_code(),
        }
    }
}
