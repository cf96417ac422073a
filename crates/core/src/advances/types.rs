//! Customer advance domain types.

use atelia_shared::types::{
    AdvanceId, AdvanceUsageId, CustomerId, OrderId, TransactionId, UserId,
};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::AdvanceError;
use crate::events::PaymentMethod;

/// Advance lifecycle status.
///
/// Outside the explicit `Refunded`/`Cancelled` overrides, status is a pure
/// function of `remaining_amount` relative to `amount`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdvanceStatus {
    /// Untouched: remaining equals the original amount.
    Active,
    /// Partially consumed: `0 < remaining < amount`.
    PartiallyUsed,
    /// Fully consumed: remaining is zero.
    FullyUsed,
    /// Remaining funds returned to the customer.
    Refunded,
    /// Cancelled before any consumption.
    Cancelled,
}

impl AdvanceStatus {
    /// Returns true if the advance can still be consumed.
    #[must_use]
    pub fn is_consumable(&self) -> bool {
        matches!(self, Self::Active | Self::PartiallyUsed)
    }

    /// Derives the status from consumption state.
    #[must_use]
    pub fn from_consumption(remaining: Decimal, amount: Decimal) -> Self {
        if remaining.is_zero() {
            Self::FullyUsed
        } else if remaining < amount {
            Self::PartiallyUsed
        } else {
            Self::Active
        }
    }
}

/// A customer prepayment held as a liability until consumed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerAdvance {
    /// Unique identifier.
    pub id: AdvanceId,
    /// Generated document number, assigned once and never reused.
    pub advance_number: String,
    /// The customer who paid.
    pub customer_id: CustomerId,
    /// The original amount received.
    pub amount: Decimal,
    /// The amount not yet consumed; `0 <= remaining_amount <= amount`.
    pub remaining_amount: Decimal,
    /// Lifecycle status.
    pub status: AdvanceStatus,
    /// The transaction that recorded receipt of the funds.
    pub receipt_transaction: Option<TransactionId>,
    /// How the funds were received.
    pub payment_method: PaymentMethod,
    /// Optional receipt number handed to the customer.
    pub receipt_number: Option<String>,
    /// User who recorded the advance.
    pub created_by: UserId,
    /// When the advance was recorded.
    pub created_at: DateTime<Utc>,
}

impl CustomerAdvance {
    /// Returns the consumed portion, `amount - remaining_amount`.
    #[must_use]
    pub fn used_amount(&self) -> Decimal {
        self.amount - self.remaining_amount
    }

    /// Checks that `amount` can be consumed right now, without mutating.
    ///
    /// # Errors
    ///
    /// Returns `NotConsumable`, `InvalidAmount`, or `ExceedsRemaining`.
    pub fn check_consumable(&self, amount: Decimal) -> Result<(), AdvanceError> {
        if !self.status.is_consumable() {
            return Err(AdvanceError::NotConsumable(self.status));
        }
        if amount <= Decimal::ZERO {
            return Err(AdvanceError::InvalidAmount(amount));
        }
        if amount > self.remaining_amount {
            return Err(AdvanceError::ExceedsRemaining {
                requested: amount,
                remaining: self.remaining_amount,
            });
        }
        Ok(())
    }

    /// Consumes `amount`: decrements the remaining amount and recomputes the
    /// status. Returns the new remaining amount.
    ///
    /// # Errors
    ///
    /// Same conditions as [`Self::check_consumable`]; on error nothing
    /// changes.
    pub fn consume(&mut self, amount: Decimal) -> Result<Decimal, AdvanceError> {
        self.check_consumable(amount)?;
        self.remaining_amount -= amount;
        self.status = AdvanceStatus::from_consumption(self.remaining_amount, self.amount);
        Ok(self.remaining_amount)
    }
}

/// An immutable record of one consumption event.
///
/// Append-only: usages are never edited or deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdvanceUsage {
    /// Unique identifier.
    pub id: AdvanceUsageId,
    /// The advance that was consumed.
    pub advance_id: AdvanceId,
    /// The order the amount was applied to, if any.
    pub order_id: Option<OrderId>,
    /// The amount consumed.
    pub amount: Decimal,
    /// User who applied the amount.
    pub created_by: UserId,
    /// When the amount was applied.
    pub created_at: DateTime<Utc>,
}

/// Input for issuing an advance.
#[derive(Debug, Clone)]
pub struct NewAdvance {
    /// The paying customer.
    pub customer_id: CustomerId,
    /// Amount received.
    pub amount: Decimal,
    /// How the funds were received.
    pub payment_method: PaymentMethod,
    /// Optional receipt number handed to the customer.
    pub receipt_number: Option<String>,
    /// Business date of the receipt.
    pub date: NaiveDate,
    /// User recording the advance.
    pub created_by: UserId,
}
