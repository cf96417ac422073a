//! Transaction line domain types.

use atelia_shared::types::{AccountId, TransactionId, TransactionLineId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::LedgerError;
use crate::accounts::BalanceSide;

/// A single line in a transaction, debiting or crediting exactly one
/// account.
///
/// Exactly one of `debit`/`credit` is strictly positive; the other is zero.
/// Lines are immutable once the owning transaction is posted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionLine {
    /// Unique identifier for this line.
    pub id: TransactionLineId,
    /// The transaction this line belongs to.
    pub transaction_id: TransactionId,
    /// The account affected by this line.
    pub account_id: AccountId,
    /// Debit amount (zero if this is a credit line).
    pub debit: Decimal,
    /// Credit amount (zero if this is a debit line).
    pub credit: Decimal,
    /// Optional description for this line item.
    pub description: Option<String>,
}

impl TransactionLine {
    /// Builds a line from its input form.
    #[must_use]
    pub fn from_input(transaction_id: TransactionId, input: NewLine) -> Self {
        Self {
            id: TransactionLineId::new(),
            transaction_id,
            account_id: input.account_id,
            debit: input.debit,
            credit: input.credit,
            description: input.description,
        }
    }

    /// Checks the line exclusivity rule: exactly one of debit/credit is
    /// strictly positive and the other is exactly zero.
    ///
    /// # Errors
    ///
    /// Returns `NegativeAmount`, `LineBothSides`, or `LineNoAmount`.
    pub fn validate(&self) -> Result<(), LedgerError> {
        if self.debit < Decimal::ZERO || self.credit < Decimal::ZERO {
            return Err(LedgerError::NegativeAmount);
        }
        match (self.debit > Decimal::ZERO, self.credit > Decimal::ZERO) {
            (true, true) => Err(LedgerError::LineBothSides),
            (false, false) => Err(LedgerError::LineNoAmount),
            _ => Ok(()),
        }
    }

    /// Returns which side this line posts to.
    #[must_use]
    pub fn side(&self) -> BalanceSide {
        if self.debit > Decimal::ZERO {
            BalanceSide::Debit
        } else {
            BalanceSide::Credit
        }
    }

    /// Returns the line's amount regardless of side.
    #[must_use]
    pub fn amount(&self) -> Decimal {
        self.debit + self.credit
    }

    /// Returns the signed amount (positive for debit, negative for credit).
    #[must_use]
    pub fn signed_amount(&self) -> Decimal {
        self.debit - self.credit
    }

    /// Returns true if both sides are zero, an "empty" line flagged by
    /// reconciliation.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.debit.is_zero() && self.credit.is_zero()
    }
}

/// Input for a single line on a new or draft transaction.
#[derive(Debug, Clone)]
pub struct NewLine {
    /// The account to post to.
    pub account_id: AccountId,
    /// Debit amount (zero for credit lines).
    pub debit: Decimal,
    /// Credit amount (zero for debit lines).
    pub credit: Decimal,
    /// Optional description for this line item.
    pub description: Option<String>,
}

impl NewLine {
    /// A debit line for the given account and amount.
    #[must_use]
    pub fn debit(account_id: AccountId, amount: Decimal) -> Self {
        Self {
            account_id,
            debit: amount,
            credit: Decimal::ZERO,
            description: None,
        }
    }

    /// A credit line for the given account and amount.
    #[must_use]
    pub fn credit(account_id: AccountId, amount: Decimal) -> Self {
        Self {
            account_id,
            debit: Decimal::ZERO,
            credit: amount,
            description: None,
        }
    }

    /// Attaches a description to the line.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn line(debit: Decimal, credit: Decimal) -> TransactionLine {
        TransactionLine {
            id: TransactionLineId::new(),
            transaction_id: TransactionId::new(),
            account_id: AccountId::new(),
            debit,
            credit,
            description: None,
        }
    }

    #[test]
    fn test_valid_debit_line() {
        let l = line(dec!(100), dec!(0));
        assert!(l.validate().is_ok());
        assert_eq!(l.side(), BalanceSide::Debit);
        assert_eq!(l.amount(), dec!(100));
        assert_eq!(l.signed_amount(), dec!(100));
    }

    #[test]
    fn test_valid_credit_line() {
        let l = line(dec!(0), dec!(75.50));
        assert!(l.validate().is_ok());
        assert_eq!(l.side(), BalanceSide::Credit);
        assert_eq!(l.amount(), dec!(75.50));
        assert_eq!(l.signed_amount(), dec!(-75.50));
    }

    #[test]
    fn test_both_sides_rejected() {
        let l = line(dec!(100), dec!(100));
        assert!(matches!(l.validate(), Err(LedgerError::LineBothSides)));
    }

    #[test]
    fn test_no_amount_rejected() {
        let l = line(dec!(0), dec!(0));
        assert!(matches!(l.validate(), Err(LedgerError::LineNoAmount)));
        assert!(l.is_empty());
    }

    #[test]
    fn test_negative_amount_rejected() {
        let l = line(dec!(-100), dec!(0));
        assert!(matches!(l.validate(), Err(LedgerError::NegativeAmount)));
    }

    #[test]
    fn test_new_line_constructors() {
        let account = AccountId::new();
        let d = NewLine::debit(account, dec!(40)).with_description("cash in");
        assert_eq!(d.debit, dec!(40));
        assert_eq!(d.credit, dec!(0));
        assert_eq!(d.description.as_deref(), Some("cash in"));

        let c = NewLine::credit(account, dec!(40));
        assert_eq!(c.debit, dec!(0));
        assert_eq!(c.credit, dec!(40));
    }
}
