//! Business rule validation for posting.

use atelia_shared::types::AccountId;
use rust_decimal::Decimal;

use super::error::LedgerError;
use super::line::TransactionLine;
use super::transaction::{Transaction, TransactionStatus};

/// Information about an account needed to validate a posting.
#[derive(Debug, Clone)]
pub struct AccountPostingInfo {
    /// The account ID.
    pub id: AccountId,
    /// Whether the account is active.
    pub is_active: bool,
    /// Whether the account allows postings.
    pub allow_transactions: bool,
}

/// Validates every line's exclusivity rule.
///
/// # Errors
///
/// Returns the first line's error, if any.
pub fn validate_lines(lines: &[TransactionLine]) -> Result<(), LedgerError> {
    for line in lines {
        line.validate()?;
    }
    Ok(())
}

/// Validates all posting preconditions for a transaction.
///
/// Preconditions, checked in order:
/// 1. Status is `Draft` (posted → `AlreadyPosted`, cancelled →
///    `TransactionCancelled`)
/// 2. At least 2 lines
/// 3. Every line satisfies the exclusivity rule
/// 4. Totals balance and are positive
/// 5. Every referenced account is active and allows postings
///
/// `account_info` resolves account state; it is only consulted after the
/// shape of the transaction itself has been validated.
///
/// # Errors
///
/// Returns a typed error identifying the failed precondition; the
/// transaction is untouched.
pub fn validate_for_posting<A>(
    transaction: &Transaction,
    account_info: A,
) -> Result<(), LedgerError>
where
    A: Fn(AccountId) -> Result<AccountPostingInfo, LedgerError>,
{
    match transaction.status {
        TransactionStatus::Draft => {}
        TransactionStatus::Posted => return Err(LedgerError::AlreadyPosted(transaction.id)),
        TransactionStatus::Cancelled => {
            return Err(LedgerError::TransactionCancelled(transaction.id));
        }
    }

    if transaction.lines.len() < 2 {
        return Err(LedgerError::InsufficientLines);
    }

    validate_lines(&transaction.lines)?;

    if !transaction.is_balanced() {
        return Err(LedgerError::Unbalanced {
            debit: transaction.total_debit,
            credit: transaction.total_credit,
        });
    }
    if transaction.total_debit <= Decimal::ZERO {
        return Err(LedgerError::EmptyTransaction);
    }

    for account_id in transaction.distinct_accounts() {
        let info = account_info(account_id)?;
        if !info.is_active {
            return Err(LedgerError::AccountInactive(account_id));
        }
        if !info.allow_transactions {
            return Err(LedgerError::PostingNotAllowed(account_id));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use atelia_shared::types::{TransactionId, TransactionLineId, UserId};
    use chrono::{NaiveDate, Utc};
    use rust_decimal_macros::dec;

    use crate::ledger::transaction::TransactionKind;

    fn transaction_with_lines(lines: Vec<(Decimal, Decimal)>) -> Transaction {
        let id = TransactionId::new();
        let lines: Vec<TransactionLine> = lines
            .into_iter()
            .map(|(debit, credit)| TransactionLine {
                id: TransactionLineId::new(),
                transaction_id: id,
                account_id: AccountId::new(),
                debit,
                credit,
                description: None,
            })
            .collect();
        let mut tx = Transaction {
            id,
            transaction_number: "PAY-202601-00001".to_string(),
            kind: TransactionKind::Payment,
            status: TransactionStatus::Draft,
            date: NaiveDate::from_ymd_opt(2026, 1, 15).unwrap(),
            description: "test".to_string(),
            reference: None,
            customer_id: None,
            order_id: None,
            payment_id: None,
            branch_id: None,
            reverses: None,
            total_debit: Decimal::ZERO,
            total_credit: Decimal::ZERO,
            created_by: UserId::new(),
            created_at: Utc::now(),
            posted_by: None,
            posted_at: None,
            lines,
        };
        tx.calculate_totals();
        tx
    }

    fn ok_account(id: AccountId) -> Result<AccountPostingInfo, LedgerError> {
        Ok(AccountPostingInfo {
            id,
            is_active: true,
            allow_transactions: true,
        })
    }

    #[test]
    fn test_balanced_transaction_passes() {
        let tx = transaction_with_lines(vec![(dec!(100), dec!(0)), (dec!(0), dec!(100))]);
        assert!(validate_for_posting(&tx, ok_account).is_ok());
    }

    #[test]
    fn test_unbalanced_transaction_fails() {
        let tx = transaction_with_lines(vec![(dec!(100), dec!(0)), (dec!(0), dec!(50))]);
        assert!(matches!(
            validate_for_posting(&tx, ok_account),
            Err(LedgerError::Unbalanced { .. })
        ));
    }

    #[test]
    fn test_single_line_fails() {
        let tx = transaction_with_lines(vec![(dec!(100), dec!(0))]);
        assert!(matches!(
            validate_for_posting(&tx, ok_account),
            Err(LedgerError::InsufficientLines)
        ));
    }

    #[test]
    fn test_zero_totals_fail() {
        let mut tx = transaction_with_lines(vec![(dec!(100), dec!(0)), (dec!(0), dec!(100))]);
        for line in &mut tx.lines {
            line.debit = Decimal::ZERO;
            line.credit = Decimal::ZERO;
        }
        tx.calculate_totals();
        // Zero-amount lines trip the line rule before the totals check.
        assert!(matches!(
            validate_for_posting(&tx, ok_account),
            Err(LedgerError::LineNoAmount)
        ));
    }

    #[test]
    fn test_already_posted_fails() {
        let mut tx = transaction_with_lines(vec![(dec!(100), dec!(0)), (dec!(0), dec!(100))]);
        tx.status = TransactionStatus::Posted;
        assert!(matches!(
            validate_for_posting(&tx, ok_account),
            Err(LedgerError::AlreadyPosted(_))
        ));
    }

    #[test]
    fn test_cancelled_fails() {
        let mut tx = transaction_with_lines(vec![(dec!(100), dec!(0)), (dec!(0), dec!(100))]);
        tx.status = TransactionStatus::Cancelled;
        assert!(matches!(
            validate_for_posting(&tx, ok_account),
            Err(LedgerError::TransactionCancelled(_))
        ));
    }

    #[test]
    fn test_inactive_account_fails() {
        let tx = transaction_with_lines(vec![(dec!(100), dec!(0)), (dec!(0), dec!(100))]);
        let inactive = |id: AccountId| {
            Ok(AccountPostingInfo {
                id,
                is_active: false,
                allow_transactions: true,
            })
        };
        assert!(matches!(
            validate_for_posting(&tx, inactive),
            Err(LedgerError::AccountInactive(_))
        ));
    }

    #[test]
    fn test_no_postings_allowed_fails() {
        let tx = transaction_with_lines(vec![(dec!(100), dec!(0)), (dec!(0), dec!(100))]);
        let header_only = |id: AccountId| {
            Ok(AccountPostingInfo {
                id,
                is_active: true,
                allow_transactions: false,
            })
        };
        assert!(matches!(
            validate_for_posting(&tx, header_only),
            Err(LedgerError::PostingNotAllowed(_))
        ));
    }

    #[test]
    fn test_line_with_both_sides_fails() {
        let tx = transaction_with_lines(vec![(dec!(100), dec!(100)), (dec!(0), dec!(100))]);
        assert!(matches!(
            validate_for_posting(&tx, ok_account),
            Err(LedgerError::LineBothSides)
        ));
    }
}
