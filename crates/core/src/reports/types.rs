//! Report and audit row types.

use atelia_shared::types::{AccountId, CustomerId, TransactionId, TransactionLineId};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::ledger::TransactionLine;

/// One account's posted activity for the trial balance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountBalanceRow {
    /// The account.
    pub account_id: AccountId,
    /// Account code.
    pub code: String,
    /// Account name.
    pub name: String,
    /// Sum of posted debits against the account.
    pub total_debit: Decimal,
    /// Sum of posted credits against the account.
    pub total_credit: Decimal,
    /// Normal-balance-signed balance.
    pub balance: Decimal,
}

/// System-wide trial balance totals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrialBalanceTotals {
    /// Sum of all account debit totals.
    pub total_debit: Decimal,
    /// Sum of all account credit totals.
    pub total_credit: Decimal,
    /// Whether the books balance (debits == credits).
    pub is_balanced: bool,
}

/// Trial balance report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrialBalanceReport {
    /// Per-account rows, ordered by account code.
    pub rows: Vec<AccountBalanceRow>,
    /// System-wide totals.
    pub totals: TrialBalanceTotals,
}

/// A posted line paired with its transaction's display fields, as input to
/// statement building.
#[derive(Debug, Clone)]
pub struct PostedLine {
    /// Business date of the owning transaction.
    pub date: NaiveDate,
    /// Document number of the owning transaction.
    pub transaction_number: String,
    /// Description of the owning transaction.
    pub description: String,
    /// The line itself.
    pub line: TransactionLine,
}

/// One row of an account statement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatementLine {
    /// Business date.
    pub date: NaiveDate,
    /// Document number.
    pub transaction_number: String,
    /// Description.
    pub description: String,
    /// Debit amount.
    pub debit: Decimal,
    /// Credit amount.
    pub credit: Decimal,
    /// Balance after this line.
    pub running_balance: Decimal,
}

/// Chronological posted lines for one account with running balance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountStatement {
    /// The account.
    pub account_id: AccountId,
    /// Balance before the first listed line.
    pub opening_balance: Decimal,
    /// Statement rows in chronological order.
    pub lines: Vec<StatementLine>,
    /// Balance after the last listed line.
    pub closing_balance: Decimal,
}

/// An account whose cached balance disagrees with the recompute.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BalanceMismatch {
    /// The account.
    pub account_id: AccountId,
    /// Account code.
    pub code: String,
    /// The cached `current_balance`.
    pub cached: Decimal,
    /// The balance recomputed from posted lines.
    pub recomputed: Decimal,
    /// `cached - recomputed`.
    pub difference: Decimal,
}

/// A summary whose stored debt disagrees with the recompute.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryMismatch {
    /// The customer.
    pub customer_id: CustomerId,
    /// The stored `total_debt`.
    pub stored_debt: Decimal,
    /// The debt recomputed from orders and payments.
    pub recomputed_debt: Decimal,
    /// `stored_debt - recomputed_debt`.
    pub difference: Decimal,
}

/// A transaction whose totals do not balance, found by audit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnbalancedTransaction {
    /// The transaction.
    pub transaction_id: TransactionId,
    /// Document number.
    pub transaction_number: String,
    /// Stored total debit.
    pub total_debit: Decimal,
    /// Stored total credit.
    pub total_credit: Decimal,
    /// Ids of zero-amount ("empty") lines on the transaction.
    pub empty_lines: Vec<TransactionLineId>,
}
