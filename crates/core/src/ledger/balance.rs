//! Account balance calculations.
//!
//! Balances are always recomputable from the immutable line history. The
//! cached `current_balance` on an account is an optimization, never the
//! source of truth; this module is the authoritative recompute.

use rust_decimal::Decimal;

use super::line::TransactionLine;
use crate::accounts::BalanceSide;

/// Recomputes an account balance from its opening balance and posted lines.
///
/// Debit-normal accounts: `opening + debits - credits`. Credit-normal:
/// `opening + credits - debits`. Callers must pass only lines of **posted**
/// transactions that reference the account.
#[must_use]
pub fn recompute_balance<'a>(
    opening: Decimal,
    normal_balance: BalanceSide,
    lines: impl Iterator<Item = &'a TransactionLine>,
) -> Decimal {
    lines.fold(opening, |acc, line| {
        acc + normal_balance.balance_change(line.debit, line.credit)
    })
}
