//! Report generation.

use rust_decimal::Decimal;

use super::types::{
    AccountBalanceRow, AccountStatement, PostedLine, StatementLine, TrialBalanceReport,
    TrialBalanceTotals,
};
use crate::accounts::BalanceSide;
use atelia_shared::types::AccountId;

/// Generates a trial balance from per-account activity rows.
///
/// The trial balance verifies that total debits equal total credits across
/// the whole ledger. Rows come back sorted by account code.
#[must_use]
pub fn trial_balance(mut rows: Vec<AccountBalanceRow>) -> TrialBalanceReport {
    rows.sort_by(|a, b| a.code.cmp(&b.code));

    let total_debit: Decimal = rows.iter().map(|row| row.total_debit).sum();
    let total_credit: Decimal = rows.iter().map(|row| row.total_credit).sum();

    TrialBalanceReport {
        rows,
        totals: TrialBalanceTotals {
            total_debit,
            total_credit,
            is_balanced: total_debit == total_credit,
        },
    }
}

/// Builds an account statement with a running balance.
///
/// `lines` must already be filtered to posted lines of the account and
/// sorted chronologically; the running balance applies each line's
/// normal-balance-signed change on top of the opening balance.
#[must_use]
pub fn build_statement(
    account_id: AccountId,
    opening_balance: Decimal,
    normal_balance: BalanceSide,
    lines: Vec<PostedLine>,
) -> AccountStatement {
    let mut running = opening_balance;
    let statement_lines: Vec<StatementLine> = lines
        .into_iter()
        .map(|posted| {
            running += normal_balance.balance_change(posted.line.debit, posted.line.credit);
            StatementLine {
                date: posted.date,
                transaction_number: posted.transaction_number,
                description: posted.description,
                debit: posted.line.debit,
                credit: posted.line.credit,
                running_balance: running,
            }
        })
        .collect();

    AccountStatement {
        account_id,
        opening_balance,
        lines: statement_lines,
        closing_balance: running,
    }
}

/// Returns true if a cached value diverges from its recompute beyond the
/// tolerance.
///
/// Applied uniformly by every audit; pass `Decimal::ZERO` for exact
/// equality.
#[must_use]
pub fn diverges(cached: Decimal, recomputed: Decimal, tolerance: Decimal) -> bool {
    (cached - recomputed).abs() > tolerance
}

#[cfg(test)]
mod tests {
    use super::*;
    use atelia_shared::types::{TransactionId, TransactionLineId};
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    use crate::ledger::TransactionLine;

    fn row(code: &str, debit: Decimal, credit: Decimal, balance: Decimal) -> AccountBalanceRow {
        AccountBalanceRow {
            account_id: AccountId::new(),
            code: code.to_string(),
            name: code.to_string(),
            total_debit: debit,
            total_credit: credit,
            balance,
        }
    }

    fn posted(day: u32, debit: Decimal, credit: Decimal) -> PostedLine {
        PostedLine {
            date: NaiveDate::from_ymd_opt(2026, 1, day).unwrap(),
            transaction_number: format!("PAY-202601-{day:05}"),
            description: "posted".to_string(),
            line: TransactionLine {
                id: TransactionLineId::new(),
                transaction_id: TransactionId::new(),
                account_id: AccountId::new(),
                debit,
                credit,
                description: None,
            },
        }
    }

    #[test]
    fn test_trial_balance_balances() {
        let report = trial_balance(vec![
            row("4010", dec!(0), dec!(100), dec!(100)),
            row("1010", dec!(100), dec!(0), dec!(100)),
        ]);
        assert!(report.totals.is_balanced);
        assert_eq!(report.totals.total_debit, dec!(100));
        // Sorted by code.
        assert_eq!(report.rows[0].code, "1010");
    }

    #[test]
    fn test_trial_balance_detects_imbalance() {
        let report = trial_balance(vec![row("1010", dec!(100), dec!(0), dec!(100))]);
        assert!(!report.totals.is_balanced);
    }

    #[test]
    fn test_statement_running_balance() {
        let account = AccountId::new();
        let statement = build_statement(
            account,
            dec!(50),
            BalanceSide::Debit,
            vec![posted(5, dec!(100), dec!(0)), posted(9, dec!(0), dec!(30))],
        );

        assert_eq!(statement.opening_balance, dec!(50));
        assert_eq!(statement.lines[0].running_balance, dec!(150));
        assert_eq!(statement.lines[1].running_balance, dec!(120));
        assert_eq!(statement.closing_balance, dec!(120));
    }

    #[test]
    fn test_statement_credit_normal() {
        let statement = build_statement(
            AccountId::new(),
            dec!(0),
            BalanceSide::Credit,
            vec![posted(3, dec!(0), dec!(200)), posted(7, dec!(80), dec!(0))],
        );
        assert_eq!(statement.lines[0].running_balance, dec!(200));
        assert_eq!(statement.closing_balance, dec!(120));
    }

    #[test]
    fn test_empty_statement() {
        let statement =
            build_statement(AccountId::new(), dec!(10), BalanceSide::Debit, Vec::new());
        assert!(statement.lines.is_empty());
        assert_eq!(statement.closing_balance, dec!(10));
    }

    #[test]
    fn test_diverges() {
        assert!(!diverges(dec!(100), dec!(100), Decimal::ZERO));
        assert!(diverges(dec!(100.01), dec!(100), Decimal::ZERO));
        assert!(!diverges(dec!(100.01), dec!(100), dec!(0.02)));
        assert!(diverges(dec!(100.05), dec!(100), dec!(0.02)));
    }
}
