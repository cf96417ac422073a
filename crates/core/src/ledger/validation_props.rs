//! Property tests for posting validation.

use atelia_shared::types::{AccountId, TransactionId, TransactionLineId, UserId};
use chrono::{NaiveDate, Utc};
use proptest::prelude::*;
use rust_decimal::Decimal;

use super::error::LedgerError;
use super::line::TransactionLine;
use super::reversal::reversal_lines;
use super::transaction::{Transaction, TransactionKind, TransactionStatus};
use super::validation::{AccountPostingInfo, validate_for_posting};

fn amount_strategy() -> impl Strategy<Value = Decimal> {
    (1i64..1_000_000i64).prop_map(|n| Decimal::new(n, 2))
}

fn lines_strategy(max_len: usize) -> impl Strategy<Value = Vec<(Decimal, bool)>> {
    prop::collection::vec((amount_strategy(), any::<bool>()), 2..=max_len)
}

fn build_transaction(lines: &[(Decimal, bool)]) -> Transaction {
    let id = TransactionId::new();
    let lines: Vec<TransactionLine> = lines
        .iter()
        .map(|(amount, is_debit)| TransactionLine {
            id: TransactionLineId::new(),
            transaction_id: id,
            account_id: AccountId::new(),
            debit: if *is_debit { *amount } else { Decimal::ZERO },
            credit: if *is_debit { Decimal::ZERO } else { *amount },
            description: None,
        })
        .collect();
    let mut tx = Transaction {
        id,
        transaction_number: "ADJ-202601-00001".to_string(),
        kind: TransactionKind::Adjustment,
        status: TransactionStatus::Draft,
        date: NaiveDate::from_ymd_opt(2026, 1, 15).unwrap(),
        description: "prop".to_string(),
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

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// A transaction passes posting validation iff its debits equal its
    /// credits (given well-formed lines and healthy accounts).
    #[test]
    fn prop_validation_accepts_exactly_the_balanced(lines in lines_strategy(10)) {
        let tx = build_transaction(&lines);
        let balanced = tx.total_debit == tx.total_credit;
        let result = validate_for_posting(&tx, ok_account);
        prop_assert_eq!(result.is_ok(), balanced);
    }

    /// A reversal of balanced lines is itself balanced, with per-line sides
    /// swapped on the same accounts.
    #[test]
    fn prop_reversal_mirrors_and_balances(lines in lines_strategy(10)) {
        let tx = build_transaction(&lines);
        let mirrored = reversal_lines(&tx.lines);

        let debit: Decimal = mirrored.iter().map(|l| l.debit).sum();
        let credit: Decimal = mirrored.iter().map(|l| l.credit).sum();
        prop_assert_eq!(debit, tx.total_credit);
        prop_assert_eq!(credit, tx.total_debit);

        for (original, mirror) in tx.lines.iter().zip(&mirrored) {
            prop_assert_eq!(original.account_id, mirror.account_id);
            prop_assert_eq!(original.debit, mirror.credit);
            prop_assert_eq!(original.credit, mirror.debit);
        }
    }

    /// Totals recomputation is a pure fold over the lines.
    #[test]
    fn prop_totals_match_line_sums(lines in lines_strategy(12)) {
        let tx = build_transaction(&lines);
        let debit: Decimal = tx.lines.iter().map(|l| l.debit).sum();
        let credit: Decimal = tx.lines.iter().map(|l| l.credit).sum();
        prop_assert_eq!(tx.total_debit, debit);
        prop_assert_eq!(tx.total_credit, credit);
    }
}
