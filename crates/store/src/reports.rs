//! Query and audit surface.
//!
//! Read paths (trial balance, statements) take the read lock; audits
//! compare caches against recomputed truth and mutate nothing unless the
//! explicit repair variant is called. The tolerance is applied uniformly:
//! pass `Decimal::ZERO` for exact equality, the recommended default for
//! two-decimal currency amounts.

use atelia_core::accounts::AccountError;
use atelia_core::ledger::TransactionStatus;
use atelia_core::reports::{
    AccountBalanceRow, AccountStatement, BalanceMismatch, PostedLine, SummaryMismatch,
    TrialBalanceReport, UnbalancedTransaction, build_statement, diverges, trial_balance,
};
use atelia_shared::types::{AccountId, CustomerId};
use rust_decimal::Decimal;

use crate::Ledger;
use crate::state::LedgerState;

impl Ledger {
    /// Trial balance over all accounts: per-account posted debit/credit
    /// sums plus system-wide totals that must balance to zero.
    #[must_use]
    pub fn trial_balance(&self) -> TrialBalanceReport {
        let state = self.read();
        let rows = state
            .accounts
            .values()
            .map(|account| {
                let (total_debit, total_credit) = posted_sums(&state, account.id);
                AccountBalanceRow {
                    account_id: account.id,
                    code: account.code.clone(),
                    name: account.name.clone(),
                    total_debit,
                    total_credit,
                    balance: account.opening_balance
                        + account.normal_balance().balance_change(total_debit, total_credit),
                }
            })
            .collect();
        trial_balance(rows)
    }

    /// Chronological posted lines for one account with a running balance.
    pub fn account_statement(&self, id: AccountId) -> Result<AccountStatement, AccountError> {
        let state = self.read();
        let account = state.account(id)?;

        let mut posted: Vec<(&_, PostedLine)> = state
            .transactions
            .values()
            .filter(|tx| tx.status == TransactionStatus::Posted)
            .flat_map(|tx| {
                tx.lines
                    .iter()
                    .filter(|line| line.account_id == id)
                    .map(move |line| {
                        (
                            tx,
                            PostedLine {
                                date: tx.date,
                                transaction_number: tx.transaction_number.clone(),
                                description: tx.description.clone(),
                                line: line.clone(),
                            },
                        )
                    })
            })
            .collect();
        posted.sort_by(|(a, _), (b, _)| {
            a.date
                .cmp(&b.date)
                .then(a.created_at.cmp(&b.created_at))
                .then(a.id.cmp(&b.id))
        });
        let lines: Vec<PostedLine> = posted.into_iter().map(|(_, line)| line).collect();

        Ok(build_statement(
            id,
            account.opening_balance,
            account.normal_balance(),
            lines,
        ))
    }

    /// Statement of the customer's receivable account.
    pub fn customer_statement(&self, customer: CustomerId) -> Result<AccountStatement, AccountError> {
        let code = self.customer_account_code(customer);
        let account_id = self.get_account_by_code(&code)?.id;
        self.account_statement(account_id)
    }

    /// Finds posted or cancelled transactions whose stored totals disagree
    /// with each other or with their lines, and reports their zero-amount
    /// ("empty") lines. Mutates nothing.
    #[must_use]
    pub fn find_unbalanced_transactions(&self) -> Vec<UnbalancedTransaction> {
        let state = self.read();
        let mut findings: Vec<UnbalancedTransaction> = state
            .transactions
            .values()
            .filter(|tx| tx.status != TransactionStatus::Draft)
            .filter_map(|tx| {
                let line_debit: Decimal = tx.lines.iter().map(|line| line.debit).sum();
                let line_credit: Decimal = tx.lines.iter().map(|line| line.credit).sum();
                let empty_lines: Vec<_> = tx
                    .lines
                    .iter()
                    .filter(|line| line.is_empty())
                    .map(|line| line.id)
                    .collect();

                let unbalanced = tx.total_debit != tx.total_credit
                    || tx.total_debit != line_debit
                    || tx.total_credit != line_credit;
                if unbalanced || !empty_lines.is_empty() {
                    Some(UnbalancedTransaction {
                        transaction_id: tx.id,
                        transaction_number: tx.transaction_number.clone(),
                        total_debit: tx.total_debit,
                        total_credit: tx.total_credit,
                        empty_lines,
                    })
                } else {
                    None
                }
            })
            .collect();
        findings.sort_by(|a, b| a.transaction_number.cmp(&b.transaction_number));
        findings
    }

    /// Compares every account's cached balance against the recompute.
    /// Mutates nothing; flagged rows are data, not errors.
    #[must_use]
    pub fn verify_account_balances(&self, tolerance: Decimal) -> Vec<BalanceMismatch> {
        let state = self.read();
        Self::balance_mismatches(&state, tolerance)
    }

    /// Re-derives the cached balance of every flagged account, then returns
    /// the rows that were flagged (with their pre-repair values).
    pub fn repair_account_balances(
        &self,
        tolerance: Decimal,
    ) -> Result<Vec<BalanceMismatch>, AccountError> {
        let mut state = self.write();
        let mismatches = Self::balance_mismatches(&state, tolerance);
        for mismatch in &mismatches {
            state.refresh_account_balance(mismatch.account_id)?;
        }
        Ok(mismatches)
    }

    fn balance_mismatches(state: &LedgerState, tolerance: Decimal) -> Vec<BalanceMismatch> {
        let mut mismatches: Vec<BalanceMismatch> = state
            .accounts
            .values()
            .filter_map(|account| {
                let recomputed = state.recompute_account_balance(account.id).ok()?;
                if diverges(account.current_balance, recomputed, tolerance) {
                    Some(BalanceMismatch {
                        account_id: account.id,
                        code: account.code.clone(),
                        cached: account.current_balance,
                        recomputed,
                        difference: account.current_balance - recomputed,
                    })
                } else {
                    None
                }
            })
            .collect();
        mismatches.sort_by(|a, b| a.code.cmp(&b.code));
        mismatches
    }

    /// Compares every stored summary's debt against a recompute from the
    /// order/payment facts. Mutates nothing.
    #[must_use]
    pub fn verify_customer_summaries(&self, tolerance: Decimal) -> Vec<SummaryMismatch> {
        let state = self.read();
        Self::summary_mismatches(&state, tolerance)
    }

    /// Refreshes every flagged summary, then returns the rows that were
    /// flagged (with their pre-repair values).
    #[must_use]
    pub fn repair_customer_summaries(&self, tolerance: Decimal) -> Vec<SummaryMismatch> {
        let mut state = self.write();
        let mismatches = Self::summary_mismatches(&state, tolerance);
        for mismatch in &mismatches {
            let summary = Self::compute_locked(&state, mismatch.customer_id);
            state.summaries.insert(mismatch.customer_id, summary);
        }
        mismatches
    }

    fn summary_mismatches(state: &LedgerState, tolerance: Decimal) -> Vec<SummaryMismatch> {
        state
            .summaries
            .values()
            .filter_map(|summary| {
                let recomputed = Self::compute_locked(state, summary.customer_id);
                if diverges(summary.total_debt, recomputed.total_debt, tolerance) {
                    Some(SummaryMismatch {
                        customer_id: summary.customer_id,
                        stored_debt: summary.total_debt,
                        recomputed_debt: recomputed.total_debt,
                        difference: summary.total_debt - recomputed.total_debt,
                    })
                } else {
                    None
                }
            })
            .collect()
    }
}

fn posted_sums(state: &LedgerState, account: AccountId) -> (Decimal, Decimal) {
    state
        .transactions
        .values()
        .filter(|tx| tx.status == TransactionStatus::Posted)
        .flat_map(|tx| tx.lines.iter())
        .filter(|line| line.account_id == account)
        .fold((Decimal::ZERO, Decimal::ZERO), |(debit, credit), line| {
            (debit + line.debit, credit + line.credit)
        })
}
