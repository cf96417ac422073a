//! Relational state behind the ledger lock.
//!
//! Flat tables keyed by id, with unique-code and unique-number indexes.
//! Foreign-key integrity is enforced by the operations in the sibling
//! modules; everything here assumes the caller already holds the lock.

use std::collections::HashMap;

use atelia_core::accounts::{Account, AccountError};
use atelia_core::advances::{AdvanceUsage, CustomerAdvance};
use atelia_core::events::{OrderFact, PaymentFact};
use atelia_core::ledger::{
    AccountPostingInfo, LedgerError, NumberSequencer, Transaction, TransactionStatus,
    recompute_balance,
};
use atelia_core::summary::CustomerFinancialSummary;
use atelia_shared::types::{
    AccountId, AdvanceId, CustomerId, OrderId, PaymentId, TransactionId,
};
use chrono::Utc;
use rust_decimal::Decimal;

/// All ledger tables.
#[derive(Debug, Default)]
pub(crate) struct LedgerState {
    pub accounts: HashMap<AccountId, Account>,
    /// Unique index: account code -> account id.
    pub account_codes: HashMap<String, AccountId>,
    pub transactions: HashMap<TransactionId, Transaction>,
    /// Unique index: transaction number -> transaction id.
    pub transaction_numbers: HashMap<String, TransactionId>,
    pub advances: HashMap<AdvanceId, CustomerAdvance>,
    /// Unique index: advance number -> advance id.
    pub advance_numbers: HashMap<String, AdvanceId>,
    /// Append-only consumption log.
    pub usages: Vec<AdvanceUsage>,
    pub summaries: HashMap<CustomerId, CustomerFinancialSummary>,
    pub orders: HashMap<OrderId, OrderFact>,
    pub payments: HashMap<PaymentId, PaymentFact>,
    /// Idempotence index: order -> the transaction it produced.
    pub order_transactions: HashMap<OrderId, TransactionId>,
    /// Idempotence index: payment -> the transaction it produced.
    pub payment_transactions: HashMap<PaymentId, TransactionId>,
    pub sequencer: NumberSequencer,
}

impl LedgerState {
    pub fn account(&self, id: AccountId) -> Result<&Account, AccountError> {
        self.accounts.get(&id).ok_or(AccountError::NotFound(id))
    }

    pub fn account_mut(&mut self, id: AccountId) -> Result<&mut Account, AccountError> {
        self.accounts
            .get_mut(&id)
            .ok_or(AccountError::NotFound(id))
    }

    pub fn account_by_code(&self, code: &str) -> Result<&Account, AccountError> {
        let id = self
            .account_codes
            .get(code)
            .ok_or_else(|| AccountError::CodeNotFound(code.to_string()))?;
        self.account(*id)
    }

    pub fn transaction(&self, id: TransactionId) -> Result<&Transaction, LedgerError> {
        self.transactions
            .get(&id)
            .ok_or(LedgerError::TransactionNotFound(id))
    }

    pub fn transaction_mut(&mut self, id: TransactionId) -> Result<&mut Transaction, LedgerError> {
        self.transactions
            .get_mut(&id)
            .ok_or(LedgerError::TransactionNotFound(id))
    }

    pub fn posting_info(&self, id: AccountId) -> Result<AccountPostingInfo, LedgerError> {
        self.accounts
            .get(&id)
            .map(|account| AccountPostingInfo {
                id,
                is_active: account.is_active,
                allow_transactions: account.allow_transactions,
            })
            .ok_or(LedgerError::AccountNotFound(id))
    }

    /// Authoritative balance recompute from the posted-line history.
    pub fn recompute_account_balance(&self, id: AccountId) -> Result<Decimal, AccountError> {
        let account = self.account(id)?;
        let lines = self
            .transactions
            .values()
            .filter(|tx| tx.status == TransactionStatus::Posted)
            .flat_map(|tx| tx.lines.iter())
            .filter(|line| line.account_id == id);
        Ok(recompute_balance(
            account.opening_balance,
            account.normal_balance(),
            lines,
        ))
    }

    /// Recomputes and stores the cached balance; returns the fresh value.
    pub fn refresh_account_balance(&mut self, id: AccountId) -> Result<Decimal, AccountError> {
        let fresh = self.recompute_account_balance(id)?;
        let account = self.account_mut(id)?;
        account.current_balance = fresh;
        account.updated_at = Utc::now();
        Ok(fresh)
    }

    /// Returns true if any transaction line references the account,
    /// whatever the transaction's status.
    pub fn account_has_lines(&self, id: AccountId) -> bool {
        self.transactions
            .values()
            .flat_map(|tx| tx.lines.iter())
            .any(|line| line.account_id == id)
    }

    /// Removes a transaction and its number index entry. The number itself
    /// is never reissued; the sequencer only moves forward.
    pub fn remove_transaction(&mut self, id: TransactionId) {
        if let Some(tx) = self.transactions.remove(&id) {
            self.transaction_numbers.remove(&tx.transaction_number);
        }
    }
}
