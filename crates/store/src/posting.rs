//! Posting engine: the `Draft -> Posted -> Cancelled` state machine.
//!
//! Every mutating operation here runs inside one write-lock scope, so the
//! status check-and-set, the line totals, and the affected accounts' cached
//! balances commit together or not at all. Two callers racing to post the
//! same draft see exactly one success and one `AlreadyPosted`.

use atelia_core::ledger::{
    LedgerError, NewLine, NewTransaction, Transaction, TransactionKind, TransactionLine,
    TransactionStatus, reversal_description, reversal_lines, validate_for_posting,
};
use atelia_shared::types::{TransactionId, TransactionLineId, UserId};
use chrono::Utc;
use rust_decimal::Decimal;

use crate::Ledger;
use crate::state::LedgerState;

/// Filter options for listing transactions.
#[derive(Debug, Clone, Default)]
pub struct TransactionFilter {
    /// Filter by status.
    pub status: Option<TransactionStatus>,
    /// Filter by transaction kind.
    pub kind: Option<TransactionKind>,
    /// Filter by linked customer.
    pub customer_id: Option<atelia_shared::types::CustomerId>,
}

impl Ledger {
    /// Creates a draft transaction.
    ///
    /// Lines are validated against the exclusivity rule before anything is
    /// stored; the document number is assigned here, once, and never
    /// reused.
    pub fn create_transaction(&self, input: NewTransaction) -> Result<Transaction, LedgerError> {
        let mut state = self.write();
        let id = self.create_transaction_locked(&mut state, input)?;
        state.transaction(id).cloned()
    }

    pub(crate) fn create_transaction_locked(
        &self,
        state: &mut LedgerState,
        input: NewTransaction,
    ) -> Result<TransactionId, LedgerError> {
        let id = TransactionId::new();
        let lines: Vec<TransactionLine> = input
            .lines
            .into_iter()
            .map(|line| TransactionLine::from_input(id, line))
            .collect();
        for line in &lines {
            line.validate()?;
        }

        let number = state
            .sequencer
            .next(self.number_prefix(input.kind), input.date);
        let mut transaction = Transaction {
            id,
            transaction_number: number.clone(),
            kind: input.kind,
            status: TransactionStatus::Draft,
            date: input.date,
            description: input.description,
            reference: input.reference,
            customer_id: input.customer_id,
            order_id: input.order_id,
            payment_id: input.payment_id,
            branch_id: input.branch_id,
            reverses: input.reverses,
            total_debit: Decimal::ZERO,
            total_credit: Decimal::ZERO,
            created_by: input.created_by,
            created_at: Utc::now(),
            posted_by: None,
            posted_at: None,
            lines,
        };
        transaction.calculate_totals();

        state.transaction_numbers.insert(number, id);
        state.transactions.insert(id, transaction);
        Ok(id)
    }

    fn number_prefix(&self, kind: TransactionKind) -> &str {
        let numbering = &self.config().numbering;
        match kind {
            TransactionKind::Payment => &numbering.payment,
            TransactionKind::Advance => &numbering.advance,
            TransactionKind::Invoice => &numbering.invoice,
            TransactionKind::Refund => &numbering.refund,
            TransactionKind::Expense => &numbering.expense,
            TransactionKind::Transfer => &numbering.transfer,
            TransactionKind::Adjustment => &numbering.adjustment,
            TransactionKind::Opening => &numbering.opening,
        }
    }

    /// Fetches a transaction by id.
    pub fn get_transaction(&self, id: TransactionId) -> Result<Transaction, LedgerError> {
        self.read().transaction(id).cloned()
    }

    /// Fetches a transaction by document number.
    pub fn get_transaction_by_number(&self, number: &str) -> Option<Transaction> {
        let state = self.read();
        let id = state.transaction_numbers.get(number)?;
        state.transactions.get(id).cloned()
    }

    /// Lists transactions matching the filter, newest business date first.
    #[must_use]
    pub fn list_transactions(&self, filter: &TransactionFilter) -> Vec<Transaction> {
        let state = self.read();
        let mut matching: Vec<Transaction> = state
            .transactions
            .values()
            .filter(|tx| filter.status.is_none_or(|status| tx.status == status))
            .filter(|tx| filter.kind.is_none_or(|kind| tx.kind == kind))
            .filter(|tx| {
                filter
                    .customer_id
                    .is_none_or(|customer| tx.customer_id == Some(customer))
            })
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.date.cmp(&a.date).then(b.created_at.cmp(&a.created_at)));
        matching
    }

    /// Appends a line to a draft transaction and recalculates its totals.
    pub fn add_line(&self, id: TransactionId, line: NewLine) -> Result<Transaction, LedgerError> {
        let mut state = self.write();
        let transaction = state.transaction_mut(id)?;
        if !transaction.status.is_editable() {
            return Err(LedgerError::NotEditable);
        }
        let line = TransactionLine::from_input(id, line);
        line.validate()?;
        transaction.lines.push(line);
        transaction.calculate_totals();
        Ok(transaction.clone())
    }

    /// Removes a line from a draft transaction and recalculates its totals.
    pub fn remove_line(
        &self,
        id: TransactionId,
        line_id: TransactionLineId,
    ) -> Result<Transaction, LedgerError> {
        let mut state = self.write();
        let transaction = state.transaction_mut(id)?;
        if !transaction.status.is_editable() {
            return Err(LedgerError::NotEditable);
        }
        transaction.lines.retain(|line| line.id != line_id);
        transaction.calculate_totals();
        Ok(transaction.clone())
    }

    /// Deletes a draft transaction outright. Posted and cancelled
    /// transactions are immutable and can only be compensated, never
    /// deleted.
    pub fn delete_draft(&self, id: TransactionId) -> Result<(), LedgerError> {
        let mut state = self.write();
        let transaction = state.transaction(id)?;
        if transaction.status != TransactionStatus::Draft {
            return Err(LedgerError::CanOnlyDeleteDraft);
        }
        state.remove_transaction(id);
        Ok(())
    }

    /// Posts a draft transaction.
    ///
    /// Preconditions: draft status, at least two well-formed lines, balanced
    /// positive totals, and every referenced account active and accepting
    /// postings. On success the cached balances of every referenced account
    /// are refreshed from the posted-line history within the same lock
    /// scope. On failure, no state change is observable.
    pub fn post(&self, id: TransactionId, actor: UserId) -> Result<Transaction, LedgerError> {
        let mut state = self.write();
        Self::post_locked(&mut state, id, actor)?;
        let transaction = state.transaction(id).cloned()?;
        tracing::info!(
            transaction = %transaction.transaction_number,
            total = %transaction.total_debit,
            "transaction posted"
        );
        Ok(transaction)
    }

    pub(crate) fn post_locked(
        state: &mut LedgerState,
        id: TransactionId,
        actor: UserId,
    ) -> Result<(), LedgerError> {
        // Totals must reflect the lines before any balance check.
        state.transaction_mut(id)?.calculate_totals();

        let transaction = state.transaction(id)?;
        validate_for_posting(transaction, |account_id| state.posting_info(account_id))?;
        let affected = transaction.distinct_accounts();

        let transaction = state.transaction_mut(id)?;
        transaction.status = TransactionStatus::Posted;
        transaction.posted_by = Some(actor);
        transaction.posted_at = Some(Utc::now());

        // The lines are now durably part of the posted history; recompute
        // each affected cache from that truth inside the same lock scope.
        for account_id in affected {
            state
                .refresh_account_balance(account_id)
                .map_err(|_| LedgerError::AccountNotFound(account_id))?;
        }
        Ok(())
    }

    /// Builds a draft reversal of a posted transaction.
    ///
    /// The reversal's lines mirror the original with debit and credit
    /// swapped on the same accounts and amounts, and it carries a
    /// back-reference to the original. This is the only sanctioned way to
    /// undo a posted transaction's financial effect.
    pub fn create_reversal(
        &self,
        id: TransactionId,
        actor: UserId,
    ) -> Result<Transaction, LedgerError> {
        let mut state = self.write();
        let reversal_id = self.create_reversal_locked(&mut state, id, actor)?;
        state.transaction(reversal_id).cloned()
    }

    fn create_reversal_locked(
        &self,
        state: &mut LedgerState,
        id: TransactionId,
        actor: UserId,
    ) -> Result<TransactionId, LedgerError> {
        let original = state.transaction(id)?;
        match original.status {
            TransactionStatus::Posted => {}
            TransactionStatus::Draft => return Err(LedgerError::NotPosted(id)),
            TransactionStatus::Cancelled => return Err(LedgerError::TransactionCancelled(id)),
        }

        let mut input = NewTransaction::new(
            original.kind,
            original.date,
            reversal_description(&original.transaction_number),
            actor,
        );
        input.reference = original.reference.clone();
        input.customer_id = original.customer_id;
        input.order_id = original.order_id;
        input.payment_id = original.payment_id;
        input.branch_id = original.branch_id;
        input.reverses = Some(id);
        input.lines = reversal_lines(&original.lines);

        self.create_transaction_locked(state, input)
    }

    /// Cancels a posted transaction: creates the compensating reversal,
    /// posts it, and marks the original `Cancelled`, atomically.
    ///
    /// Fails on drafts (`NotPosted`) and on already-cancelled transactions
    /// (`TransactionCancelled`).
    pub fn cancel(&self, id: TransactionId, actor: UserId) -> Result<Transaction, LedgerError> {
        let mut state = self.write();
        let reversal_id = self.cancel_locked(&mut state, id, actor)?;
        let original = state.transaction(id).cloned()?;
        let reversal = state.transaction(reversal_id)?;
        tracing::info!(
            transaction = %original.transaction_number,
            reversal = %reversal.transaction_number,
            "transaction cancelled"
        );
        Ok(original)
    }

    pub(crate) fn cancel_locked(
        &self,
        state: &mut LedgerState,
        id: TransactionId,
        actor: UserId,
    ) -> Result<TransactionId, LedgerError> {
        let reversal_id = self.create_reversal_locked(state, id, actor)?;
        if let Err(err) = Self::post_locked(state, reversal_id, actor) {
            // Nothing partial: the failed reversal leaves no trace. Its
            // number is not reissued.
            state.remove_transaction(reversal_id);
            return Err(err);
        }
        let original = state.transaction_mut(id)?;
        original.status = TransactionStatus::Cancelled;
        Ok(reversal_id)
    }
}
