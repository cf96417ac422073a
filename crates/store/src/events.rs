//! Inbound domain events from order and payment capture.
//!
//! Both handlers post synchronously and are idempotent: re-invoking one for
//! an order/payment that already has a linked transaction returns that
//! transaction instead of posting a duplicate.

use atelia_core::accounts::AccountError;
use atelia_core::events::{OrderFact, PaymentFact};
use atelia_core::ledger::{LedgerError, NewLine, NewTransaction, Transaction, TransactionKind};
use atelia_shared::types::{UserId, round_currency};
use thiserror::Error;

use crate::Ledger;

/// Errors raised by the domain-event handlers.
#[derive(Debug, Error)]
pub enum EventError {
    /// The posting failed.
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// A required account is missing or invalid.
    #[error(transparent)]
    Account(#[from] AccountError),
}

impl EventError {
    /// Returns the stable error code for this error.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Ledger(err) => err.error_code(),
            Self::Account(err) => err.error_code(),
        }
    }
}

impl Ledger {
    /// Handles an order creation: debits the customer's receivable account
    /// and credits revenue for the order's final price, posting
    /// synchronously.
    ///
    /// Idempotent: a second invocation for the same order returns the
    /// already-linked transaction without posting again.
    pub fn order_created(&self, fact: OrderFact, actor: UserId) -> Result<Transaction, EventError> {
        let mut state = self.write();

        if let Some(existing) = state.order_transactions.get(&fact.id) {
            return Ok(state.transaction(*existing).cloned()?);
        }

        let amount = round_currency(fact.final_price);
        let receivable = self.ensure_customer_account_locked(&mut state, fact.customer_id)?;
        let revenue = state
            .account_by_code(&self.config().accounts.revenue)?
            .id;

        let mut input = NewTransaction::new(
            TransactionKind::Invoice,
            fact.created_at,
            "Order invoiced".to_string(),
            actor,
        )
        .for_customer(fact.customer_id)
        .with_line(NewLine::debit(receivable, amount))
        .with_line(NewLine::credit(revenue, amount));
        input.order_id = Some(fact.id);

        let transaction_id = self.post_new_transaction_locked(&mut state, input, actor)?;
        state.order_transactions.insert(fact.id, transaction_id);
        state.orders.insert(fact.id, fact);

        Ok(state.transaction(transaction_id).cloned()?)
    }

    /// Handles a received payment: debits cash/bank per the payment method
    /// and credits the customer's receivable account, posting synchronously.
    ///
    /// Idempotent by payment id.
    pub fn payment_received(
        &self,
        fact: PaymentFact,
        actor: UserId,
    ) -> Result<Transaction, EventError> {
        let mut state = self.write();

        if let Some(existing) = state.payment_transactions.get(&fact.id) {
            return Ok(state.transaction(*existing).cloned()?);
        }

        let amount = round_currency(fact.amount);
        let accounts = &self.config().accounts;
        let funds_code = if fact.method.is_cash() {
            accounts.cash.clone()
        } else {
            accounts.bank.clone()
        };
        let funds = state.account_by_code(&funds_code)?.id;
        let receivable = self.ensure_customer_account_locked(&mut state, fact.customer_id)?;

        let mut input = NewTransaction::new(
            TransactionKind::Payment,
            fact.received_at,
            "Payment received".to_string(),
            actor,
        )
        .for_customer(fact.customer_id)
        .with_line(NewLine::debit(funds, amount))
        .with_line(NewLine::credit(receivable, amount));
        input.payment_id = Some(fact.id);
        input.order_id = fact.order_id;

        let transaction_id = self.post_new_transaction_locked(&mut state, input, actor)?;
        state.payment_transactions.insert(fact.id, transaction_id);
        state.payments.insert(fact.id, fact);

        Ok(state.transaction(transaction_id).cloned()?)
    }
}
