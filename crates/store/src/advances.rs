//! Customer advance ledger.
//!
//! Advances post through the same engine as everything else: issuing one
//! credits the customer-advances liability and debits cash/bank; consuming
//! one reclassifies the liability into the customer's receivable (when an
//! order is named) or revenue. The remaining-amount check, the decrement,
//! the usage record, and the companion posting all commit inside one
//! write-lock scope; concurrent consumption can never overdraw an advance.

use atelia_core::advances::{AdvanceError, AdvanceStatus, AdvanceUsage, CustomerAdvance, NewAdvance};
use atelia_core::events::PaymentMethod;
use atelia_core::ledger::{NewLine, NewTransaction, TransactionKind, TransactionStatus};
use atelia_shared::types::{
    AccountId, AdvanceId, AdvanceUsageId, CustomerId, OrderId, UserId, round_currency,
};
use chrono::Utc;
use rust_decimal::Decimal;

use crate::Ledger;
use crate::state::LedgerState;

impl Ledger {
    /// Issues an advance: records the prepayment and posts the companion
    /// transaction (debit cash/bank, credit the customer-advances
    /// liability).
    pub fn issue_advance(&self, input: NewAdvance) -> Result<CustomerAdvance, AdvanceError> {
        let mut state = self.write();

        let amount = round_currency(input.amount);
        if amount <= Decimal::ZERO {
            return Err(AdvanceError::InvalidAmount(amount));
        }

        let funds = self.funds_account(&state, input.payment_method)?;
        let liability = self.advances_account(&state)?;

        let advance_id = AdvanceId::new();
        let number = state
            .sequencer
            .next(&self.config().numbering.advance_number, input.date);

        let mut companion = NewTransaction::new(
            TransactionKind::Advance,
            input.date,
            format!("Customer advance {number}"),
            input.created_by,
        )
        .for_customer(input.customer_id)
        .with_line(NewLine::debit(funds, amount))
        .with_line(NewLine::credit(liability, amount));
        companion.reference = input.receipt_number.clone();

        let transaction_id = self.post_new_transaction_locked(&mut state, companion, input.created_by)?;

        let advance = CustomerAdvance {
            id: advance_id,
            advance_number: number.clone(),
            customer_id: input.customer_id,
            amount,
            remaining_amount: amount,
            status: AdvanceStatus::Active,
            receipt_transaction: Some(transaction_id),
            payment_method: input.payment_method,
            receipt_number: input.receipt_number,
            created_by: input.created_by,
            created_at: Utc::now(),
        };
        state.advance_numbers.insert(number, advance_id);
        state.advances.insert(advance_id, advance.clone());

        tracing::info!(advance = %advance.advance_number, amount = %amount, "advance issued");
        Ok(advance)
    }

    /// Consumes part of an advance against an order.
    ///
    /// Fails if the requested amount exceeds the remaining amount. On
    /// success: decrements the remaining amount, recomputes the status,
    /// appends an immutable usage record, and posts the reclassifying
    /// transaction, atomically. Returns the new remaining amount.
    pub fn use_advance(
        &self,
        id: AdvanceId,
        amount: Decimal,
        order: Option<OrderId>,
        actor: UserId,
    ) -> Result<Decimal, AdvanceError> {
        let mut state = self.write();

        let amount = round_currency(amount);
        let advance = state.advances.get(&id).ok_or(AdvanceError::NotFound(id))?;
        // All consumption checks run before any state change.
        advance.check_consumable(amount)?;
        let customer = advance.customer_id;
        let advance_number = advance.advance_number.clone();

        let liability = self.advances_account(&state)?;
        let target = match order {
            Some(_) => self.ensure_customer_account_locked(&mut state, customer)?,
            None => self.revenue_account(&state)?,
        };

        let date = Utc::now().date_naive();
        let mut companion = NewTransaction::new(
            TransactionKind::Transfer,
            date,
            format!("Advance {advance_number} applied"),
            actor,
        )
        .for_customer(customer)
        .with_line(NewLine::debit(liability, amount))
        .with_line(NewLine::credit(target, amount));
        companion.order_id = order;

        self.post_new_transaction_locked(&mut state, companion, actor)?;

        // The checks above make this decrement infallible; the posting and
        // the consumption commit in the same lock scope.
        let advance = state
            .advances
            .get_mut(&id)
            .ok_or(AdvanceError::NotFound(id))?;
        let remaining = advance.consume(amount)?;
        state.usages.push(AdvanceUsage {
            id: AdvanceUsageId::new(),
            advance_id: id,
            order_id: order,
            amount,
            created_by: actor,
            created_at: Utc::now(),
        });

        tracing::info!(advance = %advance_number, amount = %amount, remaining = %remaining, "advance consumed");
        Ok(remaining)
    }

    /// Refunds an advance's remaining amount to the customer.
    ///
    /// Posts a transaction returning the liability to cash/bank, zeroes the
    /// remaining amount, and pins the status to `Refunded`.
    pub fn refund_advance(&self, id: AdvanceId, actor: UserId) -> Result<CustomerAdvance, AdvanceError> {
        let mut state = self.write();

        let advance = state.advances.get(&id).ok_or(AdvanceError::NotFound(id))?;
        if !advance.status.is_consumable() {
            return Err(AdvanceError::NotRefundable(advance.status));
        }
        let remaining = advance.remaining_amount;
        let customer = advance.customer_id;
        let advance_number = advance.advance_number.clone();
        let method = advance.payment_method;

        let liability = self.advances_account(&state)?;
        let funds = self.funds_account(&state, method)?;

        let companion = NewTransaction::new(
            TransactionKind::Refund,
            Utc::now().date_naive(),
            format!("Advance {advance_number} refunded"),
            actor,
        )
        .for_customer(customer)
        .with_line(NewLine::debit(liability, remaining))
        .with_line(NewLine::credit(funds, remaining));

        self.post_new_transaction_locked(&mut state, companion, actor)?;

        let advance = state
            .advances
            .get_mut(&id)
            .ok_or(AdvanceError::NotFound(id))?;
        advance.remaining_amount = Decimal::ZERO;
        advance.status = AdvanceStatus::Refunded;
        let refunded = advance.clone();

        tracing::info!(advance = %advance_number, amount = %remaining, "advance refunded");
        Ok(refunded)
    }

    /// Cancels an untouched advance and reverses its receipt transaction.
    pub fn cancel_advance(&self, id: AdvanceId, actor: UserId) -> Result<CustomerAdvance, AdvanceError> {
        let mut state = self.write();

        let advance = state.advances.get(&id).ok_or(AdvanceError::NotFound(id))?;
        if advance.status != AdvanceStatus::Active || advance.remaining_amount != advance.amount {
            return Err(AdvanceError::NotCancellable(advance.status));
        }
        let receipt = advance.receipt_transaction;
        let advance_number = advance.advance_number.clone();

        if let Some(receipt_id) = receipt {
            let receipt_status = state.transaction(receipt_id)?.status;
            if receipt_status == TransactionStatus::Posted {
                self.cancel_locked(&mut state, receipt_id, actor)?;
            }
        }

        let advance = state
            .advances
            .get_mut(&id)
            .ok_or(AdvanceError::NotFound(id))?;
        advance.status = AdvanceStatus::Cancelled;
        let cancelled = advance.clone();

        tracing::info!(advance = %advance_number, "advance cancelled");
        Ok(cancelled)
    }

    /// Fetches an advance by id.
    pub fn get_advance(&self, id: AdvanceId) -> Result<CustomerAdvance, AdvanceError> {
        self.read()
            .advances
            .get(&id)
            .cloned()
            .ok_or(AdvanceError::NotFound(id))
    }

    /// A customer's advances, newest first.
    #[must_use]
    pub fn list_advances(&self, customer: CustomerId) -> Vec<CustomerAdvance> {
        let state = self.read();
        let mut advances: Vec<CustomerAdvance> = state
            .advances
            .values()
            .filter(|advance| advance.customer_id == customer)
            .cloned()
            .collect();
        advances.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        advances
    }

    /// The usage records of an advance, oldest first.
    #[must_use]
    pub fn list_advance_usages(&self, id: AdvanceId) -> Vec<AdvanceUsage> {
        self.read()
            .usages
            .iter()
            .filter(|usage| usage.advance_id == id)
            .cloned()
            .collect()
    }

    /// Creates and posts a transaction in one locked step, leaving no trace
    /// if the posting fails. Used by every system-generated posting.
    pub(crate) fn post_new_transaction_locked(
        &self,
        state: &mut LedgerState,
        input: NewTransaction,
        actor: UserId,
    ) -> Result<atelia_shared::types::TransactionId, atelia_core::ledger::LedgerError> {
        let id = self.create_transaction_locked(state, input)?;
        if let Err(err) = Self::post_locked(state, id, actor) {
            state.remove_transaction(id);
            return Err(err);
        }
        Ok(id)
    }

    fn funds_account(
        &self,
        state: &LedgerState,
        method: PaymentMethod,
    ) -> Result<AccountId, atelia_core::accounts::AccountError> {
        let accounts = &self.config().accounts;
        let code = if method.is_cash() {
            &accounts.cash
        } else {
            &accounts.bank
        };
        Ok(state.account_by_code(code)?.id)
    }

    fn advances_account(
        &self,
        state: &LedgerState,
    ) -> Result<AccountId, atelia_core::accounts::AccountError> {
        Ok(state
            .account_by_code(&self.config().accounts.customer_advances)?
            .id)
    }

    fn revenue_account(
        &self,
        state: &LedgerState,
    ) -> Result<AccountId, atelia_core::accounts::AccountError> {
        Ok(state.account_by_code(&self.config().accounts.revenue)?.id)
    }
}
