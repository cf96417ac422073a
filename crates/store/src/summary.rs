//! Customer financial summaries.
//!
//! Summaries are created lazily on first access and recomputed in full by
//! [`Ledger::refresh_summary`]. Staleness between refreshes is an accepted,
//! bounded inconsistency; the audit surface reconciles stored summaries
//! against the source facts.

use atelia_core::advances::CustomerAdvance;
use atelia_core::events::{OrderFact, PaymentFact};
use atelia_core::summary::{CustomerFinancialSummary, compute_summary};
use atelia_shared::types::CustomerId;

use crate::Ledger;
use crate::state::LedgerState;

impl Ledger {
    /// Gets the customer's summary, creating an empty one on first access.
    ///
    /// The returned snapshot may be stale; call [`Self::refresh_summary`]
    /// after relevant events or on a schedule.
    #[must_use]
    pub fn financial_summary(&self, customer: CustomerId) -> CustomerFinancialSummary {
        let mut state = self.write();
        state
            .summaries
            .entry(customer)
            .or_insert_with(|| CustomerFinancialSummary::empty(customer))
            .clone()
    }

    /// Recomputes the customer's summary from source facts and stores it.
    ///
    /// A full replace, never an incremental patch: safe to call repeatedly
    /// and idempotent given unchanged facts.
    #[must_use]
    pub fn refresh_summary(&self, customer: CustomerId) -> CustomerFinancialSummary {
        let mut state = self.write();
        let summary = Self::compute_locked(&state, customer);
        state.summaries.insert(customer, summary.clone());
        tracing::debug!(customer = %customer, debt = %summary.total_debt, "summary refreshed");
        summary
    }

    pub(crate) fn compute_locked(
        state: &LedgerState,
        customer: CustomerId,
    ) -> CustomerFinancialSummary {
        let orders: Vec<OrderFact> = state
            .orders
            .values()
            .filter(|order| order.customer_id == customer)
            .cloned()
            .collect();
        let payments: Vec<PaymentFact> = state
            .payments
            .values()
            .filter(|payment| payment.customer_id == customer)
            .cloned()
            .collect();
        let advances: Vec<CustomerAdvance> = state
            .advances
            .values()
            .filter(|advance| advance.customer_id == customer)
            .cloned()
            .collect();
        compute_summary(customer, &orders, &payments, &advances)
    }
}
