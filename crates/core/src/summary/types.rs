//! Financial summary types.

use atelia_shared::types::CustomerId;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A customer's overall financial standing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinancialStatus {
    /// No debt and no credit.
    Clear,
    /// The customer owes money.
    HasDebt,
    /// The customer is owed money or holds open advances.
    HasCredit,
}

impl FinancialStatus {
    /// Derives the status from debt and open advances.
    #[must_use]
    pub fn derive(total_debt: Decimal, remaining_advances: Decimal) -> Self {
        if total_debt > Decimal::ZERO {
            Self::HasDebt
        } else if total_debt < Decimal::ZERO || remaining_advances > Decimal::ZERO {
            Self::HasCredit
        } else {
            Self::Clear
        }
    }
}

/// Per-customer financial rollup.
///
/// A cache recomputed in full from source facts; staleness between
/// refreshes is accepted and bounded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerFinancialSummary {
    /// The customer this summary describes.
    pub customer_id: CustomerId,
    /// Number of orders.
    pub total_orders_count: u64,
    /// Sum of order final prices.
    pub total_orders_amount: Decimal,
    /// Sum of payments received.
    pub total_paid: Decimal,
    /// Sum of open advances' original amounts.
    pub total_advances: Decimal,
    /// Sum of open advances' remaining amounts.
    pub remaining_advances: Decimal,
    /// `total_orders_amount - total_paid`.
    pub total_debt: Decimal,
    /// Derived standing.
    pub financial_status: FinancialStatus,
    /// Date of the most recent payment, if any.
    pub last_payment_date: Option<NaiveDate>,
    /// Date of the most recent order, if any.
    pub last_order_date: Option<NaiveDate>,
    /// When this summary was last recomputed.
    pub refreshed_at: DateTime<Utc>,
}

impl CustomerFinancialSummary {
    /// An empty summary for a customer with no recorded activity.
    #[must_use]
    pub fn empty(customer_id: CustomerId) -> Self {
        Self {
            customer_id,
            total_orders_count: 0,
            total_orders_amount: Decimal::ZERO,
            total_paid: Decimal::ZERO,
            total_advances: Decimal::ZERO,
            remaining_advances: Decimal::ZERO,
            total_debt: Decimal::ZERO,
            financial_status: FinancialStatus::Clear,
            last_payment_date: None,
            last_order_date: None,
            refreshed_at: Utc::now(),
        }
    }
}
