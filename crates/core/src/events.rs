//! Inbound facts from order and payment capture.
//!
//! Order intake and payment capture live outside the ledger. They hand the
//! engine minimal facts; the engine turns each fact into exactly one posted
//! transaction (idempotently) and reads the facts back when refreshing
//! customer summaries.

use atelia_shared::types::{CustomerId, OrderId, PaymentId};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// How funds were received.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Cash over the counter.
    Cash,
    /// Bank transfer.
    BankTransfer,
    /// Card payment (settled through the bank account).
    Card,
}

impl PaymentMethod {
    /// Returns true if the funds land in the cash account rather than the
    /// bank account.
    #[must_use]
    pub fn is_cash(&self) -> bool {
        matches!(self, Self::Cash)
    }
}

/// Fact describing a created order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderFact {
    /// The order's identifier in the capture system.
    pub id: OrderId,
    /// The ordering customer.
    pub customer_id: CustomerId,
    /// The order's final price.
    pub final_price: Decimal,
    /// When the order was created.
    pub created_at: NaiveDate,
}

/// Fact describing a received payment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentFact {
    /// The payment's identifier in the capture system.
    pub id: PaymentId,
    /// The paying customer.
    pub customer_id: CustomerId,
    /// The order the payment settles, if any.
    pub order_id: Option<OrderId>,
    /// Amount received.
    pub amount: Decimal,
    /// How the funds were received.
    pub method: PaymentMethod,
    /// When the payment was received.
    pub received_at: NaiveDate,
}
