//! Financial summary computation.

use atelia_shared::types::CustomerId;
use chrono::Utc;
use rust_decimal::Decimal;

use super::types::{CustomerFinancialSummary, FinancialStatus};
use crate::advances::CustomerAdvance;
use crate::events::{OrderFact, PaymentFact};

/// Recomputes a customer's summary from source facts.
///
/// A full replace: every field is derived from the supplied orders,
/// payments, and advances; nothing is patched incrementally. Idempotent
/// given unchanged inputs. Only advances whose status still holds open
/// funds (active or partially used) participate.
#[must_use]
pub fn compute_summary(
    customer_id: CustomerId,
    orders: &[OrderFact],
    payments: &[PaymentFact],
    advances: &[CustomerAdvance],
) -> CustomerFinancialSummary {
    let total_orders_amount: Decimal = orders.iter().map(|order| order.final_price).sum();
    let total_paid: Decimal = payments.iter().map(|payment| payment.amount).sum();

    let open_advances = advances
        .iter()
        .filter(|advance| advance.status.is_consumable());
    let (total_advances, remaining_advances) = open_advances.fold(
        (Decimal::ZERO, Decimal::ZERO),
        |(total, remaining), advance| {
            (total + advance.amount, remaining + advance.remaining_amount)
        },
    );

    let total_debt = total_orders_amount - total_paid;

    CustomerFinancialSummary {
        customer_id,
        total_orders_count: orders.len() as u64,
        total_orders_amount,
        total_paid,
        total_advances,
        remaining_advances,
        total_debt,
        financial_status: FinancialStatus::derive(total_debt, remaining_advances),
        last_payment_date: payments.iter().map(|payment| payment.received_at).max(),
        last_order_date: orders.iter().map(|order| order.created_at).max(),
        refreshed_at: Utc::now(),
    }
}
