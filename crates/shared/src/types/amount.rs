//! Amount helpers with decimal precision.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! All ledger amounts are two-decimal currency values held in
//! `rust_decimal::Decimal`.

use rust_decimal::{Decimal, RoundingStrategy};

/// Number of decimal places carried by every ledger amount.
pub const CURRENCY_SCALE: u32 = 2;

/// Rounds an amount to currency precision using Banker's Rounding.
///
/// Applied when amounts enter the ledger from outside (advance receipts,
/// order/payment facts) so that every stored value is a two-decimal amount.
#[must_use]
pub fn round_currency(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(CURRENCY_SCALE, RoundingStrategy::MidpointNearestEven)
}

/// Returns true if the amount is already at currency precision.
#[must_use]
pub fn is_currency_precision(amount: Decimal) -> bool {
    amount.scale() <= CURRENCY_SCALE
}
