//! Reversal construction.
//!
//! Cancelling a posted transaction never edits its lines; its financial
//! effect is undone by a compensating transaction whose lines mirror the
//! original with debit and credit swapped.

use super::line::{NewLine, TransactionLine};

/// Builds mirror lines for a reversal: same accounts and amounts, debit and
/// credit swapped per line.
#[must_use]
pub fn reversal_lines(original: &[TransactionLine]) -> Vec<NewLine> {
    original
        .iter()
        .map(|line| NewLine {
            account_id: line.account_id,
            debit: line.credit,
            credit: line.debit,
            description: line.description.clone(),
        })
        .collect()
}

/// Description for a reversal of the given transaction number.
#[must_use]
pub fn reversal_description(original_number: &str) -> String {
    format!("Reversal of {original_number}")
}
