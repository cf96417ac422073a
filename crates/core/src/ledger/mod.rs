//! Double-entry bookkeeping logic.
//!
//! This module implements the core ledger functionality:
//! - Transaction lines (debits and credits)
//! - Transaction aggregates and the posting state machine
//! - Balance calculations
//! - Business rule validation
//! - Reversal construction
//! - Document numbering
//! - Error types for ledger operations

pub mod balance;
pub mod error;
pub mod line;
pub mod numbering;
pub mod reversal;
pub mod transaction;
pub mod validation;

#[cfg(test)]
mod validation_props;

pub use balance::recompute_balance;
pub use error::LedgerError;
pub use line::{NewLine, TransactionLine};
pub use numbering::NumberSequencer;
pub use reversal::{reversal_description, reversal_lines};
pub use transaction::{NewTransaction, Transaction, TransactionKind, TransactionStatus};
pub use validation::{AccountPostingInfo, validate_for_posting, validate_lines};
