//! Reporting and reconciliation computation.
//!
//! Pure functions over caller-supplied rows: trial balance, account
//! statements with running balances, and the cached-vs-recomputed
//! comparisons behind the audit surface. Nothing here mutates state.

pub mod service;
pub mod types;

pub use service::{build_statement, diverges, trial_balance};
pub use types::{
    AccountBalanceRow, AccountStatement, BalanceMismatch, PostedLine, StatementLine,
    SummaryMismatch, TrialBalanceReport, TrialBalanceTotals, UnbalancedTransaction,
};
