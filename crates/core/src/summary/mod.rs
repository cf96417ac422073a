//! Per-customer financial summaries.
//!
//! A summary is a materialized view, never a source of truth: `compute`
//! fully replaces every field from the customer's orders, payments, and
//! open advances.

pub mod service;
pub mod types;

pub use service::compute_summary;
pub use types::{CustomerFinancialSummary, FinancialStatus};
