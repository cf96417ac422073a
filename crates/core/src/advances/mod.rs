//! Customer advances (prepayments).
//!
//! An advance is money a customer pays before any order exists. It is held
//! as a liability until consumed against orders; every partial consumption
//! is logged as an immutable usage record.

pub mod error;
pub mod types;

pub use error::AdvanceError;
pub use types::{AdvanceStatus, AdvanceUsage, CustomerAdvance, NewAdvance};
