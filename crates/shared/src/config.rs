//! Ledger configuration management.
//!
//! The posting engine and the domain-event handlers never look up default
//! accounts ad hoc; they receive a [`LedgerConfig`] value at construction
//! time.

use serde::Deserialize;

/// Ledger configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LedgerConfig {
    /// Codes of the accounts system postings are routed through.
    #[serde(default)]
    pub accounts: DefaultAccounts,
    /// Transaction/advance numbering prefixes.
    #[serde(default)]
    pub numbering: NumberingConfig,
}

/// Codes of the accounts that system-generated postings are routed through.
///
/// These accounts must exist in the chart before the first automatic posting.
#[derive(Debug, Clone, Deserialize)]
pub struct DefaultAccounts {
    /// Cash on hand (asset, debit-normal).
    #[serde(default = "default_cash")]
    pub cash: String,
    /// Bank account (asset, debit-normal).
    #[serde(default = "default_bank")]
    pub bank: String,
    /// Prefix under which per-customer receivable accounts are created.
    #[serde(default = "default_receivable_prefix")]
    pub receivable_prefix: String,
    /// Sales revenue (revenue, credit-normal).
    #[serde(default = "default_revenue")]
    pub revenue: String,
    /// Customer advances held as a liability until consumed.
    #[serde(default = "default_customer_advances")]
    pub customer_advances: String,
}

/// Numbering prefixes for generated document numbers.
///
/// Numbers take the form `PREFIX-YYYYMM-NNNNN`, monotonically increasing
/// within each month scope.
#[derive(Debug, Clone, Deserialize)]
pub struct NumberingConfig {
    /// Prefix for payment transactions.
    #[serde(default = "default_payment")]
    pub payment: String,
    /// Prefix for advance-receipt transactions (distinct from the advance
    /// document prefix so the two sequences never share a scope).
    #[serde(default = "default_advance")]
    pub advance: String,
    /// Prefix for invoice transactions.
    #[serde(default = "default_invoice")]
    pub invoice: String,
    /// Prefix for refund transactions.
    #[serde(default = "default_refund")]
    pub refund: String,
    /// Prefix for expense transactions.
    #[serde(default = "default_expense")]
    pub expense: String,
    /// Prefix for transfer transactions.
    #[serde(default = "default_transfer")]
    pub transfer: String,
    /// Prefix for adjustment transactions.
    #[serde(default = "default_adjustment")]
    pub adjustment: String,
    /// Prefix for opening-balance transactions.
    #[serde(default = "default_opening")]
    pub opening: String,
    /// Prefix for customer advance numbers.
    #[serde(default = "default_advance_number")]
    pub advance_number: String,
}

fn default_cash() -> String {
    "1010".to_string()
}

fn default_bank() -> String {
    "1020".to_string()
}

fn default_receivable_prefix() -> String {
    "1200".to_string()
}

fn default_revenue() -> String {
    "4010".to_string()
}

fn default_customer_advances() -> String {
    "2300".to_string()
}

fn default_payment() -> String {
    "PAY".to_string()
}

fn default_advance() -> String {
    "ADR".to_string()
}

fn default_invoice() -> String {
    "INV".to_string()
}

fn default_refund() -> String {
    "REF".to_string()
}

fn default_expense() -> String {
    "EXP".to_string()
}

fn default_transfer() -> String {
    "TRF".to_string()
}

fn default_adjustment() -> String {
    "ADJ".to_string()
}

fn default_opening() -> String {
    "OPN".to_string()
}

fn default_advance_number() -> String {
    "ADV".to_string()
}

impl Default for DefaultAccounts {
    fn default() -> Self {
        Self {
            cash: default_cash(),
            bank: default_bank(),
            receivable_prefix: default_receivable_prefix(),
            revenue: default_revenue(),
            customer_advances: default_customer_advances(),
        }
    }
}

impl Default for NumberingConfig {
    fn default() -> Self {
        Self {
            payment: default_payment(),
            advance: default_advance(),
            invoice: default_invoice(),
            refund: default_refund(),
            expense: default_expense(),
            transfer: default_transfer(),
            adjustment: default_adjustment(),
            opening: default_opening(),
            advance_number: default_advance_number(),
        }
    }
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            accounts: DefaultAccounts::default(),
            numbering: NumberingConfig::default(),
        }
    }
}

impl LedgerConfig {
    /// Loads configuration from config files and environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded or deserialized.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("ATELIA").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}
