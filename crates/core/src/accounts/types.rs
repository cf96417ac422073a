//! Account domain types and the account type registry.

use atelia_shared::types::{AccountId, BranchId, CustomerId};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Account category in the chart of accounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountCategory {
    /// Resources owned (cash, bank, receivables).
    Asset,
    /// Obligations owed (customer advances, payables).
    Liability,
    /// Owner's residual interest.
    Equity,
    /// Income earned.
    Revenue,
    /// Costs incurred.
    Expense,
}

impl AccountCategory {
    /// Returns the side on which this category's balance naturally increases.
    #[must_use]
    pub const fn normal_balance(self) -> BalanceSide {
        match self {
            Self::Asset | Self::Expense => BalanceSide::Debit,
            Self::Liability | Self::Equity | Self::Revenue => BalanceSide::Credit,
        }
    }
}

/// Side of a ledger entry: debit or credit.
///
/// In double-entry bookkeeping:
/// - Debits increase asset/expense accounts, decrease liability/equity/revenue accounts
/// - Credits decrease asset/expense accounts, increase liability/equity/revenue accounts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BalanceSide {
    /// Debit side.
    Debit,
    /// Credit side.
    Credit,
}

impl BalanceSide {
    /// Calculates the balance change a line produces on an account whose
    /// normal balance is this side.
    ///
    /// Debit-normal: `debit - credit`. Credit-normal: `credit - debit`.
    #[must_use]
    pub fn balance_change(self, debit: Decimal, credit: Decimal) -> Decimal {
        match self {
            Self::Debit => debit - credit,
            Self::Credit => credit - debit,
        }
    }
}

/// Immutable reference data describing one account category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountType {
    /// The category this row describes.
    pub category: AccountCategory,
    /// Leading digit(s) of account codes in this category.
    pub code_prefix: String,
    /// The category's normal balance side.
    pub normal_balance: BalanceSide,
}

/// Registry of account types.
///
/// Pure reference data; every account resolves to exactly one row via its
/// category.
#[derive(Debug, Clone)]
pub struct AccountTypeRegistry {
    entries: Vec<AccountType>,
}

impl AccountTypeRegistry {
    /// The standard five-category registry with code prefixes 1-5.
    #[must_use]
    pub fn standard() -> Self {
        let entry = |category: AccountCategory, prefix: &str| AccountType {
            category,
            code_prefix: prefix.to_string(),
            normal_balance: category.normal_balance(),
        };
        Self {
            entries: vec![
                entry(AccountCategory::Asset, "1"),
                entry(AccountCategory::Liability, "2"),
                entry(AccountCategory::Equity, "3"),
                entry(AccountCategory::Revenue, "4"),
                entry(AccountCategory::Expense, "5"),
            ],
        }
    }

    /// Looks up the registry row for a category.
    ///
    /// # Panics
    ///
    /// Never panics for a registry built by [`Self::standard`], which covers
    /// every category.
    #[must_use]
    pub fn get(&self, category: AccountCategory) -> &AccountType {
        self.entries
            .iter()
            .find(|entry| entry.category == category)
            .unwrap_or(&self.entries[0])
    }

    /// Resolves a category from an account code by its prefix, longest
    /// prefix first.
    #[must_use]
    pub fn category_for_code(&self, code: &str) -> Option<AccountCategory> {
        self.entries
            .iter()
            .filter(|entry| code.starts_with(&entry.code_prefix))
            .max_by_key(|entry| entry.code_prefix.len())
            .map(|entry| entry.category)
    }

    /// Iterates over all registry rows.
    pub fn iter(&self) -> impl Iterator<Item = &AccountType> {
        self.entries.iter()
    }
}

impl Default for AccountTypeRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

/// A node in the chart of accounts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    /// Unique identifier.
    pub id: AccountId,
    /// Unique account code (trimmed, non-empty).
    pub code: String,
    /// Human-readable name.
    pub name: String,
    /// Account category, resolving to one registry row.
    pub category: AccountCategory,
    /// Parent account, if any.
    pub parent: Option<AccountId>,
    /// Balance carried in before any posted lines.
    pub opening_balance: Decimal,
    /// Cached balance; reconcilable against the posted-line history on
    /// demand.
    pub current_balance: Decimal,
    /// Whether the account is active.
    pub is_active: bool,
    /// Whether new transaction lines may reference this account.
    pub allow_transactions: bool,
    /// The customer this account belongs to, for per-customer receivables.
    pub customer_id: Option<CustomerId>,
    /// The branch this account belongs to, if any.
    pub branch_id: Option<BranchId>,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
    /// When the account was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Account {
    /// Returns the side on which this account's balance naturally increases.
    #[must_use]
    pub const fn normal_balance(&self) -> BalanceSide {
        self.category.normal_balance()
    }

    /// Returns true if the account accepts new postings.
    #[must_use]
    pub const fn accepts_postings(&self) -> bool {
        self.is_active && self.allow_transactions
    }
}

/// Input for creating an account.
#[derive(Debug, Clone)]
pub struct NewAccount {
    /// Account code; trimmed before the uniqueness check.
    pub code: String,
    /// Human-readable name.
    pub name: String,
    /// Account category.
    pub category: AccountCategory,
    /// Parent account, if any.
    pub parent: Option<AccountId>,
    /// Opening balance; defaults to zero.
    pub opening_balance: Decimal,
    /// Linked customer, if this is a per-customer account.
    pub customer_id: Option<CustomerId>,
    /// Linked branch, if any.
    pub branch_id: Option<BranchId>,
}

impl NewAccount {
    /// Creates an input with the given code, name and category; all other
    /// fields empty.
    #[must_use]
    pub fn new(code: impl Into<String>, name: impl Into<String>, category: AccountCategory) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            category,
            parent: None,
            opening_balance: Decimal::ZERO,
            customer_id: None,
            branch_id: None,
        }
    }

    /// Sets the parent account.
    #[must_use]
    pub fn with_parent(mut self, parent: AccountId) -> Self {
        self.parent = Some(parent);
        self
    }

    /// Sets the opening balance.
    #[must_use]
    pub fn with_opening_balance(mut self, opening: Decimal) -> Self {
        self.opening_balance = opening;
        self
    }

    /// Links the account to a customer.
    #[must_use]
    pub fn for_customer(mut self, customer: CustomerId) -> Self {
        self.customer_id = Some(customer);
        self
    }
}
