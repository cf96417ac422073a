//! Account directory: the chart of accounts.

use atelia_core::accounts::{
    Account, AccountCategory, AccountError, NewAccount, hierarchy,
};
use atelia_shared::types::{AccountId, CustomerId};
use chrono::Utc;
use rust_decimal::Decimal;

use crate::Ledger;
use crate::state::LedgerState;

impl Ledger {
    /// Creates an account.
    ///
    /// The code is trimmed before the uniqueness check. Fails on empty or
    /// duplicate codes, on a missing parent, or on a parent assignment that
    /// would make the account its own ancestor.
    pub fn create_account(&self, input: NewAccount) -> Result<Account, AccountError> {
        let mut state = self.write();
        let id = Self::create_account_locked(&mut state, input)?;
        state.account(id).cloned()
    }

    pub(crate) fn create_account_locked(
        state: &mut LedgerState,
        input: NewAccount,
    ) -> Result<AccountId, AccountError> {
        let code = input.code.trim().to_string();
        if code.is_empty() {
            return Err(AccountError::EmptyCode);
        }
        if state.account_codes.contains_key(&code) {
            return Err(AccountError::DuplicateCode(code));
        }

        let id = AccountId::new();
        if let Some(parent) = input.parent {
            if !state.accounts.contains_key(&parent) {
                return Err(AccountError::ParentNotFound(parent));
            }
            if Self::creates_cycle(state, id, parent) {
                return Err(AccountError::HierarchyCycle(id));
            }
        }

        let now = Utc::now();
        let account = Account {
            id,
            code: code.clone(),
            name: input.name,
            category: input.category,
            parent: input.parent,
            opening_balance: input.opening_balance,
            current_balance: input.opening_balance,
            is_active: true,
            allow_transactions: true,
            customer_id: input.customer_id,
            branch_id: input.branch_id,
            created_at: now,
            updated_at: now,
        };
        state.account_codes.insert(code, id);
        state.accounts.insert(id, account);
        tracing::debug!(account = %id, "account created");
        Ok(id)
    }

    fn creates_cycle(state: &LedgerState, account: AccountId, parent: AccountId) -> bool {
        hierarchy::would_create_cycle(account, parent, state.accounts.len(), |id| {
            state.accounts.get(&id).and_then(|a| a.parent)
        })
    }

    /// Moves an account under a new parent (or to the root).
    ///
    /// Every reassignment re-runs the ancestor-walk cycle check; absence of
    /// cycles is never trusted implicitly.
    pub fn reparent_account(
        &self,
        id: AccountId,
        new_parent: Option<AccountId>,
    ) -> Result<Account, AccountError> {
        let mut state = self.write();
        state.account(id)?;
        if let Some(parent) = new_parent {
            if !state.accounts.contains_key(&parent) {
                return Err(AccountError::ParentNotFound(parent));
            }
            if Self::creates_cycle(&state, id, parent) {
                return Err(AccountError::HierarchyCycle(id));
            }
        }
        let account = state.account_mut(id)?;
        account.parent = new_parent;
        account.updated_at = Utc::now();
        Ok(account.clone())
    }

    /// Fetches an account by id.
    pub fn get_account(&self, id: AccountId) -> Result<Account, AccountError> {
        self.read().account(id).cloned()
    }

    /// Fetches an account by code.
    pub fn get_account_by_code(&self, code: &str) -> Result<Account, AccountError> {
        self.read().account_by_code(code).cloned()
    }

    /// All accounts, sorted by code.
    #[must_use]
    pub fn list_accounts(&self) -> Vec<Account> {
        let state = self.read();
        let mut accounts: Vec<Account> = state.accounts.values().cloned().collect();
        accounts.sort_by(|a, b| a.code.cmp(&b.code));
        accounts
    }

    /// The deterministic code of a customer's receivable account.
    #[must_use]
    pub fn customer_account_code(&self, customer: CustomerId) -> String {
        let hex = customer.into_inner().simple().to_string();
        format!("{}-{}", self.config().accounts.receivable_prefix, &hex[..8])
    }

    /// Gets or creates the customer's receivable account.
    ///
    /// One account per customer; the code is derived deterministically from
    /// the customer identifier, so repeated calls return the same account.
    pub fn ensure_customer_account(&self, customer: CustomerId) -> Result<Account, AccountError> {
        let mut state = self.write();
        let id = self.ensure_customer_account_locked(&mut state, customer)?;
        state.account(id).cloned()
    }

    pub(crate) fn ensure_customer_account_locked(
        &self,
        state: &mut LedgerState,
        customer: CustomerId,
    ) -> Result<AccountId, AccountError> {
        let code = self.customer_account_code(customer);
        if let Some(id) = state.account_codes.get(&code) {
            return Ok(*id);
        }
        let parent = state
            .account_codes
            .get(&self.config().accounts.receivable_prefix)
            .copied();
        let hex = customer.into_inner().simple().to_string();
        let mut input = NewAccount::new(
            code,
            format!("Customer receivable {}", &hex[..8]),
            AccountCategory::Asset,
        )
        .for_customer(customer);
        input.parent = parent;
        Self::create_account_locked(state, input)
    }

    /// Authoritative balance: recomputed from scratch from posted lines,
    /// honoring the account type's normal balance. Never reads the cache.
    pub fn get_balance(&self, id: AccountId) -> Result<Decimal, AccountError> {
        self.read().recompute_account_balance(id)
    }

    /// Recomputes the balance and stores it in the cache.
    ///
    /// Called by the posting engine after every successful post; also safe
    /// to invoke from a periodic reconciliation job.
    pub fn update_balance(&self, id: AccountId) -> Result<Decimal, AccountError> {
        self.write().refresh_account_balance(id)
    }

    /// The cached balance, possibly stale between postings.
    pub fn cached_balance(&self, id: AccountId) -> Result<Decimal, AccountError> {
        Ok(self.read().account(id)?.current_balance)
    }

    /// The account's depth in the tree; root accounts have level 0.
    pub fn account_level(&self, id: AccountId) -> Result<usize, AccountError> {
        let state = self.read();
        state.account(id)?;
        Ok(hierarchy::level(id, state.accounts.len(), |id| {
            state.accounts.get(&id).and_then(|a| a.parent)
        }))
    }

    /// The `/`-separated path of names from the root to the account.
    pub fn account_full_path(&self, id: AccountId) -> Result<String, AccountError> {
        let state = self.read();
        state.account(id)?;
        Ok(hierarchy::full_path(
            id,
            state.accounts.len(),
            |id| state.accounts.get(&id).and_then(|a| a.parent),
            |id| {
                state
                    .accounts
                    .get(&id)
                    .map_or_else(String::new, |a| a.name.clone())
            },
        ))
    }

    /// Activates or deactivates an account. Inactive accounts reject
    /// postings.
    pub fn set_account_active(&self, id: AccountId, active: bool) -> Result<Account, AccountError> {
        let mut state = self.write();
        let account = state.account_mut(id)?;
        account.is_active = active;
        account.updated_at = Utc::now();
        Ok(account.clone())
    }

    /// Allows or disallows postings against an account (header accounts
    /// keep their balances but reject direct lines).
    pub fn set_allow_transactions(
        &self,
        id: AccountId,
        allow: bool,
    ) -> Result<Account, AccountError> {
        let mut state = self.write();
        let account = state.account_mut(id)?;
        account.allow_transactions = allow;
        account.updated_at = Utc::now();
        Ok(account.clone())
    }

    /// Deletes an account that has never been posted to.
    ///
    /// Referential protection: fails if any transaction line references the
    /// account. Children of a removed account move to the root.
    pub fn remove_account(&self, id: AccountId) -> Result<(), AccountError> {
        let mut state = self.write();
        state.account(id)?;
        if state.account_has_lines(id) {
            return Err(AccountError::HasTransactionLines(id));
        }
        let code = state.account(id)?.code.clone();
        state.account_codes.remove(&code);
        state.accounts.remove(&id);
        for account in state.accounts.values_mut() {
            if account.parent == Some(id) {
                account.parent = None;
            }
        }
        Ok(())
    }

    /// Installs the standard chart: one root per account category plus the
    /// configured default accounts. Idempotent; existing codes are left
    /// untouched.
    pub fn install_standard_chart(&self) -> Result<(), AccountError> {
        let mut state = self.write();

        let mut roots = std::collections::HashMap::new();
        for entry in self.registry().iter() {
            let existing = state.account_codes.get(&entry.code_prefix).copied();
            let id = match existing {
                Some(id) => id,
                None => Self::create_account_locked(
                    &mut state,
                    NewAccount::new(
                        entry.code_prefix.clone(),
                        root_name(entry.category),
                        entry.category,
                    ),
                )?,
            };
            roots.insert(entry.category, id);
        }
        // Category roots are headers, not posting targets.
        for id in roots.values() {
            let account = state.account_mut(*id)?;
            account.allow_transactions = false;
        }

        let defaults = self.config().accounts.clone();
        let ensure = |state: &mut LedgerState,
                          code: &str,
                          name: &str,
                          category: AccountCategory|
         -> Result<(), AccountError> {
            if state.account_codes.contains_key(code) {
                return Ok(());
            }
            let mut input = NewAccount::new(code, name, category);
            input.parent = roots.get(&category).copied();
            Self::create_account_locked(state, input).map(|_| ())
        };

        ensure(&mut state, &defaults.cash, "Cash on hand", AccountCategory::Asset)?;
        ensure(&mut state, &defaults.bank, "Bank account", AccountCategory::Asset)?;
        ensure(
            &mut state,
            &defaults.receivable_prefix,
            "Accounts receivable",
            AccountCategory::Asset,
        )?;
        ensure(
            &mut state,
            &defaults.customer_advances,
            "Customer advances",
            AccountCategory::Liability,
        )?;
        ensure(&mut state, &defaults.revenue, "Sales revenue", AccountCategory::Revenue)?;
        Ok(())
    }
}

fn root_name(category: AccountCategory) -> &'static str {
    match category {
        AccountCategory::Asset => "Assets",
        AccountCategory::Liability => "Liabilities",
        AccountCategory::Equity => "Equity",
        AccountCategory::Revenue => "Revenue",
        AccountCategory::Expense => "Expenses",
    }
}
