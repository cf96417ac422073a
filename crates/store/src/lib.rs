//! In-process ledger store and posting orchestration for Atelia.
//!
//! The [`Ledger`] owns the relational state (accounts, transactions, lines,
//! advances, usages, summaries) behind a single `RwLock`. Every mutating
//! operation runs inside one write-lock scope, the system's one hard
//! transactional boundary: either all of its effects commit, or none do.
//!
//! # Modules
//!
//! - `directory` - Account directory (chart of accounts)
//! - `posting` - Posting engine state machine
//! - `advances` - Customer advance ledger
//! - `events` - Inbound domain events (orders, payments)
//! - `summary` - Customer financial summaries
//! - `reports` - Query and audit surface

mod state;

pub mod advances;
pub mod directory;
pub mod events;
pub mod posting;
pub mod reports;
pub mod summary;

use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use atelia_core::accounts::{AccountError, AccountTypeRegistry};
use atelia_shared::LedgerConfig;

use state::LedgerState;

pub use events::EventError;
pub use posting::TransactionFilter;

/// The ledger engine.
///
/// Construct one per installation, inject the configuration once, and share
/// it freely across threads; all synchronization is internal.
pub struct Ledger {
    config: LedgerConfig,
    registry: AccountTypeRegistry,
    state: RwLock<LedgerState>,
}

impl Ledger {
    /// Creates an empty ledger with the given configuration and the
    /// standard account type registry.
    #[must_use]
    pub fn new(config: LedgerConfig) -> Self {
        Self {
            config,
            registry: AccountTypeRegistry::standard(),
            state: RwLock::new(LedgerState::default()),
        }
    }

    /// Creates a ledger and installs the standard chart of accounts.
    ///
    /// # Errors
    ///
    /// Returns an error if the chart cannot be installed (only possible
    /// with conflicting configured codes).
    pub fn with_standard_chart(config: LedgerConfig) -> Result<Self, AccountError> {
        let ledger = Self::new(config);
        ledger.install_standard_chart()?;
        Ok(ledger)
    }

    /// The configuration this ledger was constructed with.
    #[must_use]
    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    /// The account type registry.
    #[must_use]
    pub fn registry(&self) -> &AccountTypeRegistry {
        &self.registry
    }

    pub(crate) fn read(&self) -> RwLockReadGuard<'_, LedgerState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn write(&self) -> RwLockWriteGuard<'_, LedgerState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for Ledger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ledger").finish_non_exhaustive()
    }
}
