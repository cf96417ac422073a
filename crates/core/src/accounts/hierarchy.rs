//! Ancestor walks over the account tree.
//!
//! Accounts live in a flat table keyed by id with `parent` stored as an
//! optional id. Nothing here trusts the absence of cycles: every walk is
//! bounded by the total node count, and parent reassignment must be guarded
//! by [`would_create_cycle`].

use atelia_shared::types::AccountId;

/// Collects the ancestor chain of an account, nearest parent first.
///
/// `parent_of` resolves an account id to its parent id (or `None` at the
/// root). The walk stops after `bound` steps regardless of the data, so a
/// corrupt cycle never hangs the caller.
pub fn ancestor_chain(
    start: AccountId,
    bound: usize,
    parent_of: impl Fn(AccountId) -> Option<AccountId>,
) -> Vec<AccountId> {
    let mut chain = Vec::new();
    let mut cursor = parent_of(start);
    while let Some(ancestor) = cursor {
        if chain.len() >= bound {
            break;
        }
        chain.push(ancestor);
        cursor = parent_of(ancestor);
    }
    chain
}

/// Returns true if assigning `candidate_parent` to `account` would make the
/// account its own ancestor.
///
/// Performed as an explicit ancestor walk from the candidate parent, bounded
/// by `bound` (the total account count).
pub fn would_create_cycle(
    account: AccountId,
    candidate_parent: AccountId,
    bound: usize,
    parent_of: impl Fn(AccountId) -> Option<AccountId>,
) -> bool {
    if candidate_parent == account {
        return true;
    }
    ancestor_chain(candidate_parent, bound, parent_of)
        .iter()
        .any(|ancestor| *ancestor == account)
}

/// Returns the account's depth in the tree; a root account has level 0.
pub fn level(
    account: AccountId,
    bound: usize,
    parent_of: impl Fn(AccountId) -> Option<AccountId>,
) -> usize {
    ancestor_chain(account, bound, parent_of).len()
}

/// Builds the `/`-separated path of account names from the root down to the
/// account itself.
pub fn full_path(
    account: AccountId,
    bound: usize,
    parent_of: impl Fn(AccountId) -> Option<AccountId>,
    name_of: impl Fn(AccountId) -> String,
) -> String {
    let mut names: Vec<String> = ancestor_chain(account, bound, &parent_of)
        .into_iter()
        .map(&name_of)
        .collect();
    names.reverse();
    names.push(name_of(account));
    names.join(" / ")
}
