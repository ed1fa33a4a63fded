//! Parent/child hierarchy checks for the chart of accounts.

use std::collections::{HashMap, HashSet};

use tally_shared::types::AccountId;

use super::error::{AccountError, ParentProblem};

/// What the registry knows about a proposed parent.
#[derive(Debug, Clone, Copy)]
pub struct ParentCandidate {
    /// The proposed parent id.
    pub id: AccountId,
    /// Whether the parent was found in the tenant's chart.
    pub exists: bool,
    /// Whether the parent is active.
    pub is_active: bool,
}

/// Returns true if making `new_parent` the parent of `account` would close a loop.
///
/// `parents` maps every account in the chart to its current parent. Walks up
/// from `new_parent`; a visited set stops the walk on pre-existing loops.
#[must_use]
pub fn would_create_cycle<S: std::hash::BuildHasher>(
    account: AccountId,
    new_parent: AccountId,
    parents: &HashMap<AccountId, Option<AccountId>, S>,
) -> bool {
    let mut visited = HashSet::new();
    let mut current = Some(new_parent);

    while let Some(node) = current {
        if node == account {
            return true;
        }
        if !visited.insert(node) {
            return true;
        }
        current = parents.get(&node).copied().flatten();
    }

    false
}

/// Validates a proposed parent for `account`.
///
/// A parent from another tenant is never visible through this tenant's
/// namespace, so it surfaces as `ParentProblem::NotFound`.
///
/// # Errors
///
/// Returns `AccountError::InvalidParent` if the parent is missing, inactive,
/// or would create a cycle.
pub fn validate_parent<S: std::hash::BuildHasher>(
    account: AccountId,
    candidate: ParentCandidate,
    parents: &HashMap<AccountId, Option<AccountId>, S>,
) -> Result<(), AccountError> {
    let problem = if !candidate.exists {
        Some(ParentProblem::NotFound)
    } else if !candidate.is_active {
        Some(ParentProblem::Inactive)
    } else if would_create_cycle(account, candidate.id, parents) {
        Some(ParentProblem::Cycle)
    } else {
        None
    };

    match problem {
        Some(problem) => Err(AccountError::InvalidParent {
            parent_id: candidate.id,
            problem,
        }),
        None => Ok(()),
    }
}
