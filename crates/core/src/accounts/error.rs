//! Account error types.

use tally_shared::types::AccountId;
use thiserror::Error;

/// Why a proposed parent account was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParentProblem {
    /// Parent does not exist in this tenant's chart.
    NotFound,
    /// Parent has been deactivated.
    Inactive,
    /// Parent is the account itself or one of its descendants.
    Cycle,
}

impl std::fmt::Display for ParentProblem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound => f.write_str("not found in this tenant"),
            Self::Inactive => f.write_str("inactive"),
            Self::Cycle => f.write_str("would create a cycle"),
        }
    }
}

/// Errors that can occur during chart of accounts operations.
#[derive(Debug, Error)]
pub enum AccountError {
    /// Account code is empty or too long.
    #[error("Invalid account code '{0}': must be 1-20 characters")]
    InvalidCode(String),

    /// Account name is empty or too long.
    #[error("Invalid account name: must be 1-255 characters")]
    InvalidName,

    /// Account code already exists in tenant.
    #[error("Account code '{0}' already exists")]
    DuplicateCode(String),

    /// Proposed parent is unusable.
    #[error("Invalid parent account {parent_id}: {problem}")]
    InvalidParent {
        /// The rejected parent.
        parent_id: AccountId,
        /// Why it was rejected.
        problem: ParentProblem,
    },

    /// Account not found.
    #[error("Account not found: {0}")]
    NotFound(AccountId),

    /// Account is inactive.
    #[error("Account {0} is inactive")]
    Inactive(AccountId),

    /// Account type cannot change once journal lines reference it.
    #[error("Cannot change type of account {0}: journal lines reference it")]
    AccountHasPostings(AccountId),

    /// System accounts cannot be deactivated or retyped.
    #[error("Account {0} is a system account and cannot be modified")]
    SystemAccountLocked(AccountId),
}

impl AccountError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidCode(_) => "INVALID_ACCOUNT_CODE",
            Self::InvalidName => "INVALID_ACCOUNT_NAME",
            Self::DuplicateCode(_) => "DUPLICATE_CODE",
            Self::InvalidParent { .. } => "INVALID_PARENT",
            Self::NotFound(_) => "ACCOUNT_NOT_FOUND",
            Self::Inactive(_) => "ACCOUNT_INACTIVE",
            Self::AccountHasPostings(_) => "ACCOUNT_HAS_POSTINGS",
            Self::SystemAccountLocked(_) => "SYSTEM_ACCOUNT_LOCKED",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn http_status_code(&self) -> u16 {
        match self {
            // 400 Bad Request - validation errors
            Self::InvalidCode(_)
            | Self::InvalidName
            | Self::DuplicateCode(_)
            | Self::InvalidParent { .. }
            | Self::Inactive(_) => 400,

            // 404 Not Found
            Self::NotFound(_) => 404,

            // 409 Conflict - state conflicts
            Self::AccountHasPostings(_) | Self::SystemAccountLocked(_) => 409,
        }
    }
}
