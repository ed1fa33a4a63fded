//! Chart of accounts rules.
//!
//! - Account types and their normal balance side
//! - Code and name validation
//! - Parent hierarchy checks (same tenant, active, acyclic)
//! - Error types for account operations

pub mod error;
pub mod hierarchy;
pub mod types;
pub mod validation;

pub use error::{AccountError, ParentProblem};
pub use hierarchy::{ParentCandidate, validate_parent, would_create_cycle};
pub use types::{AccountType, NormalSide};
pub use validation::{MAX_CODE_LEN, MAX_NAME_LEN, normalize_code, validate_name};
