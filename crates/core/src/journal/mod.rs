//! Double-entry journal engine rules.
//!
//! This module implements the pure side of the journal engine:
//! - Entry status state machine (`Draft -> Posted -> Void`)
//! - Line and balance validation
//! - Reversal planning for voids
//! - Gap-free entry number allocation
//! - Error types for journal operations
//!
//! Storage, locking, and transactions live in the `db` crate; everything here
//! is deterministic and side-effect free.

pub mod error;
pub mod reversal;
pub mod sequence;
pub mod service;
pub mod types;
pub mod validation;

#[cfg(test)]
mod reversal_props;
#[cfg(test)]
mod validation_props;

pub use error::LedgerError;
pub use reversal::{OriginalEntry, ReversalPlan, ReversalService};
pub use sequence::EntrySequence;
pub use service::{JournalAction, JournalService};
pub use types::{DraftInput, EntryStatus, EntryTotals, LineInput};
pub use validation::{
    AccountUse, MAX_REFERENCE_LEN, ensure_balanced, normalize_reference, validate_accounts, validate_entry,
    validate_lines,
};
