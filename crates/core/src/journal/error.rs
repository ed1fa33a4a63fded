//! Journal error types for validation and state errors.
//!
//! Validation errors are raised before anything is written. State errors
//! signal a caller-side logic error and are never coerced into success.

use rust_decimal::Decimal;
use tally_shared::types::{AccountId, JournalEntryId};
use thiserror::Error;

/// Errors that can occur during journal operations.
#[derive(Debug, Error)]
pub enum LedgerError {
    // ========== Validation Errors ==========
    /// Entry must have at least 2 lines.
    #[error("Journal entry must have at least 2 lines")]
    InsufficientLines,

    /// Line must have exactly one of debit/credit greater than zero.
    #[error("Line {line}: exactly one of debit or credit must be greater than zero")]
    InvalidLine {
        /// 1-based line number.
        line: usize,
    },

    /// Line amount is negative, has more than 2 decimal places, or exceeds the money range.
    #[error("Line {line}: amounts must be between 0 and 99999999999999999.99 with at most 2 decimal places")]
    InvalidAmount {
        /// 1-based line number.
        line: usize,
    },

    /// Referenced account does not exist in this tenant.
    #[error("Unknown account: {0}")]
    UnknownAccount(AccountId),

    /// Referenced account is inactive.
    #[error("Account {0} is inactive")]
    InactiveAccount(AccountId),

    /// Debits and credits differ.
    #[error("Journal entry is unbalanced by {diff} (debit {debit}, credit {credit})")]
    Unbalanced {
        /// Signed discrepancy, debit minus credit.
        diff: Decimal,
        /// Total debit.
        debit: Decimal,
        /// Total credit.
        credit: Decimal,
    },

    /// A void needs a reason.
    #[error("Void reason is required")]
    VoidReasonRequired,

    /// Entry reference is longer than the stored column allows.
    #[error("Reference must be at most {max} characters")]
    InvalidReference {
        /// Maximum reference length in characters.
        max: usize,
    },

    // ========== State Errors ==========
    /// Entry not found.
    #[error("Journal entry not found: {0}")]
    EntryNotFound(JournalEntryId),

    /// Entry was already posted.
    #[error("Journal entry {0} is already posted")]
    AlreadyPosted(JournalEntryId),

    /// Only posted entries can be voided.
    #[error("Journal entry {0} is not posted")]
    NotPosted(JournalEntryId),

    /// Entry was already voided.
    #[error("Journal entry {0} is already voided")]
    AlreadyVoided(JournalEntryId),

    /// Only drafts can be deleted.
    #[error("Journal entry {0} is not a draft and cannot be deleted")]
    CannotDeletePosted(JournalEntryId),

    // ========== Sequence Errors ==========
    /// The tenant's entry number counter is missing.
    #[error("Entry number sequence is missing for this tenant")]
    SequenceMissing,

    /// The entry number counter overflowed.
    #[error("Entry number sequence exhausted")]
    SequenceExhausted,
}

impl LedgerError {
    /// Builds an `Unbalanced` error from totals.
    #[must_use]
    pub fn unbalanced(debit: Decimal, credit: Decimal) -> Self {
        Self::Unbalanced {
            diff: debit - credit,
            debit,
            credit,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InsufficientLines => "INSUFFICIENT_LINES",
            Self::InvalidLine { .. } => "INVALID_LINE",
            Self::InvalidAmount { .. } => "INVALID_AMOUNT",
            Self::UnknownAccount(_) => "UNKNOWN_ACCOUNT",
            Self::InactiveAccount(_) => "INACTIVE_ACCOUNT",
            Self::Unbalanced { .. } => "UNBALANCED",
            Self::VoidReasonRequired => "VOID_REASON_REQUIRED",
            Self::InvalidReference { .. } => "INVALID_REFERENCE",
            Self::EntryNotFound(_) => "ENTRY_NOT_FOUND",
            Self::AlreadyPosted(_) => "ALREADY_POSTED",
            Self::NotPosted(_) => "NOT_POSTED",
            Self::AlreadyVoided(_) => "ALREADY_VOIDED",
            Self::CannotDeletePosted(_) => "CANNOT_DELETE_POSTED",
            Self::SequenceMissing => "SEQUENCE_MISSING",
            Self::SequenceExhausted => "SEQUENCE_EXHAUSTED",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn http_status_code(&self) -> u16 {
        match self {
            // 400 Bad Request - validation errors
            Self::InsufficientLines
            | Self::InvalidLine { .. }
            | Self::InvalidAmount { .. }
            | Self::UnknownAccount(_)
            | Self::InactiveAccount(_)
            | Self::Unbalanced { .. }
            | Self::VoidReasonRequired
            | Self::InvalidReference { .. } => 400,

            // 404 Not Found
            Self::EntryNotFound(_) => 404,

            // 409 Conflict - state errors
            Self::AlreadyPosted(_)
            | Self::NotPosted(_)
            | Self::AlreadyVoided(_)
            | Self::CannotDeletePosted(_) => 409,

            // 500 Internal Server Error
            Self::SequenceMissing | Self::SequenceExhausted => 500,
        }
    }
}
