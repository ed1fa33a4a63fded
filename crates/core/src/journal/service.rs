//! Journal entry state machine.
//!
//! Transitions are validated here and returned as a `JournalAction` with
//! audit information; the repository applies the action inside its
//! transaction.

use chrono::{DateTime, Utc};
use tally_shared::types::{JournalEntryId, UserId};

use super::error::LedgerError;
use super::types::EntryStatus;

/// Result of a successful state transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JournalAction {
    /// Draft becomes posted.
    Post {
        /// New status (always `Posted`).
        new_status: EntryStatus,
        /// The posting principal.
        posted_by: UserId,
        /// Posting timestamp.
        posted_at: DateTime<Utc>,
    },
    /// Posted entry becomes void.
    Void {
        /// New status (always `Void`).
        new_status: EntryStatus,
        /// The voiding principal.
        voided_by: UserId,
        /// Void timestamp.
        voided_at: DateTime<Utc>,
        /// Trimmed, non-empty reason.
        reason: String,
    },
}

/// Stateless service for journal entry transitions.
pub struct JournalService;

impl JournalService {
    /// Post a draft entry.
    ///
    /// # Errors
    ///
    /// Returns `AlreadyPosted` for posted entries and `AlreadyVoided` for void ones.
    pub fn post(
        entry_id: JournalEntryId,
        current_status: EntryStatus,
        posted_by: UserId,
    ) -> Result<JournalAction, LedgerError> {
        match current_status {
            EntryStatus::Draft => Ok(JournalAction::Post {
                new_status: EntryStatus::Posted,
                posted_by,
                posted_at: Utc::now(),
            }),
            EntryStatus::Posted => Err(LedgerError::AlreadyPosted(entry_id)),
            EntryStatus::Void => Err(LedgerError::AlreadyVoided(entry_id)),
        }
    }

    /// Void a posted entry.
    ///
    /// # Errors
    ///
    /// Returns `VoidReasonRequired` for a blank reason, `NotPosted` for drafts,
    /// and `AlreadyVoided` for void entries.
    pub fn void(
        entry_id: JournalEntryId,
        current_status: EntryStatus,
        voided_by: UserId,
        reason: &str,
    ) -> Result<JournalAction, LedgerError> {
        let reason = reason.trim();
        if reason.is_empty() {
            return Err(LedgerError::VoidReasonRequired);
        }

        match current_status {
            EntryStatus::Posted => Ok(JournalAction::Void {
                new_status: EntryStatus::Void,
                voided_by,
                voided_at: Utc::now(),
                reason: reason.to_string(),
            }),
            EntryStatus::Draft => Err(LedgerError::NotPosted(entry_id)),
            EntryStatus::Void => Err(LedgerError::AlreadyVoided(entry_id)),
        }
    }

    /// Check that an entry may be deleted.
    ///
    /// # Errors
    ///
    /// Returns `CannotDeletePosted` unless the entry is a draft.
    pub fn delete(entry_id: JournalEntryId, current_status: EntryStatus) -> Result<(), LedgerError> {
        if current_status.is_editable() {
            Ok(())
        } else {
            Err(LedgerError::CannotDeletePosted(entry_id))
        }
    }
}
