//! Per-tenant entry number allocation.
//!
//! The database keeps one counter row per tenant schema holding the next
//! number to hand out. The row is locked `FOR UPDATE` in the posting
//! transaction, so allocation and the status flip commit or roll back
//! together and no number is lost to an aborted post.

use super::error::LedgerError;

/// First entry number of a fresh tenant.
pub const FIRST_ENTRY_NUMBER: i64 = 1;

/// In-memory view of a locked counter row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntrySequence {
    next_number: i64,
}

impl EntrySequence {
    /// Wraps the counter value read from storage.
    #[must_use]
    pub const fn new(next_number: i64) -> Self {
        Self { next_number }
    }

    /// Takes the next number and advances the counter.
    ///
    /// # Errors
    ///
    /// Returns `SequenceExhausted` on overflow.
    pub fn allocate(&mut self) -> Result<i64, LedgerError> {
        let number = self.next_number;
        self.next_number = number.checked_add(1).ok_or(LedgerError::SequenceExhausted)?;
        Ok(number)
    }

    /// The value to write back to storage.
    #[must_use]
    pub const fn next_number(&self) -> i64 {
        self.next_number
    }
}

impl Default for EntrySequence {
    fn default() -> Self {
        Self::new(FIRST_ENTRY_NUMBER)
    }
}
