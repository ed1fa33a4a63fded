//! Reversal planning for voided entries.
//!
//! A void never edits history. It creates an independent entry whose lines
//! mirror the original with debit and credit swapped.

use chrono::NaiveDate;
use tally_shared::ReversalDating;
use tally_shared::types::JournalEntryId;

use super::error::LedgerError;
use super::types::LineInput;
use super::validation::MAX_REFERENCE_LEN;

const REVERSAL_PREFIX: &str = "REV-";

/// The posted entry being voided.
#[derive(Debug, Clone)]
pub struct OriginalEntry {
    /// Original entry id.
    pub id: JournalEntryId,
    /// Original entry number.
    pub entry_number: i64,
    /// Original accounting date.
    pub entry_date: NaiveDate,
    /// Original reference, if any.
    pub reference: Option<String>,
    /// Original lines in display order.
    pub lines: Vec<LineInput>,
}

/// The reversal entry to insert and post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReversalPlan {
    /// Entry being reversed.
    pub reversal_of: JournalEntryId,
    /// Accounting date of the reversal.
    pub entry_date: NaiveDate,
    /// `"Reversal of entry #<n>: <reason>"`.
    pub description: String,
    /// Reference linking back to the original.
    pub reference: String,
    /// Swapped lines, same order as the original.
    pub lines: Vec<LineInput>,
}

/// Stateless service for building reversal entries.
pub struct ReversalService;

impl ReversalService {
    /// Builds the reversal for `original`.
    ///
    /// `void_date` is the date the void executes; `dating` decides whether the
    /// reversal lands on that date or on the original's date.
    ///
    /// # Errors
    ///
    /// Returns `VoidReasonRequired` if `reason` is blank.
    pub fn plan(
        original: &OriginalEntry,
        reason: &str,
        dating: ReversalDating,
        void_date: NaiveDate,
    ) -> Result<ReversalPlan, LedgerError> {
        let reason = reason.trim();
        if reason.is_empty() {
            return Err(LedgerError::VoidReasonRequired);
        }

        let entry_date = match dating {
            ReversalDating::VoidDate => void_date,
            ReversalDating::OriginalDate => original.entry_date,
        };

        let reference = match original.reference.as_deref().map(str::trim) {
            Some(r) if !r.is_empty() && REVERSAL_PREFIX.len() + r.chars().count() <= MAX_REFERENCE_LEN => {
                format!("{REVERSAL_PREFIX}{r}")
            }
            _ => format!("{REVERSAL_PREFIX}{}", original.entry_number),
        };

        Ok(ReversalPlan {
            reversal_of: original.id,
            entry_date,
            description: format!("Reversal of entry #{}: {reason}", original.entry_number),
            reference,
            lines: original.lines.iter().map(LineInput::swapped).collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use tally_shared::types::AccountId;

    fn original(reference: Option<&str>) -> OriginalEntry {
        OriginalEntry {
            id: JournalEntryId::new(),
            entry_number: 17,
            entry_date: NaiveDate::from_ymd_opt(2026, 3, 31).unwrap(),
            reference: reference.map(str::to_string),
            lines: vec![
                LineInput::debit(AccountId::new(), dec!(100.00)),
                LineInput::credit(AccountId::new(), dec!(100.00)),
            ],
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 4, 2).unwrap()
    }

    #[test]
    fn test_swaps_lines_in_order() {
        let entry = original(None);
        let plan = ReversalService::plan(&entry, "duplicate", ReversalDating::VoidDate, today()).unwrap();

        assert_eq!(plan.lines.len(), 2);
        assert_eq!(plan.lines[0].account_id, entry.lines[0].account_id);
        assert_eq!(plan.lines[0].debit, Decimal::ZERO);
        assert_eq!(plan.lines[0].credit, dec!(100.00));
        assert_eq!(plan.lines[1].debit, dec!(100.00));
        assert_eq!(plan.reversal_of, entry.id);
    }

    #[test]
    fn test_dating_policy() {
        let entry = original(None);
        let void_dated = ReversalService::plan(&entry, "x", ReversalDating::VoidDate, today()).unwrap();
        let back_dated = ReversalService::plan(&entry, "x", ReversalDating::OriginalDate, today()).unwrap();

        assert_eq!(void_dated.entry_date, today());
        assert_eq!(back_dated.entry_date, entry.entry_date);
    }

    #[test]
    fn test_description_and_reference() {
        let plan = ReversalService::plan(&original(None), " wrong account ", ReversalDating::VoidDate, today())
            .unwrap();
        assert_eq!(plan.description, "Reversal of entry #17: wrong account");
        assert_eq!(plan.reference, "REV-17");

        let plan =
            ReversalService::plan(&original(Some("INV-001")), "dup", ReversalDating::VoidDate, today()).unwrap();
        assert_eq!(plan.reference, "REV-INV-001");
    }

    #[test]
    fn test_long_reference_falls_back_to_entry_number() {
        let fits = "R".repeat(MAX_REFERENCE_LEN - REVERSAL_PREFIX.len());
        let entry = original(Some(fits.as_str()));
        let plan = ReversalService::plan(&entry, "dup", ReversalDating::VoidDate, today()).unwrap();
        assert_eq!(plan.reference, format!("REV-{fits}"));
        assert_eq!(plan.reference.chars().count(), MAX_REFERENCE_LEN);

        let longest = "R".repeat(MAX_REFERENCE_LEN);
        let entry = original(Some(longest.as_str()));
        let plan = ReversalService::plan(&entry, "dup", ReversalDating::VoidDate, today()).unwrap();
        assert_eq!(plan.reference, "REV-17");
    }

    #[test]
    fn test_blank_reason_rejected() {
        assert!(matches!(
            ReversalService::plan(&original(None), "  ", ReversalDating::VoidDate, today()),
            Err(LedgerError::VoidReasonRequired)
        ));
    }
}
