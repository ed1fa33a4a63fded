//! Journal domain types.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tally_shared::types::AccountId;

/// Journal entry status.
///
/// `Draft` is the only editable state. `Void` is reachable only from `Posted`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryStatus {
    /// Being prepared; no entry number yet.
    Draft,
    /// Posted to the ledger (immutable).
    Posted,
    /// Neutralized by a reversal entry (immutable).
    Void,
}

impl EntryStatus {
    /// Returns true if lines may still be added, edited, or removed.
    #[must_use]
    pub const fn is_editable(self) -> bool {
        matches!(self, Self::Draft)
    }

    /// Returns true if the entry was posted at some point.
    ///
    /// A voided original keeps its effect on balances; the reversal entry
    /// cancels it from the reversal's date onwards.
    #[must_use]
    pub const fn affects_balances(self) -> bool {
        matches!(self, Self::Posted | Self::Void)
    }

    /// Returns the status as stored in the database.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Posted => "posted",
            Self::Void => "void",
        }
    }
}

impl std::fmt::Display for EntryStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for EntryStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(Self::Draft),
            "posted" => Ok(Self::Posted),
            "void" => Ok(Self::Void),
            other => Err(format!("unknown entry status: {other}")),
        }
    }
}

/// One debit or credit line of a journal entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineInput {
    /// The account to post to.
    pub account_id: AccountId,
    /// Debit amount (0 if credit).
    pub debit: Decimal,
    /// Credit amount (0 if debit).
    pub credit: Decimal,
    /// Optional line description.
    pub description: Option<String>,
}

impl LineInput {
    /// Creates a debit line.
    #[must_use]
    pub fn debit(account_id: AccountId, amount: Decimal) -> Self {
        Self {
            account_id,
            debit: amount,
            credit: Decimal::ZERO,
            description: None,
        }
    }

    /// Creates a credit line.
    #[must_use]
    pub fn credit(account_id: AccountId, amount: Decimal) -> Self {
        Self {
            account_id,
            debit: Decimal::ZERO,
            credit: amount,
            description: None,
        }
    }

    /// Returns the same line with debit and credit swapped.
    #[must_use]
    pub fn swapped(&self) -> Self {
        Self {
            account_id: self.account_id,
            debit: self.credit,
            credit: self.debit,
            description: self.description.clone(),
        }
    }
}

/// Input for creating a draft entry.
#[derive(Debug, Clone)]
pub struct DraftInput {
    /// Accounting date of the entry.
    pub entry_date: NaiveDate,
    /// Entry description.
    pub description: String,
    /// Optional external reference (invoice number, etc.).
    pub reference: Option<String>,
    /// Lines in display order.
    pub lines: Vec<LineInput>,
}

/// Debit and credit totals of an entry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryTotals {
    /// Sum of debit amounts.
    pub debit: Decimal,
    /// Sum of credit amounts.
    pub credit: Decimal,
}

impl EntryTotals {
    /// Sums the totals of a set of lines, or `None` on overflow.
    #[must_use]
    pub fn of(lines: &[LineInput]) -> Option<Self> {
        lines.iter().try_fold(Self::default(), |acc, line| acc.checked_add(line))
    }

    /// Adds one line to the totals, or `None` on overflow.
    #[must_use]
    pub fn checked_add(self, line: &LineInput) -> Option<Self> {
        Some(Self {
            debit: self.debit.checked_add(line.debit)?,
            credit: self.credit.checked_add(line.credit)?,
        })
    }

    /// Signed discrepancy, `debit - credit`.
    #[must_use]
    pub fn difference(&self) -> Decimal {
        self.debit - self.credit
    }

    /// Returns true if debits equal credits exactly.
    #[must_use]
    pub fn is_balanced(&self) -> bool {
        self.debit == self.credit
    }
}
