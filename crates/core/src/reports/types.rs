//! Report data types.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tally_shared::types::{AccountId, JournalEntryId};

use crate::accounts::{AccountType, NormalSide};

/// Aggregated posted activity of one account up to a date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountActivity {
    /// Account ID.
    pub account_id: AccountId,
    /// Account code.
    pub code: String,
    /// Account name.
    pub name: String,
    /// Account type.
    pub account_type: AccountType,
    /// Sum of posted debits.
    pub total_debit: Decimal,
    /// Sum of posted credits.
    pub total_credit: Decimal,
}

impl AccountActivity {
    /// Returns true if any posted line touched the account.
    #[must_use]
    pub fn has_activity(&self) -> bool {
        !self.total_debit.is_zero() || !self.total_credit.is_zero()
    }
}

/// Balance of one account as of a date.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountBalanceReport {
    /// Account ID.
    pub account_id: AccountId,
    /// Account code.
    pub code: String,
    /// Account name.
    pub name: String,
    /// Account type.
    pub account_type: AccountType,
    /// Normal balance side.
    pub normal_side: NormalSide,
    /// As of date (inclusive).
    pub as_of: NaiveDate,
    /// Total debit.
    pub total_debit: Decimal,
    /// Total credit.
    pub total_credit: Decimal,
    /// Signed balance on the normal side.
    pub balance: Decimal,
}

/// One trial balance row.
///
/// The net balance is shown in exactly one of the debit and credit columns.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrialBalanceRow {
    /// Account ID.
    pub account_id: AccountId,
    /// Account code.
    pub code: String,
    /// Account name.
    pub name: String,
    /// Account type.
    pub account_type: AccountType,
    /// Debit column.
    pub debit: Decimal,
    /// Credit column.
    pub credit: Decimal,
    /// Signed balance on the normal side.
    pub balance: Decimal,
}

/// Trial balance totals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrialBalanceTotals {
    /// Total debit.
    pub total_debit: Decimal,
    /// Total credit.
    pub total_credit: Decimal,
    /// Whether debits equal credits.
    pub is_balanced: bool,
}

/// Trial balance report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrialBalanceReport {
    /// As of date (inclusive).
    pub as_of: NaiveDate,
    /// Rows ordered by account code.
    pub rows: Vec<TrialBalanceRow>,
    /// Totals.
    pub totals: TrialBalanceTotals,
}

/// A posted line as read for the account ledger.
#[derive(Debug, Clone)]
pub struct LedgerRow {
    /// Owning entry.
    pub entry_id: JournalEntryId,
    /// Entry number.
    pub entry_number: i64,
    /// Entry date.
    pub entry_date: NaiveDate,
    /// Entry description.
    pub entry_description: String,
    /// Entry reference.
    pub reference: Option<String>,
    /// Line description.
    pub line_description: Option<String>,
    /// Debit amount.
    pub debit: Decimal,
    /// Credit amount.
    pub credit: Decimal,
    /// Cumulative `debit - credit` of this account up to and including this line.
    pub cumulative_net: Decimal,
}

/// Account ledger line with running balance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerLine {
    /// Owning entry.
    pub entry_id: JournalEntryId,
    /// Entry number.
    pub entry_number: i64,
    /// Entry date.
    pub entry_date: NaiveDate,
    /// Entry description.
    pub description: String,
    /// Entry reference.
    pub reference: Option<String>,
    /// Line description.
    pub line_description: Option<String>,
    /// Debit amount.
    pub debit: Decimal,
    /// Credit amount.
    pub credit: Decimal,
    /// Balance on the normal side after this line.
    pub running_balance: Decimal,
}
