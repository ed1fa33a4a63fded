//! Journal entry validation.
//!
//! Checks run in a fixed order so callers always see the first applicable
//! failure:
//! 1. At least two lines
//! 2. Each line has exactly one positive side, at 2-dp precision and within
//!    the stored money range
//! 3. Every account resolves (and is active, depending on [`AccountUse`])
//! 4. Debits equal credits to the cent

use std::collections::HashMap;

use rust_decimal::Decimal;
use tally_shared::types::AccountId;
use tally_shared::types::money::{is_money_precision, is_money_range};

use super::error::LedgerError;
use super::types::{EntryTotals, LineInput};

/// Why accounts are being resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountUse {
    /// Creating a new draft: inactive accounts are rejected.
    NewDraft,
    /// Re-validating a draft at posting time.
    Posting {
        /// Whether accounts deactivated after drafting are still accepted.
        allow_inactive: bool,
    },
}

impl AccountUse {
    const fn accepts_inactive(self) -> bool {
        match self {
            Self::NewDraft => false,
            Self::Posting { allow_inactive } => allow_inactive,
        }
    }
}

/// Validates line count and line shapes, returning the totals.
///
/// # Errors
///
/// Returns `InsufficientLines`, `InvalidAmount`, or `InvalidLine`.
pub fn validate_lines(lines: &[LineInput]) -> Result<EntryTotals, LedgerError> {
    if lines.len() < 2 {
        return Err(LedgerError::InsufficientLines);
    }

    let mut totals = EntryTotals::default();
    for (index, line) in lines.iter().enumerate() {
        let line_no = index + 1;

        if !is_valid_amount(line.debit) || !is_valid_amount(line.credit) {
            return Err(LedgerError::InvalidAmount { line: line_no });
        }

        let has_debit = line.debit > Decimal::ZERO;
        let has_credit = line.credit > Decimal::ZERO;
        if has_debit == has_credit {
            return Err(LedgerError::InvalidLine { line: line_no });
        }

        totals = totals
            .checked_add(line)
            .ok_or(LedgerError::InvalidAmount { line: line_no })?;
    }

    Ok(totals)
}

/// Maximum length of an entry reference.
pub const MAX_REFERENCE_LEN: usize = 100;

/// Trims an optional reference, dropping it when blank.
///
/// # Errors
///
/// Returns `LedgerError::InvalidReference` if the trimmed reference is longer
/// than [`MAX_REFERENCE_LEN`] characters.
pub fn normalize_reference(reference: Option<String>) -> Result<Option<String>, LedgerError> {
    let Some(trimmed) = reference.as_deref().map(str::trim).filter(|r| !r.is_empty()) else {
        return Ok(None);
    };
    if trimmed.chars().count() > MAX_REFERENCE_LEN {
        return Err(LedgerError::InvalidReference { max: MAX_REFERENCE_LEN });
    }
    Ok(Some(trimmed.to_string()))
}

fn is_valid_amount(amount: Decimal) -> bool {
    amount >= Decimal::ZERO && is_money_precision(amount) && is_money_range(amount)
}

/// Checks every referenced account against the tenant's chart.
///
/// `accounts` maps each known account id to its `is_active` flag.
///
/// # Errors
///
/// Returns `UnknownAccount` or `InactiveAccount` for the first offending line.
pub fn validate_accounts<S: std::hash::BuildHasher>(
    lines: &[LineInput],
    accounts: &HashMap<AccountId, bool, S>,
    usage: AccountUse,
) -> Result<(), LedgerError> {
    for line in lines {
        match accounts.get(&line.account_id) {
            None => return Err(LedgerError::UnknownAccount(line.account_id)),
            Some(false) if !usage.accepts_inactive() => {
                return Err(LedgerError::InactiveAccount(line.account_id));
            }
            Some(_) => {}
        }
    }
    Ok(())
}

/// Checks that totals balance exactly.
///
/// # Errors
///
/// Returns `Unbalanced` carrying the signed discrepancy.
pub fn ensure_balanced(totals: EntryTotals) -> Result<(), LedgerError> {
    if totals.is_balanced() {
        Ok(())
    } else {
        Err(LedgerError::unbalanced(totals.debit, totals.credit))
    }
}

/// Runs the full validation sequence.
///
/// # Errors
///
/// Returns the first failing check's error.
pub fn validate_entry<S: std::hash::BuildHasher>(
    lines: &[LineInput],
    accounts: &HashMap<AccountId, bool, S>,
    usage: AccountUse,
) -> Result<EntryTotals, LedgerError> {
    let totals = validate_lines(lines)?;
    validate_accounts(lines, accounts, usage)?;
    ensure_balanced(totals)?;
    Ok(totals)
}
