//! Property-based tests for journal entry validation.
//!
//! - Every entry that passes validation has equal debit and credit totals
//! - Any one-cent imbalance is reported with the exact signed discrepancy
//! - Lines that are zero, two-sided, sub-cent, or beyond the money range never pass

use std::collections::HashMap;

use proptest::prelude::*;
use rust_decimal::Decimal;
use tally_shared::types::AccountId;
use tally_shared::types::money::MAX_MONEY;

use super::error::LedgerError;
use super::types::LineInput;
use super::validation::{AccountUse, validate_entry, validate_lines};

/// Strategy to generate a valid positive amount (0.01 to 1,000,000.00).
fn positive_amount() -> impl Strategy<Value = Decimal> {
    (1i64..100_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy to generate 1-8 debit amounts.
fn debit_amounts() -> impl Strategy<Value = Vec<Decimal>> {
    prop::collection::vec(positive_amount(), 1..8)
}

/// Builds a balanced entry: the given debits against one credit for their sum.
fn balanced_lines(debits: &[Decimal], debit_account: AccountId, credit_account: AccountId) -> Vec<LineInput> {
    let total: Decimal = debits.iter().copied().sum();
    let mut lines: Vec<LineInput> = debits
        .iter()
        .map(|amount| LineInput::debit(debit_account, *amount))
        .collect();
    lines.push(LineInput::credit(credit_account, total));
    lines
}

fn active_chart(ids: &[AccountId]) -> HashMap<AccountId, bool> {
    ids.iter().map(|id| (*id, true)).collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Balanced entries pass and report equal totals.
    #[test]
    fn prop_balanced_entries_pass(debits in debit_amounts()) {
        let (a, b) = (AccountId::new(), AccountId::new());
        let lines = balanced_lines(&debits, a, b);

        let totals = validate_entry(&lines, &active_chart(&[a, b]), AccountUse::NewDraft);
        prop_assert!(totals.is_ok(), "balanced entry rejected: {:?}", totals);

        let totals = totals.unwrap();
        prop_assert_eq!(totals.debit, totals.credit);
    }

    /// Shifting the credit side by any amount yields `Unbalanced` with that exact diff.
    #[test]
    fn prop_imbalance_reports_exact_diff(
        debits in debit_amounts(),
        shift_cents in 1i64..10_000,
        shift_up in any::<bool>(),
    ) {
        let (a, b) = (AccountId::new(), AccountId::new());
        let mut lines = balanced_lines(&debits, a, b);
        let shift = Decimal::new(shift_cents, 2);

        let last = lines.len() - 1;
        let credit = lines[last].credit;
        prop_assume!(shift_up || credit > shift);
        lines[last].credit = if shift_up { credit + shift } else { credit - shift };

        let expected = if shift_up { -shift } else { shift };
        let result = validate_entry(&lines, &active_chart(&[a, b]), AccountUse::NewDraft);
        prop_assert!(
            matches!(result, Err(LedgerError::Unbalanced { diff, .. }) if diff == expected),
            "expected Unbalanced({}), got {:?}", expected, result
        );
    }

    /// A line with both sides set never passes.
    #[test]
    fn prop_two_sided_line_rejected(amount in positive_amount(), other in positive_amount()) {
        let a = AccountId::new();
        let mut line = LineInput::debit(a, amount);
        line.credit = other;
        let lines = vec![line, LineInput::credit(a, amount)];

        prop_assert!(
            matches!(validate_lines(&lines), Err(LedgerError::InvalidLine { line: 1 })),
            "assertion failed: {}",
            stringify!(matches!(validate_lines(&lines), Err(LedgerError::InvalidLine { line: 1 })))
        );
    }

    /// Amounts with a third decimal digit never pass.
    #[test]
    fn prop_sub_cent_rejected(mills in 1i64..100_000_000i64) {
        prop_assume!(mills % 10 != 0);
        let a = AccountId::new();
        let amount = Decimal::new(mills, 3);
        let lines = vec![LineInput::debit(a, amount), LineInput::credit(a, amount)];

        prop_assert!(
            matches!(validate_lines(&lines), Err(LedgerError::InvalidAmount { .. })),
            "assertion failed: {}",
            stringify!(matches!(validate_lines(&lines), Err(LedgerError::InvalidAmount { .. })))
        );
    }

    /// Amounts above the stored range never pass, however many lines there are.
    #[test]
    fn prop_amount_beyond_range_rejected(excess_cents in 1i64..1_000_000_000i64, lines_count in 2usize..6) {
        let a = AccountId::new();
        let amount = MAX_MONEY + Decimal::new(excess_cents, 2);
        let mut lines: Vec<LineInput> = (1..lines_count).map(|_| LineInput::debit(a, amount)).collect();
        lines.push(LineInput::credit(a, amount));

        prop_assert!(
            matches!(validate_lines(&lines), Err(LedgerError::InvalidAmount { line: 1 })),
            "assertion failed: {}",
            stringify!(matches!(validate_lines(&lines), Err(LedgerError::InvalidAmount { line: 1 })))
        );
    }

    /// Amounts at the top of the range are accepted and summed without overflow.
    #[test]
    fn prop_amount_at_range_limit_accepted(lines_count in 1usize..8) {
        let (a, b) = (AccountId::new(), AccountId::new());
        let mut lines: Vec<LineInput> = (0..lines_count).map(|_| LineInput::debit(a, MAX_MONEY)).collect();
        lines.extend((0..lines_count).map(|_| LineInput::credit(b, MAX_MONEY)));

        let totals = validate_entry(&lines, &active_chart(&[a, b]), AccountUse::NewDraft);
        prop_assert!(totals.is_ok(), "limit entry rejected: {:?}", totals);
    }
}
