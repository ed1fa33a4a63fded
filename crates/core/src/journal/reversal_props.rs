//! Property-based tests for reversal symmetry.
//!
//! For any posted entry E and its reversal R:
//! - `R.lines[i].debit == E.lines[i].credit` and vice versa, same account
//! - the lines of E and R together net to zero for every account
//! - R passes the same validation as E

use std::collections::HashMap;

use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;
use tally_shared::ReversalDating;
use tally_shared::types::{AccountId, JournalEntryId};

use super::reversal::{OriginalEntry, ReversalService};
use super::types::LineInput;
use super::validation::{AccountUse, validate_entry};

/// Strategy for a balanced set of lines spread across a small chart.
fn balanced_entry() -> impl Strategy<Value = (Vec<AccountId>, Vec<LineInput>)> {
    (
        prop::collection::vec((1i64..10_000_000i64, 0usize..4), 1..6),
        0usize..4,
    )
        .prop_map(|(debits, credit_slot)| {
            let accounts: Vec<AccountId> = (0..4).map(|_| AccountId::new()).collect();
            let mut lines: Vec<LineInput> = debits
                .iter()
                .map(|(cents, slot)| LineInput::debit(accounts[*slot], Decimal::new(*cents, 2)))
                .collect();
            let total: Decimal = lines.iter().map(|l| l.debit).sum();
            lines.push(LineInput::credit(accounts[credit_slot], total));
            (accounts, lines)
        })
}

fn net_by_account(lines: &[LineInput]) -> HashMap<AccountId, Decimal> {
    let mut net = HashMap::new();
    for line in lines {
        *net.entry(line.account_id).or_insert(Decimal::ZERO) += line.debit - line.credit;
    }
    net
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_reversal_mirrors_original((accounts, lines) in balanced_entry(), number in 1i64..100_000) {
        let original = OriginalEntry {
            id: JournalEntryId::new(),
            entry_number: number,
            entry_date: NaiveDate::from_ymd_opt(2026, 1, 15).unwrap(),
            reference: None,
            lines,
        };
        let void_date = NaiveDate::from_ymd_opt(2026, 2, 1).unwrap();
        let plan = ReversalService::plan(&original, "correction", ReversalDating::VoidDate, void_date).unwrap();

        prop_assert_eq!(plan.lines.len(), original.lines.len());
        for (orig, rev) in original.lines.iter().zip(&plan.lines) {
            prop_assert_eq!(rev.account_id, orig.account_id);
            prop_assert_eq!(rev.debit, orig.credit);
            prop_assert_eq!(rev.credit, orig.debit);
        }

        let mut combined = original.lines.clone();
        combined.extend(plan.lines.iter().cloned());
        for (account, net) in net_by_account(&combined) {
            prop_assert_eq!(net, Decimal::ZERO, "account {} does not net to zero", account);
        }

        let chart: HashMap<AccountId, bool> = accounts.iter().map(|a| (*a, true)).collect();
        prop_assert!(validate_entry(&plan.lines, &chart, AccountUse::NewDraft).is_ok());
    }
}
