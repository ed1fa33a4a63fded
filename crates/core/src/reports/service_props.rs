//! Property-based tests for the trial balance.
//!
//! For any history of balanced posts and voids, aggregating lines per account
//! yields a trial balance whose debit and credit totals are equal.

use std::collections::HashMap;

use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;
use tally_shared::ReversalDating;
use tally_shared::types::{AccountId, JournalEntryId};

use super::service::ReportService;
use super::types::AccountActivity;
use crate::accounts::AccountType;
use crate::journal::{LineInput, OriginalEntry, ReversalService};

/// A balanced entry over account slots 0..5, plus whether it gets voided.
fn entry() -> impl Strategy<Value = (Vec<(usize, i64)>, usize, bool)> {
    (
        prop::collection::vec((0usize..5, 1i64..5_000_000), 1..5),
        0usize..5,
        any::<bool>(),
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_trial_balance_always_balances(history in prop::collection::vec(entry(), 0..20)) {
        let accounts: Vec<(AccountId, AccountType)> = AccountType::ALL
            .iter()
            .map(|t| (AccountId::new(), *t))
            .collect();
        let void_date = NaiveDate::from_ymd_opt(2026, 5, 1).unwrap();

        let mut posted: Vec<LineInput> = Vec::new();
        for (number, (debits, credit_slot, voided)) in history.iter().enumerate() {
            let mut lines: Vec<LineInput> = debits
                .iter()
                .map(|(slot, cents)| LineInput::debit(accounts[*slot].0, Decimal::new(*cents, 2)))
                .collect();
            let total: Decimal = lines.iter().map(|l| l.debit).sum();
            lines.push(LineInput::credit(accounts[*credit_slot].0, total));

            if *voided {
                let original = OriginalEntry {
                    id: JournalEntryId::new(),
                    entry_number: i64::try_from(number).unwrap() + 1,
                    entry_date: void_date,
                    reference: None,
                    lines: lines.clone(),
                };
                let plan = ReversalService::plan(&original, "void", ReversalDating::VoidDate, void_date).unwrap();
                posted.extend(plan.lines);
            }
            posted.extend(lines);
        }

        let mut totals: HashMap<AccountId, (Decimal, Decimal)> = HashMap::new();
        for line in &posted {
            let t = totals.entry(line.account_id).or_insert((Decimal::ZERO, Decimal::ZERO));
            t.0 += line.debit;
            t.1 += line.credit;
        }

        let activity: Vec<AccountActivity> = accounts
            .iter()
            .enumerate()
            .map(|(i, (id, account_type))| {
                let (debit, credit) = totals.get(id).copied().unwrap_or_default();
                AccountActivity {
                    account_id: *id,
                    code: format!("{}", (i + 1) * 1000),
                    name: account_type.to_string(),
                    account_type: *account_type,
                    total_debit: debit,
                    total_credit: credit,
                }
            })
            .collect();

        let report = ReportService::trial_balance(activity, void_date);
        prop_assert!(report.is_ok(), "trial balance rejected: {:?}", report);

        let report = report.unwrap();
        prop_assert_eq!(report.totals.total_debit, report.totals.total_credit);
        prop_assert!(report.totals.is_balanced);
    }
}
