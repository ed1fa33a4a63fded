//! Report generation service.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::error::ReportError;
use super::types::{
    AccountActivity, AccountBalanceReport, LedgerLine, LedgerRow, TrialBalanceReport,
    TrialBalanceRow, TrialBalanceTotals,
};
use crate::accounts::NormalSide;

/// Service for deriving balances and reports from posted activity.
pub struct ReportService;

impl ReportService {
    /// Builds the as-of balance of a single account.
    #[must_use]
    pub fn account_balance(activity: AccountActivity, as_of: NaiveDate) -> AccountBalanceReport {
        let normal_side = activity.account_type.normal_side();
        AccountBalanceReport {
            balance: normal_side.balance(activity.total_debit, activity.total_credit),
            account_id: activity.account_id,
            code: activity.code,
            name: activity.name,
            account_type: activity.account_type,
            normal_side,
            as_of,
            total_debit: activity.total_debit,
            total_credit: activity.total_credit,
        }
    }

    /// Generates a trial balance from per-account activity.
    ///
    /// Accounts without activity are left out. Each row shows its net in the
    /// debit column when `debit > credit`, otherwise in the credit column.
    ///
    /// # Errors
    ///
    /// Returns `ReportError::TrialBalanceMismatch` if aggregate debits and
    /// credits differ.
    pub fn trial_balance(
        mut activity: Vec<AccountActivity>,
        as_of: NaiveDate,
    ) -> Result<TrialBalanceReport, ReportError> {
        activity.retain(AccountActivity::has_activity);
        activity.sort_by(|a, b| a.code.cmp(&b.code));

        let raw_debit: Decimal = activity.iter().map(|a| a.total_debit).sum();
        let raw_credit: Decimal = activity.iter().map(|a| a.total_credit).sum();
        if raw_debit != raw_credit {
            return Err(ReportError::TrialBalanceMismatch {
                as_of,
                total_debit: raw_debit,
                total_credit: raw_credit,
            });
        }

        let rows: Vec<TrialBalanceRow> = activity
            .into_iter()
            .map(|a| {
                let net = a.total_debit - a.total_credit;
                let (debit, credit) = if net > Decimal::ZERO {
                    (net, Decimal::ZERO)
                } else {
                    (Decimal::ZERO, -net)
                };
                TrialBalanceRow {
                    balance: a.account_type.normal_side().from_net(net),
                    account_id: a.account_id,
                    code: a.code,
                    name: a.name,
                    account_type: a.account_type,
                    debit,
                    credit,
                }
            })
            .collect();

        let total_debit: Decimal = rows.iter().map(|r| r.debit).sum();
        let total_credit: Decimal = rows.iter().map(|r| r.credit).sum();

        Ok(TrialBalanceReport {
            as_of,
            rows,
            totals: TrialBalanceTotals {
                total_debit,
                total_credit,
                is_balanced: total_debit == total_credit,
            },
        })
    }

    /// Converts ledger rows to lines with a normal-side running balance.
    #[must_use]
    pub fn ledger_lines(side: NormalSide, rows: Vec<LedgerRow>) -> Vec<LedgerLine> {
        rows.into_iter()
            .map(|row| LedgerLine {
                running_balance: side.from_net(row.cumulative_net),
                entry_id: row.entry_id,
                entry_number: row.entry_number,
                entry_date: row.entry_date,
                description: row.entry_description,
                reference: row.reference,
                line_description: row.line_description,
                debit: row.debit,
                credit: row.credit,
            })
            .collect()
    }

    /// Validates an optional date range.
    ///
    /// # Errors
    ///
    /// Returns `ReportError::InvalidDateRange` if `from` is after `to`.
    pub fn check_range(from: Option<NaiveDate>, to: Option<NaiveDate>) -> Result<(), ReportError> {
        match (from, to) {
            (Some(start), Some(end)) if start > end => Err(ReportError::InvalidDateRange { start, end }),
            _ => Ok(()),
        }
    }
}
