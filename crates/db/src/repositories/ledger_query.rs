//! Read-side ledger queries: balances, trial balance, and account ledgers.
//!
//! Every query counts lines of entries that were ever posted (`posted` and
//! `void`). A voided original keeps its effect up to the reversal's date;
//! from that date on the reversal cancels it.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::{
    ColumnTrait, DatabaseConnection, DatabaseTransaction, DbBackend, EntityTrait, FromQueryResult,
    JoinType, QueryFilter, QuerySelect, RelationTrait, Statement,
};
use tally_core::accounts::{AccountError, AccountType};
use tally_core::reports::{
    AccountActivity, AccountBalanceReport, LedgerLine, LedgerRow, ReportService, TrialBalanceReport,
};
use tally_core::tenancy::{Access, TenantContext};
use tally_shared::types::{AccountId, JournalEntryId, PageRequest, PageResponse};
use tracing::{debug, error};
use uuid::Uuid;

use crate::entities::sea_orm_active_enums::{AccountType as StoredAccountType, EntryStatus as StoredStatus};
use crate::entities::{accounts, journal_entries, journal_entry_lines};
use crate::error::RepositoryError;
use crate::repositories::journal::MAX_PAGE_SIZE;
use crate::tenant::TenantConnection;

/// Statuses whose lines count toward balances.
const BALANCE_STATUSES: [StoredStatus; 2] = [StoredStatus::Posted, StoredStatus::Void];

const TRIAL_BALANCE_SQL: &str = r"
SELECT a.id AS account_id,
       a.code,
       a.name,
       a.account_type,
       COALESCE(SUM(l.debit), 0) AS total_debit,
       COALESCE(SUM(l.credit), 0) AS total_credit
FROM accounts a
JOIN journal_entry_lines l ON l.account_id = a.id
JOIN journal_entries e ON e.id = l.entry_id
WHERE e.status IN ('posted', 'void')
  AND e.entry_date <= $1
GROUP BY a.id, a.code, a.name, a.account_type
";

// The window runs over the whole history up to `to`, so the running
// balance of the first row on a page already includes earlier activity.
const LEDGER_SQL: &str = r"
WITH ledger AS (
    SELECT e.id AS entry_id,
           e.entry_number,
           e.entry_date,
           e.description AS entry_description,
           e.reference,
           l.line_number,
           l.description AS line_description,
           l.debit,
           l.credit,
           SUM(l.debit - l.credit) OVER (
               ORDER BY e.entry_date, e.entry_number, l.line_number
               ROWS BETWEEN UNBOUNDED PRECEDING AND CURRENT ROW
           ) AS cumulative_net
    FROM journal_entry_lines l
    JOIN journal_entries e ON e.id = l.entry_id
    WHERE l.account_id = $1
      AND e.status IN ('posted', 'void')
      AND ($2::date IS NULL OR e.entry_date <= $2)
)
SELECT entry_id, entry_number, entry_date, entry_description, reference,
       line_description, debit, credit, cumulative_net
FROM ledger
WHERE ($3::date IS NULL OR entry_date >= $3)
ORDER BY entry_date, entry_number, line_number
LIMIT $4 OFFSET $5
";

const LEDGER_COUNT_SQL: &str = r"
SELECT COUNT(*) AS total
FROM journal_entry_lines l
JOIN journal_entries e ON e.id = l.entry_id
WHERE l.account_id = $1
  AND e.status IN ('posted', 'void')
  AND ($2::date IS NULL OR e.entry_date <= $2)
  AND ($3::date IS NULL OR e.entry_date >= $3)
";

#[derive(Debug, FromQueryResult)]
struct ActivityRow {
    account_id: Uuid,
    code: String,
    name: String,
    account_type: StoredAccountType,
    total_debit: Decimal,
    total_credit: Decimal,
}

impl From<ActivityRow> for AccountActivity {
    fn from(row: ActivityRow) -> Self {
        Self {
            account_id: AccountId::from_uuid(row.account_id),
            code: row.code,
            name: row.name,
            account_type: row.account_type.into(),
            total_debit: row.total_debit,
            total_credit: row.total_credit,
        }
    }
}

#[derive(Debug, FromQueryResult)]
struct LedgerQueryRow {
    entry_id: Uuid,
    entry_number: i64,
    entry_date: NaiveDate,
    entry_description: String,
    reference: Option<String>,
    line_description: Option<String>,
    debit: Decimal,
    credit: Decimal,
    cumulative_net: Decimal,
}

impl From<LedgerQueryRow> for LedgerRow {
    fn from(row: LedgerQueryRow) -> Self {
        Self {
            entry_id: JournalEntryId::from_uuid(row.entry_id),
            entry_number: row.entry_number,
            entry_date: row.entry_date,
            entry_description: row.entry_description,
            reference: row.reference,
            line_description: row.line_description,
            debit: row.debit,
            credit: row.credit,
            cumulative_net: row.cumulative_net,
        }
    }
}

#[derive(Debug, FromQueryResult)]
struct CountRow {
    total: i64,
}

/// Repository for ledger reports.
#[derive(Debug, Clone)]
pub struct LedgerQueryRepository {
    db: DatabaseConnection,
}

impl LedgerQueryRepository {
    /// Creates a new ledger query repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Balance of one account as of a date, signed toward its normal side.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the account does not exist in this tenant.
    pub async fn account_balance(
        &self,
        ctx: &TenantContext,
        account_id: AccountId,
        as_of: NaiveDate,
    ) -> Result<AccountBalanceReport, RepositoryError> {
        ctx.require(Access::Read)?;
        let conn = TenantConnection::begin(&self.db, ctx).await?;
        let txn = conn.transaction();

        let account = find_account(txn, account_id).await?;

        let totals: Option<(Option<Decimal>, Option<Decimal>)> = journal_entry_lines::Entity::find()
            .select_only()
            .column_as(journal_entry_lines::Column::Debit.sum(), "total_debit")
            .column_as(journal_entry_lines::Column::Credit.sum(), "total_credit")
            .join(JoinType::InnerJoin, journal_entry_lines::Relation::JournalEntries.def())
            .filter(journal_entry_lines::Column::AccountId.eq(account_id.into_inner()))
            .filter(journal_entries::Column::Status.is_in(BALANCE_STATUSES))
            .filter(journal_entries::Column::EntryDate.lte(as_of))
            .into_tuple()
            .one(txn)
            .await?;

        conn.commit().await?;

        let (total_debit, total_credit) = totals.unwrap_or_default();
        let activity = AccountActivity {
            account_id,
            code: account.code,
            name: account.name,
            account_type: account.account_type.into(),
            total_debit: total_debit.unwrap_or_default(),
            total_credit: total_credit.unwrap_or_default(),
        };

        Ok(ReportService::account_balance(activity, as_of))
    }

    /// Trial balance as of a date.
    ///
    /// # Errors
    ///
    /// Returns `TrialBalanceMismatch` if aggregate debits and credits differ.
    /// That never happens while the posting rules hold and is logged as an alert.
    pub async fn trial_balance(
        &self,
        ctx: &TenantContext,
        as_of: NaiveDate,
    ) -> Result<TrialBalanceReport, RepositoryError> {
        ctx.require(Access::Read)?;
        let conn = TenantConnection::begin(&self.db, ctx).await?;

        let rows = ActivityRow::find_by_statement(Statement::from_sql_and_values(
            DbBackend::Postgres,
            TRIAL_BALANCE_SQL,
            [as_of.into()],
        ))
        .all(conn.transaction())
        .await?;

        conn.commit().await?;

        debug!(tenant_id = %ctx.tenant_id(), %as_of, accounts = rows.len(), "Trial balance aggregated");

        let activity = rows.into_iter().map(AccountActivity::from).collect();
        ReportService::trial_balance(activity, as_of).map_err(|e| {
            error!(
                alert = "ledger_consistency",
                tenant_id = %ctx.tenant_id(),
                %as_of,
                error = %e,
                "Trial balance does not balance"
            );
            e.into()
        })
    }

    /// Paginated ledger of one account with a running balance.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown account and `InvalidDateRange` if
    /// `from` is after `to`.
    pub async fn ledger(
        &self,
        ctx: &TenantContext,
        account_id: AccountId,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
        page: PageRequest,
    ) -> Result<PageResponse<LedgerLine>, RepositoryError> {
        ctx.require(Access::Read)?;
        ReportService::check_range(from, to)?;
        let page = page.clamped(MAX_PAGE_SIZE);

        let conn = TenantConnection::begin(&self.db, ctx).await?;
        let txn = conn.transaction();

        let account = find_account(txn, account_id).await?;
        let side = AccountType::from(account.account_type).normal_side();

        let count = CountRow::find_by_statement(Statement::from_sql_and_values(
            DbBackend::Postgres,
            LEDGER_COUNT_SQL,
            [account_id.into_inner().into(), to.into(), from.into()],
        ))
        .one(txn)
        .await?;
        let total = count.map_or(0, |c| u64::try_from(c.total).unwrap_or_default());

        let rows = LedgerQueryRow::find_by_statement(Statement::from_sql_and_values(
            DbBackend::Postgres,
            LEDGER_SQL,
            [
                account_id.into_inner().into(),
                to.into(),
                from.into(),
                i64::from(page.per_page).into(),
                i64::try_from(page.offset()).unwrap_or(i64::MAX).into(),
            ],
        ))
        .all(txn)
        .await?;

        conn.commit().await?;

        let lines = ReportService::ledger_lines(side, rows.into_iter().map(LedgerRow::from).collect());
        Ok(PageResponse::new(lines, page.page, page.per_page, total))
    }
}

async fn find_account(txn: &DatabaseTransaction, account_id: AccountId) -> Result<accounts::Model, RepositoryError> {
    Ok(accounts::Entity::find_by_id(account_id.into_inner())
        .one(txn)
        .await?
        .ok_or(AccountError::NotFound(account_id))?)
}
