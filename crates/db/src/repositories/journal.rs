//! Journal repository: the transactional side of the journal engine.
//!
//! Validation and state transitions come from `tally_core::journal`; this
//! module supplies row locks, entry numbering, and atomic writes.
//!
//! Lock order is always entry row, then account rows, then the tenant's
//! `entry_sequence` row. The counter row is locked only after validation.

use std::collections::HashMap;

use chrono::{NaiveDate, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, EntityTrait,
    ModelTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};
use serde::Serialize;
use tally_core::journal::{
    AccountUse, DraftInput, EntrySequence, EntryStatus, JournalAction, JournalService,
    LedgerError, LineInput, OriginalEntry, ReversalService, ensure_balanced, normalize_reference,
    validate_accounts, validate_entry, validate_lines,
};
use tally_core::reports::ReportService;
use tally_core::tenancy::{Access, TenantContext};
use tally_shared::config::LedgerConfig;
use tally_shared::types::{AccountId, JournalEntryId, JournalLineId, PageRequest, PageResponse};
use tracing::{error, info};

use crate::entities::sea_orm_active_enums::EntryStatus as StoredStatus;
use crate::entities::{accounts, entry_sequence, journal_entries, journal_entry_lines};
use crate::error::RepositoryError;
use crate::tenant::TenantConnection;

/// A journal entry with its lines in display order.
#[derive(Debug, Clone, Serialize)]
pub struct EntryWithLines {
    /// The entry header.
    #[serde(flatten)]
    pub entry: journal_entries::Model,
    /// Lines ordered by `line_number`.
    pub lines: Vec<journal_entry_lines::Model>,
}

/// Result of voiding an entry.
#[derive(Debug, Clone, Serialize)]
pub struct VoidOutcome {
    /// The original entry, now void.
    pub original: EntryWithLines,
    /// The posted reversal entry.
    pub reversal: EntryWithLines,
}

/// Filter options for listing journal entries.
#[derive(Debug, Clone, Default)]
pub struct EntryFilter {
    /// Filter by status.
    pub status: Option<EntryStatus>,
    /// Earliest entry date (inclusive).
    pub from: Option<NaiveDate>,
    /// Latest entry date (inclusive).
    pub to: Option<NaiveDate>,
}

/// Largest page a list call may request.
pub const MAX_PAGE_SIZE: u32 = 200;

/// Repository for journal entries.
#[derive(Debug, Clone)]
pub struct JournalRepository {
    db: DatabaseConnection,
    config: LedgerConfig,
}

impl JournalRepository {
    /// Creates a new journal repository with the given posting policies.
    #[must_use]
    pub const fn new(db: DatabaseConnection, config: LedgerConfig) -> Self {
        Self { db, config }
    }

    /// Creates a draft entry.
    ///
    /// Everything is validated before the first write: line shapes, account
    /// references, then the balance.
    ///
    /// # Errors
    ///
    /// Returns the first failing validation as a `LedgerError`.
    pub async fn create_draft(
        &self,
        ctx: &TenantContext,
        input: DraftInput,
    ) -> Result<EntryWithLines, RepositoryError> {
        ctx.require(Access::Write)?;
        let totals = validate_lines(&input.lines)?;
        let reference = normalize_reference(input.reference)?;

        let conn = TenantConnection::begin(&self.db, ctx).await?;
        let txn = conn.transaction();

        // FOR SHARE keeps the referenced accounts from being retyped until commit.
        let chart = load_accounts(txn, &input.lines).await?;
        validate_accounts(&input.lines, &chart, AccountUse::NewDraft)?;
        ensure_balanced(totals)?;

        let entry_id = JournalEntryId::new();
        let entry = journal_entries::ActiveModel {
            id: Set(entry_id.into_inner()),
            entry_number: Set(None),
            entry_date: Set(input.entry_date),
            description: Set(input.description.trim().to_string()),
            reference: Set(reference),
            status: Set(EntryStatus::Draft.into()),
            reversal_of: Set(None),
            created_by: Set(ctx.principal().into_inner()),
            created_at: Set(Utc::now().fixed_offset()),
            posted_by: Set(None),
            posted_at: Set(None),
            voided_by: Set(None),
            voided_at: Set(None),
            void_reason: Set(None),
        }
        .insert(txn)
        .await?;

        let lines = insert_lines(txn, entry_id, &input.lines).await?;

        conn.commit().await?;

        info!(
            tenant_id = %ctx.tenant_id(),
            entry_id = %entry_id,
            lines = lines.len(),
            total = %totals.debit,
            "Draft journal entry created"
        );

        Ok(EntryWithLines { entry, lines })
    }

    /// Posts a draft, assigning the tenant's next entry number.
    ///
    /// # Errors
    ///
    /// Returns `EntryNotFound`, `AlreadyPosted`, `AlreadyVoided`, or a
    /// validation error if the stored lines no longer pass.
    pub async fn post(&self, ctx: &TenantContext, entry_id: JournalEntryId) -> Result<EntryWithLines, RepositoryError> {
        ctx.require(Access::Write)?;
        let conn = TenantConnection::begin(&self.db, ctx).await?;
        let txn = conn.transaction();

        let entry = lock_entry(txn, entry_id).await?;
        let action = JournalService::post(entry_id, entry.status.into(), ctx.principal())?;

        let lines = load_lines(txn, &entry).await?;
        let inputs = to_inputs(&lines);
        let chart = load_accounts(txn, &inputs).await?;
        let usage = AccountUse::Posting {
            allow_inactive: self.config.post_with_inactive_accounts,
        };
        if let Err(e) = validate_entry(&inputs, &chart, usage) {
            if matches!(e, LedgerError::Unbalanced { .. }) {
                error!(
                    alert = "ledger_consistency",
                    tenant_id = %ctx.tenant_id(),
                    entry_id = %entry_id,
                    error = %e,
                    "Stored draft is unbalanced"
                );
            }
            return Err(e.into());
        }

        let entry = apply_post(txn, entry, action).await?;

        conn.commit().await?;

        info!(
            tenant_id = %ctx.tenant_id(),
            entry_id = %entry_id,
            entry_number = entry.entry_number,
            "Journal entry posted"
        );

        Ok(EntryWithLines { entry, lines })
    }

    /// Voids a posted entry by posting its reversal.
    ///
    /// The reversal and the status flip commit together or not at all.
    ///
    /// # Errors
    ///
    /// Returns `VoidReasonRequired`, `EntryNotFound`, `NotPosted`, or `AlreadyVoided`.
    pub async fn void(
        &self,
        ctx: &TenantContext,
        entry_id: JournalEntryId,
        reason: &str,
    ) -> Result<VoidOutcome, RepositoryError> {
        ctx.require(Access::Write)?;
        let conn = TenantConnection::begin(&self.db, ctx).await?;
        let txn = conn.transaction();

        let original = lock_entry(txn, entry_id).await?;
        let void_action = JournalService::void(entry_id, original.status.into(), ctx.principal(), reason)?;

        let original_lines = load_lines(txn, &original).await?;
        let snapshot = OriginalEntry {
            id: entry_id,
            entry_number: original.entry_number.ok_or(LedgerError::NotPosted(entry_id))?,
            entry_date: original.entry_date,
            reference: original.reference.clone(),
            lines: to_inputs(&original_lines),
        };
        let plan = ReversalService::plan(
            &snapshot,
            reason,
            self.config.reversal_dating,
            Utc::now().date_naive(),
        )?;
        // Mirrors a balanced posted entry; account activity is not rechecked,
        // but the rows are still share-locked ahead of the counter.
        ensure_balanced(validate_lines(&plan.lines)?)?;
        load_accounts(txn, &plan.lines).await?;

        let reversal_id = JournalEntryId::new();
        let reversal = journal_entries::ActiveModel {
            id: Set(reversal_id.into_inner()),
            entry_number: Set(None),
            entry_date: Set(plan.entry_date),
            description: Set(plan.description),
            reference: Set(Some(plan.reference)),
            status: Set(EntryStatus::Draft.into()),
            reversal_of: Set(Some(entry_id.into_inner())),
            created_by: Set(ctx.principal().into_inner()),
            created_at: Set(Utc::now().fixed_offset()),
            posted_by: Set(None),
            posted_at: Set(None),
            voided_by: Set(None),
            voided_at: Set(None),
            void_reason: Set(None),
        }
        .insert(txn)
        .await?;
        let reversal_lines = insert_lines(txn, reversal_id, &plan.lines).await?;

        let post_action = JournalService::post(reversal_id, EntryStatus::Draft, ctx.principal())?;
        let reversal = apply_post(txn, reversal, post_action).await?;

        let mut active: journal_entries::ActiveModel = original.into();
        apply_action(&mut active, void_action);
        let original = active.update(txn).await?;

        conn.commit().await?;

        info!(
            tenant_id = %ctx.tenant_id(),
            entry_id = %entry_id,
            reversal_id = %reversal_id,
            reversal_number = reversal.entry_number,
            "Journal entry voided"
        );

        Ok(VoidOutcome {
            original: EntryWithLines {
                entry: original,
                lines: original_lines,
            },
            reversal: EntryWithLines {
                entry: reversal,
                lines: reversal_lines,
            },
        })
    }

    /// Deletes a draft and its lines.
    ///
    /// # Errors
    ///
    /// Returns `EntryNotFound` or `CannotDeletePosted`.
    pub async fn delete(&self, ctx: &TenantContext, entry_id: JournalEntryId) -> Result<(), RepositoryError> {
        ctx.require(Access::Write)?;
        let conn = TenantConnection::begin(&self.db, ctx).await?;
        let txn = conn.transaction();

        let entry = lock_entry(txn, entry_id).await?;
        JournalService::delete(entry_id, entry.status.into())?;

        journal_entry_lines::Entity::delete_many()
            .filter(journal_entry_lines::Column::EntryId.eq(entry_id.into_inner()))
            .exec(txn)
            .await?;
        entry.delete(txn).await?;

        conn.commit().await?;

        info!(tenant_id = %ctx.tenant_id(), entry_id = %entry_id, "Draft journal entry deleted");

        Ok(())
    }

    /// Gets an entry with its lines.
    ///
    /// # Errors
    ///
    /// Returns `EntryNotFound` if the entry does not exist in this tenant.
    pub async fn get(&self, ctx: &TenantContext, entry_id: JournalEntryId) -> Result<EntryWithLines, RepositoryError> {
        ctx.require(Access::Read)?;
        let conn = TenantConnection::begin(&self.db, ctx).await?;
        let txn = conn.transaction();

        let entry = journal_entries::Entity::find_by_id(entry_id.into_inner())
            .one(txn)
            .await?
            .ok_or(LedgerError::EntryNotFound(entry_id))?;
        let lines = load_lines(txn, &entry).await?;

        conn.commit().await?;
        Ok(EntryWithLines { entry, lines })
    }

    /// Lists entry headers, newest first.
    ///
    /// # Errors
    ///
    /// Returns `InvalidDateRange` if `from` is after `to`.
    pub async fn list(
        &self,
        ctx: &TenantContext,
        filter: EntryFilter,
        page: PageRequest,
    ) -> Result<PageResponse<journal_entries::Model>, RepositoryError> {
        ctx.require(Access::Read)?;
        ReportService::check_range(filter.from, filter.to)?;
        let page = page.clamped(MAX_PAGE_SIZE);

        let conn = TenantConnection::begin(&self.db, ctx).await?;
        let txn = conn.transaction();

        let mut query = journal_entries::Entity::find();
        if let Some(status) = filter.status {
            query = query.filter(journal_entries::Column::Status.eq(StoredStatus::from(status)));
        }
        if let Some(from) = filter.from {
            query = query.filter(journal_entries::Column::EntryDate.gte(from));
        }
        if let Some(to) = filter.to {
            query = query.filter(journal_entries::Column::EntryDate.lte(to));
        }

        let paginator = query
            .order_by_desc(journal_entries::Column::EntryDate)
            .order_by_desc(journal_entries::Column::CreatedAt)
            .paginate(txn, page.limit());
        let total = paginator.num_items().await?;
        let entries = paginator.fetch_page(u64::from(page.page - 1)).await?;

        conn.commit().await?;
        Ok(PageResponse::new(entries, page.page, page.per_page, total))
    }
}

/// Locks an entry row for the rest of the transaction.
async fn lock_entry(
    txn: &DatabaseTransaction,
    entry_id: JournalEntryId,
) -> Result<journal_entries::Model, RepositoryError> {
    journal_entries::Entity::find_by_id(entry_id.into_inner())
        .lock_exclusive()
        .one(txn)
        .await?
        .ok_or_else(|| LedgerError::EntryNotFound(entry_id).into())
}

async fn load_lines(
    txn: &DatabaseTransaction,
    entry: &journal_entries::Model,
) -> Result<Vec<journal_entry_lines::Model>, RepositoryError> {
    Ok(entry
        .find_related(journal_entry_lines::Entity)
        .order_by_asc(journal_entry_lines::Column::LineNumber)
        .all(txn)
        .await?)
}

/// Loads `id -> is_active` for every account the lines reference.
async fn load_accounts(
    txn: &DatabaseTransaction,
    lines: &[LineInput],
) -> Result<HashMap<AccountId, bool>, RepositoryError> {
    let mut ids: Vec<_> = lines.iter().map(|l| l.account_id.into_inner()).collect();
    ids.sort_unstable();
    ids.dedup();

    let rows: Vec<(uuid::Uuid, bool)> = accounts::Entity::find()
        .select_only()
        .column(accounts::Column::Id)
        .column(accounts::Column::IsActive)
        .filter(accounts::Column::Id.is_in(ids))
        .lock_shared()
        .into_tuple()
        .all(txn)
        .await?;

    Ok(rows
        .into_iter()
        .map(|(id, active)| (AccountId::from_uuid(id), active))
        .collect())
}

async fn insert_lines(
    txn: &DatabaseTransaction,
    entry_id: JournalEntryId,
    lines: &[LineInput],
) -> Result<Vec<journal_entry_lines::Model>, RepositoryError> {
    let mut stored = Vec::with_capacity(lines.len());
    for (line_number, line) in (1_i32..).zip(lines) {
        let model = journal_entry_lines::ActiveModel {
            id: Set(JournalLineId::new().into_inner()),
            entry_id: Set(entry_id.into_inner()),
            line_number: Set(line_number),
            account_id: Set(line.account_id.into_inner()),
            debit: Set(line.debit),
            credit: Set(line.credit),
            description: Set(line.description.clone()),
        }
        .insert(txn)
        .await?;
        stored.push(model);
    }
    Ok(stored)
}

fn to_inputs(lines: &[journal_entry_lines::Model]) -> Vec<LineInput> {
    lines
        .iter()
        .map(|l| LineInput {
            account_id: AccountId::from_uuid(l.account_id),
            debit: l.debit,
            credit: l.credit,
            description: l.description.clone(),
        })
        .collect()
}

/// Takes the next entry number from the tenant's counter row.
///
/// The row stays locked until the caller's transaction ends, so concurrent
/// posts in the same tenant serialize here and nowhere else.
async fn next_entry_number(txn: &DatabaseTransaction) -> Result<i64, RepositoryError> {
    let counter = entry_sequence::Entity::find_by_id(entry_sequence::SEQUENCE_ROW_ID)
        .lock_exclusive()
        .one(txn)
        .await?
        .ok_or(LedgerError::SequenceMissing)?;

    let mut sequence = EntrySequence::new(counter.next_number);
    let number = sequence.allocate()?;

    let mut active: entry_sequence::ActiveModel = counter.into();
    active.next_number = Set(sequence.next_number());
    active.update(txn).await?;

    Ok(number)
}

async fn apply_post(
    txn: &DatabaseTransaction,
    entry: journal_entries::Model,
    action: JournalAction,
) -> Result<journal_entries::Model, RepositoryError> {
    let number = next_entry_number(txn).await?;
    let mut active: journal_entries::ActiveModel = entry.into();
    active.entry_number = Set(Some(number));
    apply_action(&mut active, action);
    Ok(active.update(txn).await?)
}

fn apply_action(entry: &mut journal_entries::ActiveModel, action: JournalAction) {
    match action {
        JournalAction::Post {
            new_status,
            posted_by,
            posted_at,
        } => {
            entry.status = Set(new_status.into());
            entry.posted_by = Set(Some(posted_by.into_inner()));
            entry.posted_at = Set(Some(posted_at.fixed_offset()));
        }
        JournalAction::Void {
            new_status,
            voided_by,
            voided_at,
            reason,
        } => {
            entry.status = Set(new_status.into());
            entry.voided_by = Set(Some(voided_by.into_inner()));
            entry.voided_at = Set(Some(voided_at.fixed_offset()));
            entry.void_reason = Set(Some(reason));
        }
    }
}
