//! Journal entry routes: drafts, posting, voiding.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};
use chrono::{DateTime, FixedOffset, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tally_core::journal::{DraftInput, EntryStatus, LineInput};
use tally_core::tenancy::Access;
use tally_db::entities::{journal_entries, journal_entry_lines};
use tally_db::repositories::{EntryFilter, EntryWithLines, JournalRepository, VoidOutcome};
use tally_shared::types::{AccountId, JournalEntryId, PageMeta, PageRequest};
use uuid::Uuid;

use super::tenant_context;
use crate::error::{ApiError, ApiJson, ApiPath, ApiQuery};
use crate::{AppState, middleware::AuthUser};

/// Creates the journal entry routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/tenants/{tenant_id}/journal-entries",
            get(list_entries).post(create_entry),
        )
        .route(
            "/tenants/{tenant_id}/journal-entries/{entry_id}",
            get(get_entry).delete(delete_entry),
        )
        .route("/tenants/{tenant_id}/journal-entries/{entry_id}/post", post(post_entry))
        .route("/tenants/{tenant_id}/journal-entries/{entry_id}/void", post(void_entry))
}

/// One line of a create request.
#[derive(Debug, Deserialize)]
pub struct LineRequest {
    /// Account to debit or credit.
    pub account_id: Uuid,
    /// Debit amount (omit or zero on credit lines).
    #[serde(default)]
    pub debit: Decimal,
    /// Credit amount (omit or zero on debit lines).
    #[serde(default)]
    pub credit: Decimal,
    /// Line memo.
    pub description: Option<String>,
}

/// Request body for creating a draft.
#[derive(Debug, Deserialize)]
pub struct CreateEntryRequest {
    /// Accounting date.
    pub entry_date: NaiveDate,
    /// Entry description.
    pub description: String,
    /// External reference.
    pub reference: Option<String>,
    /// At least two lines.
    pub lines: Vec<LineRequest>,
}

impl From<CreateEntryRequest> for DraftInput {
    fn from(req: CreateEntryRequest) -> Self {
        Self {
            entry_date: req.entry_date,
            description: req.description,
            reference: req.reference,
            lines: req
                .lines
                .into_iter()
                .map(|l| LineInput {
                    account_id: AccountId::from_uuid(l.account_id),
                    debit: l.debit,
                    credit: l.credit,
                    description: l.description,
                })
                .collect(),
        }
    }
}

/// Request body for voiding an entry.
#[derive(Debug, Deserialize)]
pub struct VoidEntryRequest {
    /// Why the entry is being voided.
    pub reason: String,
}

/// Query parameters for listing entries.
#[derive(Debug, Deserialize)]
pub struct ListEntriesQuery {
    /// Filter by status.
    pub status: Option<EntryStatus>,
    /// Earliest entry date (inclusive).
    pub from: Option<NaiveDate>,
    /// Latest entry date (inclusive).
    pub to: Option<NaiveDate>,
    /// Page number (1-indexed).
    pub page: Option<u32>,
    /// Items per page.
    pub per_page: Option<u32>,
}

/// Response for a journal line.
#[derive(Debug, Serialize)]
pub struct LineResponse {
    /// Line ID.
    pub id: Uuid,
    /// Display position, starting at 1.
    pub line_number: i32,
    /// Account ID.
    pub account_id: Uuid,
    /// Debit amount.
    pub debit: Decimal,
    /// Credit amount.
    pub credit: Decimal,
    /// Line memo.
    pub description: Option<String>,
}

impl From<journal_entry_lines::Model> for LineResponse {
    fn from(line: journal_entry_lines::Model) -> Self {
        Self {
            id: line.id,
            line_number: line.line_number,
            account_id: line.account_id,
            debit: line.debit,
            credit: line.credit,
            description: line.description,
        }
    }
}

/// Response for a journal entry header.
#[derive(Debug, Serialize)]
pub struct EntrySummaryResponse {
    /// Entry ID.
    pub id: Uuid,
    /// Tenant-wide sequence number, set at posting.
    pub entry_number: Option<i64>,
    /// Accounting date.
    pub entry_date: NaiveDate,
    /// Entry description.
    pub description: String,
    /// External reference.
    pub reference: Option<String>,
    /// Lifecycle status.
    pub status: EntryStatus,
    /// The entry this one reverses.
    pub reversal_of: Option<Uuid>,
    /// Creating principal.
    pub created_by: Uuid,
    /// Creation timestamp.
    pub created_at: DateTime<FixedOffset>,
    /// Posting principal.
    pub posted_by: Option<Uuid>,
    /// Posting timestamp.
    pub posted_at: Option<DateTime<FixedOffset>>,
    /// Voiding principal.
    pub voided_by: Option<Uuid>,
    /// Void timestamp.
    pub voided_at: Option<DateTime<FixedOffset>>,
    /// Void reason.
    pub void_reason: Option<String>,
}

impl From<journal_entries::Model> for EntrySummaryResponse {
    fn from(entry: journal_entries::Model) -> Self {
        Self {
            id: entry.id,
            entry_number: entry.entry_number,
            entry_date: entry.entry_date,
            description: entry.description,
            reference: entry.reference,
            status: entry.status.into(),
            reversal_of: entry.reversal_of,
            created_by: entry.created_by,
            created_at: entry.created_at,
            posted_by: entry.posted_by,
            posted_at: entry.posted_at,
            voided_by: entry.voided_by,
            voided_at: entry.voided_at,
            void_reason: entry.void_reason,
        }
    }
}

/// Response for a journal entry with its lines.
#[derive(Debug, Serialize)]
pub struct EntryResponse {
    /// Header fields.
    #[serde(flatten)]
    pub entry: EntrySummaryResponse,
    /// Lines in display order.
    pub lines: Vec<LineResponse>,
    /// Sum of debits.
    pub total_debit: Decimal,
    /// Sum of credits.
    pub total_credit: Decimal,
}

impl From<EntryWithLines> for EntryResponse {
    fn from(value: EntryWithLines) -> Self {
        let total_debit = value.lines.iter().map(|l| l.debit).sum();
        let total_credit = value.lines.iter().map(|l| l.credit).sum();
        Self {
            entry: value.entry.into(),
            lines: value.lines.into_iter().map(LineResponse::from).collect(),
            total_debit,
            total_credit,
        }
    }
}

/// Response for a void.
#[derive(Debug, Serialize)]
pub struct VoidResponse {
    /// The original entry, now void.
    pub original: EntryResponse,
    /// The posted reversal.
    pub reversal: EntryResponse,
}

impl From<VoidOutcome> for VoidResponse {
    fn from(outcome: VoidOutcome) -> Self {
        Self {
            original: outcome.original.into(),
            reversal: outcome.reversal.into(),
        }
    }
}

/// Paginated entry list.
#[derive(Debug, Serialize)]
pub struct EntryListResponse {
    /// Entry headers.
    pub data: Vec<EntrySummaryResponse>,
    /// Pagination metadata.
    pub meta: PageMeta,
}

fn journal(state: &AppState) -> JournalRepository {
    JournalRepository::new((*state.db).clone(), state.ledger)
}

/// POST `/tenants/{tenant_id}/journal-entries` - Create a draft.
async fn create_entry(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(tenant_id): ApiPath<Uuid>,
    ApiJson(payload): ApiJson<CreateEntryRequest>,
) -> Result<(StatusCode, Json<EntryResponse>), ApiError> {
    let ctx = tenant_context(&state, &auth, tenant_id, Access::Write).await?;
    let entry = journal(&state).create_draft(&ctx, payload.into()).await?;
    Ok((StatusCode::CREATED, Json(entry.into())))
}

/// GET `/tenants/{tenant_id}/journal-entries` - List entries.
async fn list_entries(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(tenant_id): ApiPath<Uuid>,
    ApiQuery(query): ApiQuery<ListEntriesQuery>,
) -> Result<Json<EntryListResponse>, ApiError> {
    let ctx = tenant_context(&state, &auth, tenant_id, Access::Read).await?;
    let filter = EntryFilter {
        status: query.status,
        from: query.from,
        to: query.to,
    };
    let defaults = PageRequest::default();
    let page = PageRequest {
        page: query.page.unwrap_or(defaults.page),
        per_page: query.per_page.unwrap_or(defaults.per_page),
    };

    let result = journal(&state).list(&ctx, filter, page).await?;
    Ok(Json(EntryListResponse {
        data: result.data.into_iter().map(EntrySummaryResponse::from).collect(),
        meta: result.meta,
    }))
}

/// GET `/tenants/{tenant_id}/journal-entries/{entry_id}` - Get an entry with lines.
async fn get_entry(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath((tenant_id, entry_id)): ApiPath<(Uuid, Uuid)>,
) -> Result<Json<EntryResponse>, ApiError> {
    let ctx = tenant_context(&state, &auth, tenant_id, Access::Read).await?;
    let entry = journal(&state).get(&ctx, JournalEntryId::from_uuid(entry_id)).await?;
    Ok(Json(entry.into()))
}

/// POST `/tenants/{tenant_id}/journal-entries/{entry_id}/post` - Post a draft.
async fn post_entry(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath((tenant_id, entry_id)): ApiPath<(Uuid, Uuid)>,
) -> Result<Json<EntryResponse>, ApiError> {
    let ctx = tenant_context(&state, &auth, tenant_id, Access::Write).await?;
    let entry = journal(&state).post(&ctx, JournalEntryId::from_uuid(entry_id)).await?;
    Ok(Json(entry.into()))
}

/// POST `/tenants/{tenant_id}/journal-entries/{entry_id}/void` - Void a posted entry.
async fn void_entry(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath((tenant_id, entry_id)): ApiPath<(Uuid, Uuid)>,
    ApiJson(payload): ApiJson<VoidEntryRequest>,
) -> Result<Json<VoidResponse>, ApiError> {
    let ctx = tenant_context(&state, &auth, tenant_id, Access::Write).await?;
    let outcome = journal(&state)
        .void(&ctx, JournalEntryId::from_uuid(entry_id), &payload.reason)
        .await?;
    Ok(Json(outcome.into()))
}

/// DELETE `/tenants/{tenant_id}/journal-entries/{entry_id}` - Delete a draft.
async fn delete_entry(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath((tenant_id, entry_id)): ApiPath<(Uuid, Uuid)>,
) -> Result<StatusCode, ApiError> {
    let ctx = tenant_context(&state, &auth, tenant_id, Access::Write).await?;
    journal(&state).delete(&ctx, JournalEntryId::from_uuid(entry_id)).await?;
    Ok(StatusCode::NO_CONTENT)
}
