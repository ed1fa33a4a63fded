//! Report routes: trial balance, account balance, account ledger.

use axum::{Json, Router, extract::State, routing::get};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use tally_core::reports::{AccountBalanceReport, LedgerLine, TrialBalanceReport};
use tally_core::tenancy::Access;
use tally_db::LedgerQueryRepository;
use tally_shared::types::{AccountId, PageRequest, PageResponse};
use uuid::Uuid;

use super::tenant_context;
use crate::error::{ApiError, ApiPath, ApiQuery};
use crate::{AppState, middleware::AuthUser};

/// Creates the report routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/tenants/{tenant_id}/reports/trial-balance", get(trial_balance))
        .route(
            "/tenants/{tenant_id}/reports/account-balance/{account_id}",
            get(account_balance),
        )
        .route("/tenants/{tenant_id}/reports/ledger/{account_id}", get(account_ledger))
}

/// Query parameters for as-of reports.
#[derive(Debug, Deserialize)]
pub struct AsOfQuery {
    /// Report date (YYYY-MM-DD). Defaults to today.
    pub as_of_date: Option<NaiveDate>,
}

impl AsOfQuery {
    fn date(&self) -> NaiveDate {
        self.as_of_date.unwrap_or_else(|| Utc::now().date_naive())
    }
}

/// Query parameters for the account ledger.
#[derive(Debug, Deserialize)]
pub struct LedgerQueryParams {
    /// Earliest entry date (inclusive).
    pub from: Option<NaiveDate>,
    /// Latest entry date (inclusive).
    pub to: Option<NaiveDate>,
    /// Page number (1-indexed).
    pub page: Option<u32>,
    /// Lines per page.
    pub per_page: Option<u32>,
}

fn ledger_query(state: &AppState) -> LedgerQueryRepository {
    LedgerQueryRepository::new((*state.db).clone())
}

/// GET `/tenants/{tenant_id}/reports/trial-balance?as_of_date=`
async fn trial_balance(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(tenant_id): ApiPath<Uuid>,
    ApiQuery(query): ApiQuery<AsOfQuery>,
) -> Result<Json<TrialBalanceReport>, ApiError> {
    let ctx = tenant_context(&state, &auth, tenant_id, Access::Read).await?;
    let report = ledger_query(&state).trial_balance(&ctx, query.date()).await?;
    Ok(Json(report))
}

/// GET `/tenants/{tenant_id}/reports/account-balance/{account_id}?as_of_date=`
async fn account_balance(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath((tenant_id, account_id)): ApiPath<(Uuid, Uuid)>,
    ApiQuery(query): ApiQuery<AsOfQuery>,
) -> Result<Json<AccountBalanceReport>, ApiError> {
    let ctx = tenant_context(&state, &auth, tenant_id, Access::Read).await?;
    let report = ledger_query(&state)
        .account_balance(&ctx, AccountId::from_uuid(account_id), query.date())
        .await?;
    Ok(Json(report))
}

/// GET `/tenants/{tenant_id}/reports/ledger/{account_id}?from=&to=&page=&per_page=`
async fn account_ledger(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath((tenant_id, account_id)): ApiPath<(Uuid, Uuid)>,
    ApiQuery(query): ApiQuery<LedgerQueryParams>,
) -> Result<Json<PageResponse<LedgerLine>>, ApiError> {
    let ctx = tenant_context(&state, &auth, tenant_id, Access::Read).await?;
    let defaults = PageRequest::default();
    let page = PageRequest {
        page: query.page.unwrap_or(defaults.page),
        per_page: query.per_page.unwrap_or(defaults.per_page),
    };

    let ledger = ledger_query(&state)
        .ledger(&ctx, AccountId::from_uuid(account_id), query.from, query.to, page)
        .await?;
    Ok(Json(ledger))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_as_of_defaults_to_today() {
        let query = AsOfQuery { as_of_date: None };
        assert_eq!(query.date(), Utc::now().date_naive());

        let fixed = NaiveDate::from_ymd_opt(2026, 1, 31).unwrap();
        assert_eq!(AsOfQuery { as_of_date: Some(fixed) }.date(), fixed);
    }
}
