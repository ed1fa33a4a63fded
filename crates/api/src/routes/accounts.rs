//! Chart of accounts routes.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, patch, post},
};
use serde::{Deserialize, Serialize};
use tally_core::accounts::{AccountType, NormalSide};
use tally_core::tenancy::Access;
use tally_db::entities::accounts;
use tally_db::repositories::{AccountFilter, AccountRepository, CreateAccountInput};
use tally_shared::types::AccountId;
use uuid::Uuid;

use super::tenant_context;
use crate::error::{ApiError, ApiJson, ApiPath, ApiQuery};
use crate::{AppState, middleware::AuthUser};

/// Creates the account routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/tenants/{tenant_id}/accounts", get(list_accounts).post(create_account))
        .route("/tenants/{tenant_id}/accounts/{account_id}", get(get_account))
        .route("/tenants/{tenant_id}/accounts/{account_id}/deactivate", post(deactivate_account))
        .route("/tenants/{tenant_id}/accounts/{account_id}/type", patch(change_account_type))
        .route("/tenants/{tenant_id}/accounts/{account_id}/parent", patch(set_account_parent))
}

/// Query parameters for listing accounts.
#[derive(Debug, Deserialize)]
pub struct ListAccountsQuery {
    /// Filter by account type.
    #[serde(rename = "type")]
    pub account_type: Option<AccountType>,
    /// Filter by active status.
    pub active: Option<bool>,
}

/// Request body for creating an account.
#[derive(Debug, Deserialize)]
pub struct CreateAccountRequest {
    /// Account code (unique within the tenant).
    pub code: String,
    /// Account name.
    pub name: String,
    /// Account type: asset, liability, equity, revenue, expense.
    #[serde(rename = "type")]
    pub account_type: AccountType,
    /// Parent account ID.
    pub parent_id: Option<Uuid>,
    /// Locks the account against deactivation and retyping.
    #[serde(default)]
    pub is_system: bool,
}

/// Request body for changing an account's type.
#[derive(Debug, Deserialize)]
pub struct ChangeTypeRequest {
    /// New account type.
    #[serde(rename = "type")]
    pub account_type: AccountType,
}

/// Request body for moving an account in the hierarchy.
#[derive(Debug, Deserialize)]
pub struct SetParentRequest {
    /// New parent, or `null` for a top-level account.
    pub parent_id: Option<Uuid>,
}

/// Response for an account.
#[derive(Debug, Serialize)]
pub struct AccountResponse {
    /// Account ID.
    pub id: Uuid,
    /// Account code.
    pub code: String,
    /// Account name.
    pub name: String,
    /// Account type.
    #[serde(rename = "type")]
    pub account_type: AccountType,
    /// Side on which the account normally carries a balance.
    pub normal_side: NormalSide,
    /// Parent account ID.
    pub parent_id: Option<Uuid>,
    /// Whether the account accepts new lines.
    pub is_active: bool,
    /// Whether the account is locked.
    pub is_system: bool,
}

impl From<accounts::Model> for AccountResponse {
    fn from(account: accounts::Model) -> Self {
        let account_type = AccountType::from(account.account_type);
        Self {
            id: account.id,
            code: account.code,
            name: account.name,
            account_type,
            normal_side: account_type.normal_side(),
            parent_id: account.parent_id,
            is_active: account.is_active,
            is_system: account.is_system,
        }
    }
}

/// GET `/tenants/{tenant_id}/accounts` - List accounts ordered by code.
async fn list_accounts(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(tenant_id): ApiPath<Uuid>,
    ApiQuery(query): ApiQuery<ListAccountsQuery>,
) -> Result<Json<Vec<AccountResponse>>, ApiError> {
    let ctx = tenant_context(&state, &auth, tenant_id, Access::Read).await?;
    let filter = AccountFilter {
        account_type: query.account_type,
        is_active: query.active,
    };

    let chart = AccountRepository::new((*state.db).clone()).list(&ctx, filter).await?;
    Ok(Json(chart.into_iter().map(AccountResponse::from).collect()))
}

/// POST `/tenants/{tenant_id}/accounts` - Create an account.
async fn create_account(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(tenant_id): ApiPath<Uuid>,
    ApiJson(payload): ApiJson<CreateAccountRequest>,
) -> Result<(StatusCode, Json<AccountResponse>), ApiError> {
    let ctx = tenant_context(&state, &auth, tenant_id, Access::Administer).await?;
    let input = CreateAccountInput {
        code: payload.code,
        name: payload.name,
        account_type: payload.account_type,
        parent_id: payload.parent_id.map(AccountId::from_uuid),
        is_system: payload.is_system,
    };

    let account = AccountRepository::new((*state.db).clone()).create(&ctx, input).await?;
    Ok((StatusCode::CREATED, Json(account.into())))
}

/// GET `/tenants/{tenant_id}/accounts/{account_id}` - Get an account.
async fn get_account(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath((tenant_id, account_id)): ApiPath<(Uuid, Uuid)>,
) -> Result<Json<AccountResponse>, ApiError> {
    let ctx = tenant_context(&state, &auth, tenant_id, Access::Read).await?;
    let account = AccountRepository::new((*state.db).clone())
        .get(&ctx, AccountId::from_uuid(account_id))
        .await?;
    Ok(Json(account.into()))
}

/// POST `/tenants/{tenant_id}/accounts/{account_id}/deactivate` - Soft-deactivate.
async fn deactivate_account(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath((tenant_id, account_id)): ApiPath<(Uuid, Uuid)>,
) -> Result<Json<AccountResponse>, ApiError> {
    let ctx = tenant_context(&state, &auth, tenant_id, Access::Administer).await?;
    let account = AccountRepository::new((*state.db).clone())
        .deactivate(&ctx, AccountId::from_uuid(account_id))
        .await?;
    Ok(Json(account.into()))
}

/// PATCH `/tenants/{tenant_id}/accounts/{account_id}/type` - Change the type.
async fn change_account_type(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath((tenant_id, account_id)): ApiPath<(Uuid, Uuid)>,
    ApiJson(payload): ApiJson<ChangeTypeRequest>,
) -> Result<Json<AccountResponse>, ApiError> {
    let ctx = tenant_context(&state, &auth, tenant_id, Access::Administer).await?;
    let account = AccountRepository::new((*state.db).clone())
        .change_type(&ctx, AccountId::from_uuid(account_id), payload.account_type)
        .await?;
    Ok(Json(account.into()))
}

/// PATCH `/tenants/{tenant_id}/accounts/{account_id}/parent` - Move in the hierarchy.
async fn set_account_parent(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath((tenant_id, account_id)): ApiPath<(Uuid, Uuid)>,
    ApiJson(payload): ApiJson<SetParentRequest>,
) -> Result<Json<AccountResponse>, ApiError> {
    let ctx = tenant_context(&state, &auth, tenant_id, Access::Administer).await?;
    let account = AccountRepository::new((*state.db).clone())
        .set_parent(
            &ctx,
            AccountId::from_uuid(account_id),
            payload.parent_id.map(AccountId::from_uuid),
        )
        .await?;
    Ok(Json(account.into()))
}
