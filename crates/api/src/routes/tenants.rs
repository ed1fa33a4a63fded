//! Tenant provisioning and membership routes.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, put},
};
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use tally_core::tenancy::{Access, Role};
use tally_db::TenantRepository;
use tally_db::entities::{tenant_members, tenants};
use tally_shared::types::UserId;
use tracing::info;
use uuid::Uuid;

use super::tenant_context;
use crate::error::{ApiError, ApiJson, ApiPath};
use crate::{AppState, middleware::AuthUser};

/// Creates the tenant routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/tenants", get(list_tenants).post(create_tenant))
        .route("/tenants/{tenant_id}/members/{user_id}", put(set_member_role))
}

/// Request body for provisioning a tenant.
#[derive(Debug, Deserialize)]
pub struct CreateTenantRequest {
    /// Display name.
    pub name: String,
}

/// Request body for granting a role.
#[derive(Debug, Deserialize)]
pub struct SetMemberRoleRequest {
    /// One of `owner`, `admin`, `accountant`, `viewer`.
    pub role: Role,
}

/// Response for a tenant.
#[derive(Debug, Serialize)]
pub struct TenantResponse {
    /// Tenant ID.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// The caller's role in this tenant.
    pub role: Role,
    /// Creation timestamp.
    pub created_at: DateTime<FixedOffset>,
}

impl TenantResponse {
    fn new(tenant: tenants::Model, role: Role) -> Self {
        Self {
            id: tenant.id,
            name: tenant.name,
            role,
            created_at: tenant.created_at,
        }
    }
}

/// Response for a membership.
#[derive(Debug, Serialize)]
pub struct MemberResponse {
    /// Tenant ID.
    pub tenant_id: Uuid,
    /// Member user ID.
    pub user_id: Uuid,
    /// Granted role.
    pub role: Role,
}

impl From<tenant_members::Model> for MemberResponse {
    fn from(member: tenant_members::Model) -> Self {
        Self {
            tenant_id: member.tenant_id,
            user_id: member.user_id,
            role: member.role.into(),
        }
    }
}

/// POST `/tenants` - Provision a tenant owned by the caller.
async fn create_tenant(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiJson(payload): ApiJson<CreateTenantRequest>,
) -> Result<(StatusCode, Json<TenantResponse>), ApiError> {
    let tenant = TenantRepository::new((*state.db).clone())
        .provision(&payload.name, auth.user_id())
        .await?;

    info!(tenant_id = %tenant.id, user_id = %auth.user_id(), "Tenant created via API");

    Ok((StatusCode::CREATED, Json(TenantResponse::new(tenant, Role::Owner))))
}

/// GET `/tenants` - List the caller's tenants.
async fn list_tenants(State(state): State<AppState>, auth: AuthUser) -> Result<Json<Vec<TenantResponse>>, ApiError> {
    let tenants = TenantRepository::new((*state.db).clone())
        .list_for_user(auth.user_id())
        .await?;

    Ok(Json(
        tenants
            .into_iter()
            .map(|(tenant, role)| TenantResponse::new(tenant, role))
            .collect(),
    ))
}

/// PUT `/tenants/{tenant_id}/members/{user_id}` - Grant or change a role.
async fn set_member_role(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath((tenant_id, user_id)): ApiPath<(Uuid, Uuid)>,
    ApiJson(payload): ApiJson<SetMemberRoleRequest>,
) -> Result<Json<MemberResponse>, ApiError> {
    let ctx = tenant_context(&state, &auth, tenant_id, Access::Administer).await?;

    let member = TenantRepository::new((*state.db).clone())
        .set_member_role(&ctx, UserId::from_uuid(user_id), payload.role)
        .await?;

    Ok(Json(member.into()))
}
