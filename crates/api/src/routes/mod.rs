//! API route definitions.

use axum::{Router, middleware};
use tally_core::tenancy::{Access, TenantContext};
use tally_db::TenantRepository;
use tally_shared::types::TenantId;
use uuid::Uuid;

use crate::{AppState, error::ApiError, middleware::AuthUser, middleware::auth_middleware};

pub mod accounts;
pub mod health;
pub mod journal_entries;
pub mod reports;
pub mod tenants;

/// Creates the API router with public and protected routes.
#[allow(clippy::needless_pass_by_value)]
pub fn api_routes_with_state(state: AppState) -> Router<AppState> {
    let protected_routes = Router::new()
        .merge(tenants::routes())
        .merge(accounts::routes())
        .merge(journal_entries::routes())
        .merge(reports::routes())
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new().merge(health::routes()).merge(protected_routes)
}

/// Resolves the tenant for the authenticated principal.
async fn tenant_context(
    state: &AppState,
    auth: &AuthUser,
    tenant_id: Uuid,
    access: Access,
) -> Result<TenantContext, ApiError> {
    let ctx = TenantRepository::new((*state.db).clone())
        .resolve(TenantId::from_uuid(tenant_id), auth.user_id(), access)
        .await?;
    Ok(ctx)
}
