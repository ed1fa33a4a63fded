//! Tenancy error types.

use tally_shared::types::{TenantId, UserId};
use thiserror::Error;

/// Errors raised while resolving a tenant context.
#[derive(Debug, Error)]
pub enum TenancyError {
    /// No tenant with this id exists.
    #[error("Tenant not found: {0}")]
    TenantNotFound(TenantId),

    /// The principal is not a member of the tenant, or its role is insufficient.
    #[error("User {principal} is not allowed to access tenant {tenant_id}")]
    Forbidden {
        /// The tenant being accessed.
        tenant_id: TenantId,
        /// The requesting principal.
        principal: UserId,
    },

    /// Tenant name is empty or too long.
    #[error("Tenant name must be between 1 and 255 characters")]
    InvalidTenantName,

    /// A stored schema name is not a safe identifier.
    #[error("Invalid schema name: {0}")]
    InvalidSchemaName(String),
}

impl TenancyError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::TenantNotFound(_) => "TENANT_NOT_FOUND",
            Self::Forbidden { .. } => "FORBIDDEN",
            Self::InvalidTenantName => "INVALID_TENANT_NAME",
            Self::InvalidSchemaName(_) => "INVALID_SCHEMA_NAME",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn http_status_code(&self) -> u16 {
        match self {
            Self::InvalidTenantName => 400,
            Self::Forbidden { .. } => 403,
            Self::TenantNotFound(_) => 404,
            Self::InvalidSchemaName(_) => 500,
        }
    }
}
