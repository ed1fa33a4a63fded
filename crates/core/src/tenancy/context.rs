//! Resolved tenant context.

use serde::{Deserialize, Serialize};
use tally_shared::types::{TenantId, UserId};

use super::error::TenancyError;
use super::schema::SchemaName;

/// Role of a principal within one tenant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Created the tenant; full control.
    Owner,
    /// Manages the chart of accounts.
    Admin,
    /// Records and posts journal entries.
    Accountant,
    /// Read-only access to reports and entries.
    Viewer,
}

impl Role {
    /// Returns the highest access level this role grants.
    #[must_use]
    pub const fn max_access(self) -> Access {
        match self {
            Self::Owner | Self::Admin => Access::Administer,
            Self::Accountant => Access::Write,
            Self::Viewer => Access::Read,
        }
    }

    /// Returns true if this role grants `access`.
    #[must_use]
    pub fn allows(self, access: Access) -> bool {
        self.max_access() >= access
    }

    /// Returns the role name as stored in the database.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Owner => "owner",
            Self::Admin => "admin",
            Self::Accountant => "accountant",
            Self::Viewer => "viewer",
        }
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "owner" => Ok(Self::Owner),
            "admin" => Ok(Self::Admin),
            "accountant" => Ok(Self::Accountant),
            "viewer" => Ok(Self::Viewer),
            other => Err(format!("unknown role: {other}")),
        }
    }
}

/// Access level an operation requires.
///
/// Ordered: `Read < Write < Administer`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Access {
    /// Balances, reports, listings.
    Read,
    /// Journal entry drafting, posting, voiding.
    Write,
    /// Chart of accounts changes.
    Administer,
}

/// An authorized, resolved tenant context.
///
/// Fields are private; the only constructor is [`TenantContext::authorize`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TenantContext {
    tenant_id: TenantId,
    schema: SchemaName,
    principal: UserId,
    role: Role,
}

impl TenantContext {
    /// Builds a context once the tenant and the principal's membership are known.
    ///
    /// # Errors
    ///
    /// Returns `TenancyError::Forbidden` if `membership` is `None` or the role
    /// does not grant `access`.
    pub fn authorize(
        tenant_id: TenantId,
        schema: SchemaName,
        principal: UserId,
        membership: Option<Role>,
        access: Access,
    ) -> Result<Self, TenancyError> {
        match membership {
            Some(role) if role.allows(access) => Ok(Self {
                tenant_id,
                schema,
                principal,
                role,
            }),
            _ => Err(TenancyError::Forbidden {
                tenant_id,
                principal,
            }),
        }
    }

    /// Checks that this context grants `access`.
    ///
    /// # Errors
    ///
    /// Returns `TenancyError::Forbidden` if the role is insufficient.
    pub fn require(&self, access: Access) -> Result<(), TenancyError> {
        if self.role.allows(access) {
            Ok(())
        } else {
            Err(TenancyError::Forbidden {
                tenant_id: self.tenant_id,
                principal: self.principal,
            })
        }
    }

    /// The tenant this context is bound to.
    #[must_use]
    pub const fn tenant_id(&self) -> TenantId {
        self.tenant_id
    }

    /// The tenant's storage namespace.
    #[must_use]
    pub const fn schema(&self) -> &SchemaName {
        &self.schema
    }

    /// The authenticated principal.
    #[must_use]
    pub const fn principal(&self) -> UserId {
        self.principal
    }

    /// The principal's role within the tenant.
    #[must_use]
    pub const fn role(&self) -> Role {
        self.role
    }
}
