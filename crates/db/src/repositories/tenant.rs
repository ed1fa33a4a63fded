//! Tenant repository: provisioning and context resolution.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use tally_core::tenancy::{Access, Role, SchemaName, TenancyError, TenantContext};
use tally_shared::types::{TenantId, UserId};
use tracing::{info, warn};

use crate::entities::{sea_orm_active_enums::MemberRole, tenant_members, tenants};
use crate::error::RepositoryError;
use crate::migration::tenant_schema::TENANT_TABLES_SQL;
use crate::tenant::scope_transaction;

/// Maximum tenant name length.
const MAX_TENANT_NAME_LEN: usize = 255;

/// Repository for tenant registry operations.
#[derive(Debug, Clone)]
pub struct TenantRepository {
    db: DatabaseConnection,
}

impl TenantRepository {
    /// Creates a new tenant repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Provisions a tenant: registry row, owner membership, schema, and tables.
    ///
    /// Everything runs in one transaction; a failure leaves no trace.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTenantName` for an empty or overlong name, or a database error.
    pub async fn provision(&self, name: &str, owner: UserId) -> Result<tenants::Model, RepositoryError> {
        let name = name.trim();
        if name.is_empty() || name.chars().count() > MAX_TENANT_NAME_LEN {
            return Err(TenancyError::InvalidTenantName.into());
        }

        let tenant_id = TenantId::new();
        let schema = SchemaName::for_tenant(tenant_id);
        let now = Utc::now().fixed_offset();

        let txn = self.db.begin().await?;

        let tenant = tenants::ActiveModel {
            id: Set(tenant_id.into_inner()),
            name: Set(name.to_string()),
            schema_name: Set(schema.as_str().to_string()),
            created_at: Set(now),
        }
        .insert(&txn)
        .await?;

        tenant_members::ActiveModel {
            tenant_id: Set(tenant_id.into_inner()),
            user_id: Set(owner.into_inner()),
            role: Set(MemberRole::Owner),
            created_at: Set(now),
        }
        .insert(&txn)
        .await?;

        txn.execute_unprepared(&format!("CREATE SCHEMA {}", schema.quoted()))
            .await?;
        scope_transaction(&txn, &schema).await?;
        txn.execute_unprepared(TENANT_TABLES_SQL).await?;

        txn.commit().await?;

        info!(tenant_id = %tenant_id, schema = %schema, owner = %owner, "Tenant provisioned");

        Ok(tenant)
    }

    /// Resolves a tenant for `principal`, checking it grants `access`.
    ///
    /// # Errors
    ///
    /// Returns `TenantNotFound` if the tenant does not exist and `Forbidden`
    /// if the principal is not a member or its role is insufficient.
    pub async fn resolve(
        &self,
        tenant_id: TenantId,
        principal: UserId,
        access: Access,
    ) -> Result<TenantContext, RepositoryError> {
        let tenant = tenants::Entity::find_by_id(tenant_id.into_inner())
            .one(&self.db)
            .await?
            .ok_or(TenancyError::TenantNotFound(tenant_id))?;

        let membership = tenant_members::Entity::find_by_id((tenant_id.into_inner(), principal.into_inner()))
            .one(&self.db)
            .await?
            .map(|m| Role::from(m.role));

        let schema = SchemaName::parse(&tenant.schema_name)?;

        TenantContext::authorize(tenant_id, schema, principal, membership, access).map_err(|e| {
            warn!(tenant_id = %tenant_id, principal = %principal, ?access, "Tenant access denied");
            e.into()
        })
    }

    /// Grants or changes a member's role.
    ///
    /// # Errors
    ///
    /// Returns `Forbidden` unless the context grants `Administer`.
    pub async fn set_member_role(
        &self,
        ctx: &TenantContext,
        user_id: UserId,
        role: Role,
    ) -> Result<tenant_members::Model, RepositoryError> {
        ctx.require(Access::Administer)?;

        let key = (ctx.tenant_id().into_inner(), user_id.into_inner());
        let existing = tenant_members::Entity::find_by_id(key).one(&self.db).await?;

        let member = match existing {
            Some(member) => {
                let mut active: tenant_members::ActiveModel = member.into();
                active.role = Set(role.into());
                active.update(&self.db).await?
            }
            None => {
                tenant_members::ActiveModel {
                    tenant_id: Set(key.0),
                    user_id: Set(key.1),
                    role: Set(role.into()),
                    created_at: Set(Utc::now().fixed_offset()),
                }
                .insert(&self.db)
                .await?
            }
        };

        info!(tenant_id = %ctx.tenant_id(), user_id = %user_id, role = role.as_str(), "Tenant member role set");

        Ok(member)
    }

    /// Lists the tenants a user belongs to, with the user's role in each.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_for_user(&self, user_id: UserId) -> Result<Vec<(tenants::Model, Role)>, RepositoryError> {
        let rows = tenant_members::Entity::find()
            .filter(tenant_members::Column::UserId.eq(user_id.into_inner()))
            .find_also_related(tenants::Entity)
            .order_by_asc(tenant_members::Column::CreatedAt)
            .all(&self.db)
            .await?;

        Ok(rows
            .into_iter()
            .filter_map(|(member, tenant)| tenant.map(|t| (t, Role::from(member.role))))
            .collect())
    }
}
