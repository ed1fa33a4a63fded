//! Account repository for chart of accounts database operations.

use std::collections::HashMap;

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, SqlErr,
};
use tally_core::accounts::{
    AccountError, AccountType, ParentCandidate, normalize_code, validate_name, validate_parent,
};
use tally_core::tenancy::{Access, TenantContext};
use tally_shared::types::AccountId;
use tracing::info;

use crate::entities::sea_orm_active_enums::AccountType as StoredAccountType;
use crate::entities::{accounts, journal_entry_lines};
use crate::error::RepositoryError;
use crate::tenant::TenantConnection;

/// Input for creating an account.
#[derive(Debug, Clone)]
pub struct CreateAccountInput {
    /// Account code (must be unique within the tenant).
    pub code: String,
    /// Account name.
    pub name: String,
    /// Account type.
    pub account_type: AccountType,
    /// Optional parent account.
    pub parent_id: Option<AccountId>,
    /// Whether the account is locked against deactivation and retyping.
    pub is_system: bool,
}

/// Filter options for listing accounts.
#[derive(Debug, Clone, Default)]
pub struct AccountFilter {
    /// Filter by account type.
    pub account_type: Option<AccountType>,
    /// Filter by active status.
    pub is_active: Option<bool>,
}

/// Repository for the chart of accounts.
#[derive(Debug, Clone)]
pub struct AccountRepository {
    db: DatabaseConnection,
}

impl AccountRepository {
    /// Creates a new account repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a new account.
    ///
    /// # Errors
    ///
    /// Returns `InvalidCode`/`InvalidName` for bad fields, `DuplicateCode` if
    /// the code is taken, and `InvalidParent` if the parent is missing,
    /// inactive, or would create a cycle.
    pub async fn create(
        &self,
        ctx: &TenantContext,
        input: CreateAccountInput,
    ) -> Result<accounts::Model, RepositoryError> {
        ctx.require(Access::Administer)?;
        let code = normalize_code(&input.code)?;
        let name = validate_name(&input.name)?;
        let id = AccountId::new();

        let conn = TenantConnection::begin(&self.db, ctx).await?;
        let txn = conn.transaction();

        let taken = accounts::Entity::find()
            .filter(accounts::Column::Code.eq(code.as_str()))
            .count(txn)
            .await?;
        if taken > 0 {
            return Err(AccountError::DuplicateCode(code).into());
        }

        if let Some(parent_id) = input.parent_id {
            let parent = accounts::Entity::find_by_id(parent_id.into_inner())
                .lock_shared()
                .one(txn)
                .await?;
            let candidate = ParentCandidate {
                id: parent_id,
                exists: parent.is_some(),
                is_active: parent.is_some_and(|p| p.is_active),
            };
            // A brand-new account has no descendants.
            validate_parent(id, candidate, &HashMap::new())?;
        }

        let now = Utc::now().fixed_offset();
        let account = accounts::ActiveModel {
            id: Set(id.into_inner()),
            code: Set(code.clone()),
            name: Set(name),
            account_type: Set(input.account_type.into()),
            parent_id: Set(input.parent_id.map(AccountId::into_inner)),
            is_active: Set(true),
            is_system: Set(input.is_system),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(txn)
        .await
        .map_err(|e| duplicate_code_or(e, &code))?;

        conn.commit().await?;

        info!(tenant_id = %ctx.tenant_id(), account_id = %id, code = %account.code, "Account created");

        Ok(account)
    }

    /// Moves an account under a new parent, or to the top level.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the account does not exist and `InvalidParent`
    /// if the parent is missing, inactive, or a descendant of the account.
    pub async fn set_parent(
        &self,
        ctx: &TenantContext,
        account_id: AccountId,
        parent_id: Option<AccountId>,
    ) -> Result<accounts::Model, RepositoryError> {
        ctx.require(Access::Administer)?;
        let conn = TenantConnection::begin(&self.db, ctx).await?;
        let txn = conn.transaction();

        // Lock the whole chart: concurrent re-parenting could otherwise
        // combine two individually valid moves into a cycle.
        let chart = accounts::Entity::find().lock_exclusive().all(txn).await?;
        let account = chart
            .iter()
            .find(|a| a.id == account_id.into_inner())
            .cloned()
            .ok_or(AccountError::NotFound(account_id))?;

        if let Some(parent_id) = parent_id {
            let parent = chart.iter().find(|a| a.id == parent_id.into_inner());
            let candidate = ParentCandidate {
                id: parent_id,
                exists: parent.is_some(),
                is_active: parent.is_some_and(|p| p.is_active),
            };
            let parents: HashMap<AccountId, Option<AccountId>> = chart
                .iter()
                .map(|a| (AccountId::from_uuid(a.id), a.parent_id.map(AccountId::from_uuid)))
                .collect();
            validate_parent(account_id, candidate, &parents)?;
        }

        let mut active: accounts::ActiveModel = account.into();
        active.parent_id = Set(parent_id.map(AccountId::into_inner));
        active.updated_at = Set(Utc::now().fixed_offset());
        let updated = active.update(txn).await?;

        conn.commit().await?;

        info!(tenant_id = %ctx.tenant_id(), account_id = %account_id, parent_id = ?parent_id, "Account moved");

        Ok(updated)
    }

    /// Deactivates an account. Historical lines keep their effect.
    ///
    /// Deactivating an inactive account is a no-op.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` or `SystemAccountLocked`.
    pub async fn deactivate(
        &self,
        ctx: &TenantContext,
        account_id: AccountId,
    ) -> Result<accounts::Model, RepositoryError> {
        ctx.require(Access::Administer)?;
        let conn = TenantConnection::begin(&self.db, ctx).await?;
        let txn = conn.transaction();

        let account = accounts::Entity::find_by_id(account_id.into_inner())
            .lock_exclusive()
            .one(txn)
            .await?
            .ok_or(AccountError::NotFound(account_id))?;

        if account.is_system {
            return Err(AccountError::SystemAccountLocked(account_id).into());
        }
        if !account.is_active {
            return Ok(account);
        }

        let mut active: accounts::ActiveModel = account.into();
        active.is_active = Set(false);
        active.updated_at = Set(Utc::now().fixed_offset());
        let updated = active.update(txn).await?;

        conn.commit().await?;

        info!(tenant_id = %ctx.tenant_id(), account_id = %account_id, "Account deactivated");

        Ok(updated)
    }

    /// Changes an account's type while no journal line references it.
    ///
    /// Setting the current type again is a no-op.
    ///
    /// # Errors
    ///
    /// Returns `NotFound`, `SystemAccountLocked`, or `AccountHasPostings`.
    pub async fn change_type(
        &self,
        ctx: &TenantContext,
        account_id: AccountId,
        new_type: AccountType,
    ) -> Result<accounts::Model, RepositoryError> {
        ctx.require(Access::Administer)?;
        let conn = TenantConnection::begin(&self.db, ctx).await?;
        let txn = conn.transaction();

        // FOR UPDATE conflicts with the FOR SHARE taken by draft creation,
        // so no line can appear between the check and the update.
        let account = accounts::Entity::find_by_id(account_id.into_inner())
            .lock_exclusive()
            .one(txn)
            .await?
            .ok_or(AccountError::NotFound(account_id))?;

        if AccountType::from(account.account_type) == new_type {
            return Ok(account);
        }
        if account.is_system {
            return Err(AccountError::SystemAccountLocked(account_id).into());
        }

        let references = journal_entry_lines::Entity::find()
            .filter(journal_entry_lines::Column::AccountId.eq(account_id.into_inner()))
            .count(txn)
            .await?;
        if references > 0 {
            return Err(AccountError::AccountHasPostings(account_id).into());
        }

        let mut active: accounts::ActiveModel = account.into();
        active.account_type = Set(new_type.into());
        active.updated_at = Set(Utc::now().fixed_offset());
        let updated = active.update(txn).await?;

        conn.commit().await?;

        info!(tenant_id = %ctx.tenant_id(), account_id = %account_id, new_type = %new_type, "Account type changed");

        Ok(updated)
    }

    /// Resolves an account for use on a new journal line.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` or `Inactive`.
    pub async fn resolve(&self, ctx: &TenantContext, account_id: AccountId) -> Result<accounts::Model, RepositoryError> {
        let account = self.get(ctx, account_id).await?;
        if !account.is_active {
            return Err(AccountError::Inactive(account_id).into());
        }
        Ok(account)
    }

    /// Gets an account, active or not.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the account does not exist in this tenant.
    pub async fn get(&self, ctx: &TenantContext, account_id: AccountId) -> Result<accounts::Model, RepositoryError> {
        ctx.require(Access::Read)?;
        let conn = TenantConnection::begin(&self.db, ctx).await?;

        let account = accounts::Entity::find_by_id(account_id.into_inner())
            .one(conn.transaction())
            .await?
            .ok_or(AccountError::NotFound(account_id))?;

        conn.commit().await?;
        Ok(account)
    }

    /// Lists accounts ordered by code.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(&self, ctx: &TenantContext, filter: AccountFilter) -> Result<Vec<accounts::Model>, RepositoryError> {
        ctx.require(Access::Read)?;
        let conn = TenantConnection::begin(&self.db, ctx).await?;

        let mut query = accounts::Entity::find();
        if let Some(account_type) = filter.account_type {
            query = query.filter(accounts::Column::AccountType.eq(StoredAccountType::from(account_type)));
        }
        if let Some(is_active) = filter.is_active {
            query = query.filter(accounts::Column::IsActive.eq(is_active));
        }

        let chart = query
            .order_by_asc(accounts::Column::Code)
            .all(conn.transaction())
            .await?;

        conn.commit().await?;
        Ok(chart)
    }
}

/// Maps a unique violation on insert to `DuplicateCode`.
fn duplicate_code_or(err: DbErr, code: &str) -> RepositoryError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => AccountError::DuplicateCode(code.to_string()).into(),
        _ => err.into(),
    }
}
