//! Tenant-scoped connection management.
//!
//! Each tenant's tables live in their own `PostgreSQL` schema. A
//! [`TenantConnection`] opens a transaction and points `search_path` at that
//! schema with `SET LOCAL`, so unqualified table names resolve only inside the
//! tenant's namespace and the setting ends with the transaction.
//!
//! # Usage
//!
//! ```ignore
//! use tally_db::tenant::TenantConnection;
//!
//! let conn = TenantConnection::begin(&db, &ctx).await?;
//! let accounts = Accounts::find().all(conn.transaction()).await?;
//! conn.commit().await?;
//! ```

use sea_orm::{ConnectionTrait, DatabaseConnection, DatabaseTransaction, DbErr, TransactionTrait};
use tally_core::tenancy::{SchemaName, TenantContext};

/// Row locks wait at most this long before the statement fails.
pub const LOCK_TIMEOUT: &str = "5s";

/// A transaction scoped to one tenant's schema.
///
/// Dropping it without calling [`commit`](Self::commit) rolls back.
pub struct TenantConnection {
    txn: DatabaseTransaction,
}

impl TenantConnection {
    /// Begins a transaction scoped to the context's schema.
    ///
    /// # Errors
    ///
    /// Returns an error if the transaction cannot be started or scoped.
    pub async fn begin(db: &DatabaseConnection, ctx: &TenantContext) -> Result<Self, DbErr> {
        let txn = db.begin().await?;
        scope_transaction(&txn, ctx.schema()).await?;
        Ok(Self { txn })
    }

    /// Returns a reference to the underlying transaction for executing queries.
    #[must_use]
    pub fn transaction(&self) -> &DatabaseTransaction {
        &self.txn
    }

    /// Commits the transaction, persisting all changes.
    ///
    /// # Errors
    ///
    /// Returns an error if the commit fails.
    pub async fn commit(self) -> Result<(), DbErr> {
        self.txn.commit().await
    }

    /// Rolls back the transaction, discarding all changes.
    ///
    /// # Errors
    ///
    /// Returns an error if the rollback fails.
    pub async fn rollback(self) -> Result<(), DbErr> {
        self.txn.rollback().await
    }
}

/// Builds the statement that scopes a transaction to `schema`.
#[must_use]
pub fn search_path_sql(schema: &SchemaName) -> String {
    format!("SET LOCAL search_path TO {}", schema.quoted())
}

/// Scopes an existing transaction to `schema` and bounds lock waits.
///
/// # Errors
///
/// Returns an error if the settings cannot be applied.
pub async fn scope_transaction(txn: &DatabaseTransaction, schema: &SchemaName) -> Result<(), DbErr> {
    txn.execute_unprepared(&search_path_sql(schema)).await?;
    txn.execute_unprepared(&format!("SET LOCAL lock_timeout = '{LOCK_TIMEOUT}'"))
        .await?;
    Ok(())
}
