//! Public schema migration.
//!
//! Creates the tenant registry and membership tables. Ledger tables are not
//! created here; they are provisioned per tenant (see `tenant_schema`).

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        db.execute_unprepared(TENANTS_SQL).await?;
        db.execute_unprepared(TENANT_MEMBERS_SQL).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        db.execute_unprepared(DROP_SQL).await?;

        Ok(())
    }
}

const TENANTS_SQL: &str = r"
CREATE TABLE public.tenants (
    id              UUID PRIMARY KEY,
    name            VARCHAR(255) NOT NULL CHECK (length(trim(name)) > 0),
    schema_name     VARCHAR(63) NOT NULL UNIQUE CHECK (schema_name ~ '^[a-z_][a-z0-9_]*$'),
    created_at      TIMESTAMPTZ NOT NULL DEFAULT NOW()
);
";

const TENANT_MEMBERS_SQL: &str = r"
CREATE TABLE public.tenant_members (
    tenant_id       UUID NOT NULL REFERENCES public.tenants(id) ON DELETE CASCADE,
    user_id         UUID NOT NULL,
    role            VARCHAR(16) NOT NULL CHECK (role IN ('owner', 'admin', 'accountant', 'viewer')),
    created_at      TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    PRIMARY KEY (tenant_id, user_id)
);

CREATE INDEX idx_tenant_members_user ON public.tenant_members(user_id);
";

const DROP_SQL: &str = r"
DROP TABLE IF EXISTS public.tenant_members;
DROP TABLE IF EXISTS public.tenants;
";
