//! `SeaORM` Entity for the `public.tenants` table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(schema_name = "public", table_name = "tenants")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    #[sea_orm(unique)]
    pub schema_name: String,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::tenant_members::Entity")]
    TenantMembers,
}

impl Related<super::tenant_members::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TenantMembers.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
