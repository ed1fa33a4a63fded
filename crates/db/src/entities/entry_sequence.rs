//! `SeaORM` Entity for the per-tenant `entry_sequence` counter.
//!
//! The table holds exactly one row (`id = 1`).

use sea_orm::entity::prelude::*;

/// Primary key of the single counter row.
pub const SEQUENCE_ROW_ID: i16 = 1;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "entry_sequence")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: i16,
    pub next_number: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
