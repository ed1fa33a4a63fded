//! `SeaORM` entity definitions.
//!
//! `tenants` and `tenant_members` live in the `public` schema. All other
//! tables exist once per tenant schema and are addressed unqualified, so they
//! must only be queried through a `TenantConnection`.

pub mod prelude;

pub mod accounts;
pub mod entry_sequence;
pub mod journal_entries;
pub mod journal_entry_lines;
pub mod sea_orm_active_enums;
pub mod tenant_members;
pub mod tenants;
