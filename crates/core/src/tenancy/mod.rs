//! Tenant resolution and authorization.
//!
//! Every ledger operation takes a [`TenantContext`]. A context can only be
//! obtained through [`TenantContext::authorize`], so holding one proves the
//! tenant exists, its storage namespace is known, and the principal is a
//! member with sufficient access.

pub mod context;
pub mod error;
pub mod schema;

pub use context::{Access, Role, TenantContext};
pub use error::TenancyError;
pub use schema::SchemaName;
