//! Shared types and configuration for Tally.
//!
//! This crate provides common types used across all other crates:
//! - Fixed-point money helpers (2 decimal places)
//! - Typed IDs for type-safe entity references
//! - Pagination types for list endpoints
//! - Configuration management
//! - JWT claims and token validation

pub mod auth;
pub mod config;
pub mod jwt;
pub mod types;

pub use auth::Claims;
pub use config::{AppConfig, LedgerConfig, ReversalDating};
pub use jwt::{JwtConfig, JwtError, JwtService};
