//! Core ledger logic for Tally.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All domain types, validation rules, and calculations live here.
//!
//! # Modules
//!
//! - `tenancy` - Tenant context, roles, and storage namespace names
//! - `accounts` - Chart of accounts rules
//! - `journal` - Double-entry journal state machine and validation
//! - `reports` - Balances, trial balance, and account ledger

pub mod accounts;
pub mod journal;
pub mod reports;
pub mod tenancy;
