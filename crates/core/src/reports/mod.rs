//! Ledger read-side calculations.
//!
//! This module provides pure business logic for:
//! - Account balance as of a date
//! - Trial balance, including its debit = credit consistency check
//! - Account ledger lines with running balances

pub mod error;
pub mod service;
pub mod types;

#[cfg(test)]
mod service_props;

pub use error::ReportError;
pub use service::ReportService;
pub use types::*;
