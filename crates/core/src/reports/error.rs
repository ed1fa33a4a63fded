//! Report error types.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use thiserror::Error;

/// Errors that can occur during report generation.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Invalid date range.
    #[error("Invalid date range: start {start} is after end {end}")]
    InvalidDateRange {
        /// Start date.
        start: NaiveDate,
        /// End date.
        end: NaiveDate,
    },

    /// Posted lines do not balance in aggregate.
    ///
    /// Cannot happen while every posted entry balances; seeing it means a bug
    /// or an out-of-band write.
    #[error("Trial balance as of {as_of} does not balance: debit {total_debit}, credit {total_credit}")]
    TrialBalanceMismatch {
        /// Report date.
        as_of: NaiveDate,
        /// Aggregate debit.
        total_debit: Decimal,
        /// Aggregate credit.
        total_credit: Decimal,
    },
}

impl ReportError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidDateRange { .. } => "INVALID_DATE_RANGE",
            Self::TrialBalanceMismatch { .. } => "LEDGER_INCONSISTENT",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn http_status_code(&self) -> u16 {
        match self {
            Self::InvalidDateRange { .. } => 400,
            Self::TrialBalanceMismatch { .. } => 500,
        }
    }

    /// Returns true if this error indicates corrupted ledger state.
    #[must_use]
    pub fn is_consistency_violation(&self) -> bool {
        matches!(self, Self::TrialBalanceMismatch { .. })
    }
}
