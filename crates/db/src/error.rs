//! Repository error type.
//!
//! Repositories surface domain errors from `tally-core` unchanged and add
//! storage failures on top.

use sea_orm::{DbErr, RuntimeErr};
use tally_core::accounts::AccountError;
use tally_core::journal::LedgerError;
use tally_core::reports::ReportError;
use tally_core::tenancy::TenancyError;
use thiserror::Error;

/// Errors returned by every repository.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Tenant resolution or authorization failed.
    #[error(transparent)]
    Tenancy(#[from] TenancyError),

    /// Chart of accounts rule violated.
    #[error(transparent)]
    Account(#[from] AccountError),

    /// Journal validation or state error.
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// Report error, including ledger consistency violations.
    #[error(transparent)]
    Report(#[from] ReportError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl RepositoryError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Tenancy(e) => e.error_code(),
            Self::Account(e) => e.error_code(),
            Self::Ledger(e) => e.error_code(),
            Self::Report(e) => e.error_code(),
            Self::Database(_) => "DATABASE_ERROR",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn http_status_code(&self) -> u16 {
        match self {
            Self::Tenancy(e) => e.http_status_code(),
            Self::Account(e) => e.http_status_code(),
            Self::Ledger(e) => e.http_status_code(),
            Self::Report(e) => e.http_status_code(),
            Self::Database(e) if is_transient(e) => 503,
            Self::Database(_) => 500,
        }
    }

    /// Returns true if the caller may retry the whole operation.
    ///
    /// Only storage-level contention qualifies; the engine never retries itself.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Database(e) if is_transient(e))
    }

    /// Returns true if this error indicates corrupted ledger state.
    #[must_use]
    pub fn is_consistency_violation(&self) -> bool {
        matches!(self, Self::Report(e) if e.is_consistency_violation())
    }
}

/// SQLSTATE codes worth a client retry: `serialization_failure`,
/// `deadlock_detected`, and `lock_not_available` (raised by `lock_timeout`).
const TRANSIENT_SQLSTATES: [&str; 3] = ["40001", "40P01", "55P03"];

/// Contention reported by Postgres, or pool exhaustion.
fn is_transient(err: &DbErr) -> bool {
    if matches!(err, DbErr::ConnectionAcquire(_)) {
        return true;
    }
    sqlstate(err).is_some_and(|code| is_transient_sqlstate(&code))
}

fn is_transient_sqlstate(code: &str) -> bool {
    TRANSIENT_SQLSTATES.contains(&code)
}

/// Extracts the SQLSTATE from a statement failure, if the driver reported one.
fn sqlstate(err: &DbErr) -> Option<String> {
    let (DbErr::Exec(runtime) | DbErr::Query(runtime)) = err else {
        return None;
    };
    match runtime {
        RuntimeErr::SqlxError(sea_orm::sqlx::Error::Database(db)) => db.code().map(|c| c.into_owned()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use sea_orm::error::ConnAcquireErr;
    use tally_shared::types::{AccountId, JournalEntryId, TenantId};

    #[test]
    fn test_delegates_to_domain_errors() {
        let err = RepositoryError::from(LedgerError::AlreadyPosted(JournalEntryId::new()));
        assert_eq!(err.error_code(), "ALREADY_POSTED");
        assert_eq!(err.http_status_code(), 409);

        let err = RepositoryError::from(AccountError::NotFound(AccountId::new()));
        assert_eq!(err.http_status_code(), 404);

        let err = RepositoryError::from(TenancyError::TenantNotFound(TenantId::new()));
        assert_eq!(err.error_code(), "TENANT_NOT_FOUND");
    }

    #[test]
    fn test_database_errors() {
        let err = RepositoryError::from(DbErr::Custom("boom".to_string()));
        assert_eq!(err.error_code(), "DATABASE_ERROR");
        assert_eq!(err.http_status_code(), 500);
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_message_text_does_not_make_error_transient() {
        let err = RepositoryError::from(DbErr::Custom("deadlock detected".to_string()));
        assert_eq!(err.http_status_code(), 500);
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_pool_timeout_is_transient() {
        let err = RepositoryError::from(DbErr::ConnectionAcquire(ConnAcquireErr::Timeout));
        assert_eq!(err.http_status_code(), 503);
        assert!(err.is_retryable());
    }

    #[rstest]
    #[case("40001", true)]
    #[case("40P01", true)]
    #[case("55P03", true)]
    #[case("23505", false)]
    #[case("57014", false)]
    fn test_transient_sqlstates(#[case] code: &str, #[case] transient: bool) {
        assert_eq!(is_transient_sqlstate(code), transient);
    }

    #[test]
    fn test_consistency_violation() {
        let err = RepositoryError::from(ReportError::TrialBalanceMismatch {
            as_of: chrono::NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
            total_debit: rust_decimal::Decimal::ONE,
            total_credit: rust_decimal::Decimal::ZERO,
        });
        assert!(err.is_consistency_violation());
        assert_eq!(err.http_status_code(), 500);
    }
}
