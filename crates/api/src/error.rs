//! API error type and request extractors with JSON rejections.
//!
//! Every handler returns `Result<_, ApiError>`. Domain errors keep their own
//! code and status; storage failures are logged and reported generically.

use axum::{
    Json,
    extract::{
        FromRequest, FromRequestParts,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::{HeaderValue, StatusCode, header::RETRY_AFTER},
    response::{IntoResponse, Response},
};
use serde_json::{Value, json};
use tally_core::accounts::AccountError;
use tally_core::journal::LedgerError;
use tally_core::reports::ReportError;
use tally_core::tenancy::TenancyError;
use tally_db::RepositoryError;
use tally_shared::types::money::format_money;
use tracing::{error, warn};

/// Error returned by every handler.
#[derive(Debug)]
pub enum ApiError {
    /// A repository or domain failure.
    Repository(RepositoryError),
    /// Malformed request (body, query, or path).
    BadRequest {
        /// Stable error code.
        code: &'static str,
        /// Human-readable detail.
        message: String,
    },
    /// Missing or invalid credentials.
    Unauthorized {
        /// Stable error code.
        code: &'static str,
        /// Human-readable detail.
        message: &'static str,
    },
}

impl ApiError {
    /// Builds a 400 error.
    pub fn bad_request(code: &'static str, message: impl Into<String>) -> Self {
        Self::BadRequest {
            code,
            message: message.into(),
        }
    }

    /// Builds a 401 error.
    #[must_use]
    pub const fn unauthorized(code: &'static str, message: &'static str) -> Self {
        Self::Unauthorized { code, message }
    }

    /// Returns the HTTP status for this error.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Repository(e) => {
                StatusCode::from_u16(e.http_status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
            }
            Self::BadRequest { .. } => StatusCode::BAD_REQUEST,
            Self::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
        }
    }
}

impl From<RepositoryError> for ApiError {
    fn from(e: RepositoryError) -> Self {
        Self::Repository(e)
    }
}

impl From<TenancyError> for ApiError {
    fn from(e: TenancyError) -> Self {
        Self::Repository(e.into())
    }
}

impl From<AccountError> for ApiError {
    fn from(e: AccountError) -> Self {
        Self::Repository(e.into())
    }
}

impl From<LedgerError> for ApiError {
    fn from(e: LedgerError) -> Self {
        Self::Repository(e.into())
    }
}

impl From<ReportError> for ApiError {
    fn from(e: ReportError) -> Self {
        Self::Repository(e.into())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::bad_request("INVALID_BODY", rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::bad_request("INVALID_QUERY", rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self::bad_request("INVALID_PATH", rejection.body_text())
    }
}

/// Extra fields the caller needs to fix its input.
fn details(e: &RepositoryError) -> Option<Value> {
    match e {
        RepositoryError::Ledger(LedgerError::Unbalanced { diff, debit, credit }) => Some(json!({
            "diff": format_money(*diff),
            "total_debit": format_money(*debit),
            "total_credit": format_money(*credit),
        })),
        _ => None,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match self {
            Self::Repository(e) if status.is_server_error() => {
                if e.is_consistency_violation() {
                    error!(alert = "ledger_consistency", error = %e, "Ledger consistency violation");
                } else {
                    error!(error = %e, code = e.error_code(), "Request failed");
                }

                let message = if e.is_retryable() {
                    "Temporary storage failure, the request can be retried"
                } else {
                    "An internal error occurred"
                };
                let mut response =
                    (status, Json(json!({ "error": e.error_code(), "message": message }))).into_response();
                if e.is_retryable() {
                    response
                        .headers_mut()
                        .insert(RETRY_AFTER, HeaderValue::from_static("1"));
                }
                response
            }
            Self::Repository(e) => {
                if status == StatusCode::FORBIDDEN {
                    warn!(error = %e, "Forbidden");
                }
                let mut body = json!({ "error": e.error_code(), "message": e.to_string() });
                if let Some(details) = details(&e) {
                    body["details"] = details;
                }
                (status, Json(body)).into_response()
            }
            Self::BadRequest { code, message } => {
                (status, Json(json!({ "error": code, "message": message }))).into_response()
            }
            Self::Unauthorized { code, message } => {
                (status, Json(json!({ "error": code, "message": message }))).into_response()
            }
        }
    }
}

/// JSON body extractor that rejects with [`ApiError`].
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

/// Query string extractor that rejects with [`ApiError`].
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ApiError))]
pub struct ApiQuery<T>(pub T);

/// Path extractor that rejects with [`ApiError`].
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub struct ApiPath<T>(pub T);
