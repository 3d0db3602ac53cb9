//! Application error type and its HTTP representation.
//!
//! Every fallible library operation returns [`AppError`]. Handlers return it
//! directly and rely on the [`IntoResponse`] impl to produce the JSON error
//! body:
//!
//! ```json
//! { "error": { "code": "validation_error", "message": "URL is required", "details": {} } }
//! ```
//!
//! Server-side failures (5xx) never expose their `details` unless
//! development mode was switched on with [`set_expose_details`].

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Value, json};
use std::sync::atomic::{AtomicBool, Ordering};

static EXPOSE_DETAILS: AtomicBool = AtomicBool::new(false);

/// Enables or disables diagnostic details in 5xx response bodies.
///
/// Called once at startup from the configured `APP_ENV`.
pub fn set_expose_details(enabled: bool) {
    EXPOSE_DETAILS.store(enabled, Ordering::Relaxed);
}

fn expose_details() -> bool {
    EXPOSE_DETAILS.load(Ordering::Relaxed)
}

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorInfo,
}

/// Machine-readable error payload.
#[derive(Debug, Serialize)]
pub struct ErrorInfo {
    pub code: &'static str,
    pub message: String,
    pub details: Value,
}

/// Failure categories of the backing store.
///
/// Each kind carries a fixed operator-facing message and a remediation hint,
/// surfaced by the health check and by 503 responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreErrorKind {
    NotConfigured,
    ConnectionRefused,
    HostNotFound,
    AuthenticationFailed,
    DatabaseMissing,
    SchemaMissing,
    Unavailable,
}

impl StoreErrorKind {
    pub fn message(self) -> &'static str {
        match self {
            Self::NotConfigured => "DATABASE_URL is not configured",
            Self::ConnectionRefused => "Cannot connect to database server",
            Self::HostNotFound => "Database host not found",
            Self::AuthenticationFailed => "Database authentication failed",
            Self::DatabaseMissing => "Database does not exist",
            Self::SchemaMissing => "Database table not found",
            Self::Unavailable => "Database connection failed",
        }
    }

    pub fn hint(self) -> &'static str {
        match self {
            Self::NotConfigured => {
                "Set DATABASE_URL (or DB_HOST, DB_USER, DB_PASSWORD and DB_NAME) in the environment or .env file."
            }
            Self::ConnectionRefused => {
                "The database server is not reachable. Check the host and port in DATABASE_URL."
            }
            Self::HostNotFound => "The database host in DATABASE_URL could not be resolved.",
            Self::AuthenticationFailed => "Invalid username or password in DATABASE_URL.",
            Self::DatabaseMissing => "The database name in DATABASE_URL does not exist.",
            Self::SchemaMissing => {
                "The links table could not be created. Check that the database user may create tables."
            }
            Self::Unavailable => "Check that the database is running and DATABASE_URL is correct.",
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Self::NotConfigured => "store_not_configured",
            Self::ConnectionRefused => "store_connection_refused",
            Self::HostNotFound => "store_host_not_found",
            Self::AuthenticationFailed => "store_auth_failed",
            Self::DatabaseMissing => "store_database_missing",
            Self::SchemaMissing => "store_schema_missing",
            Self::Unavailable => "store_unavailable",
        }
    }
}

/// A classified backing-store failure.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{}", .kind.message())]
pub struct StoreError {
    pub kind: StoreErrorKind,
    /// Underlying driver message, kept for logs and development-mode payloads.
    pub detail: String,
}

impl StoreError {
    pub fn new(kind: StoreErrorKind, detail: impl Into<String>) -> Self {
        Self {
            kind,
            detail: detail.into(),
        }
    }

    pub fn not_configured() -> Self {
        Self::new(StoreErrorKind::NotConfigured, "DATABASE_URL is not set")
    }
}

/// Unified error type for link operations.
#[derive(Debug, Clone, thiserror::Error)]
pub enum AppError {
    #[error("{message}")]
    Validation { message: String, details: Value },

    #[error("{message}")]
    NotFound { message: String, details: Value },

    #[error("Code already exists")]
    DuplicateCode { code: String },

    #[error("Failed to generate unique code after {attempts} attempts")]
    AllocationExhausted { attempts: usize },

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("{message}")]
    Internal { message: String, details: Value },
}

impl AppError {
    pub fn bad_request(message: impl Into<String>, details: Value) -> Self {
        Self::Validation {
            message: message.into(),
            details,
        }
    }

    pub fn not_found(message: impl Into<String>, details: Value) -> Self {
        Self::NotFound {
            message: message.into(),
            details,
        }
    }

    pub fn internal(message: impl Into<String>, details: Value) -> Self {
        Self::Internal {
            message: message.into(),
            details,
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation { .. } => StatusCode::BAD_REQUEST,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::DuplicateCode { .. } => StatusCode::CONFLICT,
            AppError::AllocationExhausted { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Store(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Builds the client-visible payload, sanitizing server-side details.
    pub fn to_error_info(&self) -> ErrorInfo {
        let message = self.to_string();

        match self {
            AppError::Validation { details, .. } => ErrorInfo {
                code: "validation_error",
                message,
                details: details.clone(),
            },
            AppError::NotFound { details, .. } => ErrorInfo {
                code: "not_found",
                message,
                details: details.clone(),
            },
            AppError::DuplicateCode { code } => ErrorInfo {
                code: "duplicate_code",
                message,
                details: json!({ "code": code }),
            },
            AppError::AllocationExhausted { attempts } => ErrorInfo {
                code: "allocation_exhausted",
                message,
                details: sanitized(json!({ "attempts": attempts })),
            },
            AppError::Store(store) => ErrorInfo {
                code: store.kind.code(),
                message,
                details: sanitized(json!({
                    "hint": store.kind.hint(),
                    "cause": store.detail,
                })),
            },
            AppError::Internal { details, .. } => ErrorInfo {
                code: "internal_error",
                message,
                details: sanitized(details.clone()),
            },
        }
    }
}

fn sanitized(details: Value) -> Value {
    if expose_details() { details } else { json!({}) }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            tracing::error!(error = ?self, "Request failed");
        } else {
            tracing::debug!(error = %self, "Request rejected");
        }

        let body = ErrorBody {
            error: self.to_error_info(),
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            AppError::bad_request("bad", json!({})).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::not_found("missing", json!({})).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::DuplicateCode {
                code: "abc123".to_string()
            }
            .status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::AllocationExhausted { attempts: 20 }.status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            AppError::from(StoreError::not_configured()).status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[test]
    fn test_store_error_display_uses_kind_message() {
        let err = AppError::from(StoreError::new(
            StoreErrorKind::AuthenticationFailed,
            "password authentication failed for user \"x\"",
        ));
        assert_eq!(err.to_string(), "Database authentication failed");
    }

    #[test]
    #[serial]
    fn test_internal_details_hidden_by_default() {
        set_expose_details(false);
        let info = AppError::internal("Database error", json!({ "cause": "boom" })).to_error_info();
        assert_eq!(info.code, "internal_error");
        assert_eq!(info.details, json!({}));
    }

    #[test]
    #[serial]
    fn test_internal_details_exposed_in_development() {
        set_expose_details(true);
        let info = AppError::internal("Database error", json!({ "cause": "boom" })).to_error_info();
        set_expose_details(false);
        assert_eq!(info.details["cause"], "boom");
    }

    #[test]
    fn test_validation_details_always_visible() {
        let info = AppError::bad_request("Invalid code", json!({ "code": "ab" })).to_error_info();
        assert_eq!(info.code, "validation_error");
        assert_eq!(info.details["code"], "ab");
    }
}
