//! Classification of SQLx errors into application errors.

use crate::error::{AppError, StoreError, StoreErrorKind};
use serde_json::json;
use sqlx::{ConnectOptions, Connection, PgPool};
use std::io;
use std::time::Duration;

/// Upper bound for the direct connection opened to explain a pool timeout.
const DIRECT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// PostgreSQL SQLSTATE for `undefined_table`.
const UNDEFINED_TABLE: &str = "42P01";
const INVALID_PASSWORD: &str = "28P01";
const INVALID_AUTHORIZATION: &str = "28000";
const INVALID_CATALOG_NAME: &str = "3D000";

/// Returns `true` if the query failed because the `links` table does not exist.
pub fn is_undefined_table(e: &sqlx::Error) -> bool {
    sqlstate(e).as_deref() == Some(UNDEFINED_TABLE)
}

fn sqlstate(e: &sqlx::Error) -> Option<String> {
    e.as_database_error()
        .and_then(|db| db.code())
        .map(|code| code.into_owned())
}

/// Maps a driver error onto a store failure category, if it is one.
///
/// Returns `None` for errors that are not about reaching or using the store
/// (decode errors, constraint violations, ...).
pub fn classify(e: &sqlx::Error) -> Option<StoreErrorKind> {
    match e {
        sqlx::Error::Configuration(_) => Some(StoreErrorKind::NotConfigured),
        sqlx::Error::Io(io_err) => Some(classify_io(io_err)),
        sqlx::Error::Tls(_)
        | sqlx::Error::PoolTimedOut
        | sqlx::Error::PoolClosed
        | sqlx::Error::WorkerCrashed => Some(StoreErrorKind::Unavailable),
        sqlx::Error::Database(_) => match sqlstate(e).as_deref() {
            Some(UNDEFINED_TABLE) => Some(StoreErrorKind::SchemaMissing),
            Some(INVALID_PASSWORD) | Some(INVALID_AUTHORIZATION) => {
                Some(StoreErrorKind::AuthenticationFailed)
            }
            Some(INVALID_CATALOG_NAME) => Some(StoreErrorKind::DatabaseMissing),
            _ => None,
        },
        _ => None,
    }
}

fn classify_io(err: &io::Error) -> StoreErrorKind {
    if err.kind() == io::ErrorKind::ConnectionRefused {
        return StoreErrorKind::ConnectionRefused;
    }

    let message = err.to_string();
    if message.contains("failed to lookup address")
        || message.contains("Name or service not known")
        || message.contains("nodename nor servname")
        || message.contains("No such host is known")
    {
        return StoreErrorKind::HostNotFound;
    }

    StoreErrorKind::Unavailable
}

/// Converts a driver error into an [`AppError`], logging the underlying cause.
pub fn map_sqlx_error(e: sqlx::Error) -> AppError {
    match classify(&e) {
        Some(kind) => {
            tracing::error!(error = %e, kind = ?kind, "Store failure");
            AppError::Store(StoreError::new(kind, e.to_string()))
        }
        None => {
            tracing::error!(error = %e, "Database error");
            AppError::internal("Database error", json!({ "cause": e.to_string() }))
        }
    }
}

/// Converts an error returned through `pool` into an [`AppError`].
///
/// The pool retries refused connections until its acquire timeout and then
/// reports only `PoolTimedOut`, which hides the actual cause. For that case
/// one connection is opened directly with the pool's options and its error
/// is classified instead.
pub async fn map_pool_error(pool: &PgPool, e: sqlx::Error) -> AppError {
    if matches!(e, sqlx::Error::PoolTimedOut)
        && let Some(cause) = explain_pool_timeout(pool).await
    {
        tracing::error!(kind = ?cause.kind, error = %cause.detail, "Store failure");
        return AppError::Store(cause);
    }

    map_sqlx_error(e)
}

/// Opens one connection outside the pool and classifies its failure.
///
/// Returns `None` if the connection succeeds (the pool is merely exhausted)
/// or the failure is not a store failure.
pub async fn explain_pool_timeout(pool: &PgPool) -> Option<StoreError> {
    let options = pool.connect_options();

    match tokio::time::timeout(DIRECT_CONNECT_TIMEOUT, options.connect()).await {
        Ok(Ok(conn)) => {
            if let Err(e) = conn.close().await {
                tracing::debug!(error = %e, "Failed to close diagnostic connection");
            }
            None
        }
        Ok(Err(e)) => classify(&e).map(|kind| StoreError::new(kind, e.to_string())),
        Err(_) => Some(StoreError::new(
            StoreErrorKind::Unavailable,
            format!(
                "no connection within {}s",
                DIRECT_CONNECT_TIMEOUT.as_secs()
            ),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connection_refused() {
        let err = sqlx::Error::Io(io::Error::from(io::ErrorKind::ConnectionRefused));
        assert_eq!(classify(&err), Some(StoreErrorKind::ConnectionRefused));
    }

    #[test]
    fn test_host_not_found() {
        let err = sqlx::Error::Io(io::Error::other(
            "failed to lookup address information: Name or service not known",
        ));
        assert_eq!(classify(&err), Some(StoreErrorKind::HostNotFound));
    }

    #[test]
    fn test_other_io_is_unavailable() {
        let err = sqlx::Error::Io(io::Error::from(io::ErrorKind::TimedOut));
        assert_eq!(classify(&err), Some(StoreErrorKind::Unavailable));
    }

    #[test]
    fn test_pool_timeout_is_unavailable() {
        assert_eq!(
            classify(&sqlx::Error::PoolTimedOut),
            Some(StoreErrorKind::Unavailable)
        );
        assert_eq!(
            classify(&sqlx::Error::PoolClosed),
            Some(StoreErrorKind::Unavailable)
        );
    }

    #[test]
    fn test_row_not_found_is_not_a_store_failure() {
        assert_eq!(classify(&sqlx::Error::RowNotFound), None);
        assert!(!is_undefined_table(&sqlx::Error::RowNotFound));
    }

    #[test]
    fn test_map_store_failure_to_503() {
        let err = map_sqlx_error(sqlx::Error::PoolTimedOut);
        assert!(matches!(
            err,
            AppError::Store(StoreError {
                kind: StoreErrorKind::Unavailable,
                ..
            })
        ));
    }

    #[test]
    fn test_map_other_errors_to_internal() {
        let err = map_sqlx_error(sqlx::Error::RowNotFound);
        assert!(matches!(err, AppError::Internal { .. }));
    }
}
