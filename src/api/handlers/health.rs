//! Handler for health check endpoint.

use axum::{Json, extract::State, http::StatusCode};
use chrono::Utc;

use crate::api::dto::health::{HealthResponse, UnhealthyResponse};
use crate::state::AppState;
use crate::utils::uptime::format_uptime;

/// Reports service health and uptime.
///
/// # Endpoint
///
/// `GET /healthz` (also `GET /api/healthz`)
///
/// # Response Codes
///
/// - **200 OK**: The database answered `SELECT 1`
/// - **503 Service Unavailable**: The database is unreachable or not configured
///
/// # Response
///
/// ```json
/// {
///   "status": "healthy",
///   "timestamp": "2024-05-01T12:00:00+00:00",
///   "uptime": 93784,
///   "uptimeFormatted": "1d 2h 3m 4s"
/// }
/// ```
///
/// When unhealthy, the body names the failure and how to fix it:
///
/// ```json
/// {
///   "status": "unhealthy",
///   "error": "Database authentication failed",
///   "details": "password authentication failed for user \"app\"",
///   "code": "store_auth_failed",
///   "hint": "Invalid username or password in DATABASE_URL."
/// }
/// ```
pub async fn health_handler(
    State(state): State<AppState>,
) -> Result<Json<HealthResponse>, (StatusCode, Json<UnhealthyResponse>)> {
    if let Err(e) = state.database.ping().await {
        tracing::warn!(kind = ?e.kind, error = %e.detail, "Health check failed");

        return Err((
            StatusCode::SERVICE_UNAVAILABLE,
            Json(UnhealthyResponse {
                status: "unhealthy",
                error: e.to_string(),
                details: e.detail,
                code: e.kind.code(),
                hint: e.kind.hint(),
            }),
        ));
    }

    let uptime = state.started_at.elapsed().as_secs();

    Ok(Json(HealthResponse {
        status: "healthy",
        timestamp: Utc::now().to_rfc3339(),
        uptime,
        uptime_formatted: format_uptime(uptime),
    }))
}
