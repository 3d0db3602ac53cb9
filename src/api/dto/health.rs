//! DTOs for health check endpoint.

use serde::Serialize;

/// Health check response when the store is reachable.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: &'static str,
    /// RFC 3339 timestamp of the check.
    pub timestamp: String,
    /// Process uptime in whole seconds.
    pub uptime: u64,
    pub uptime_formatted: String,
}

/// Health check response when the store is unreachable or misconfigured.
#[derive(Debug, Serialize)]
pub struct UnhealthyResponse {
    pub status: &'static str,
    pub error: String,
    pub details: String,
    pub code: &'static str,
    pub hint: &'static str,
}
