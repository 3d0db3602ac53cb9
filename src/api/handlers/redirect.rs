//! Handler for short URL redirect.

use axum::{
    extract::{Path, State},
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::{debug, error, warn};
use url::Url;

use crate::error::AppError;
use crate::state::AppState;
use crate::utils::code_generator::{is_reserved_route, is_valid_code};

/// Landing path for unknown or malformed codes.
pub const NOT_FOUND_REDIRECT: &str = "/?error=notfound";

/// Landing path when the lookup itself failed.
pub const ERROR_REDIRECT: &str = "/?error=redirect";

/// Redirects a short code to its original URL.
///
/// # Endpoint
///
/// `GET /{code}`
///
/// # Request Flow
///
/// 1. Reserved segments (`api`, `healthz`, ...) answer 404
/// 2. Malformed codes redirect to [`NOT_FOUND_REDIRECT`] without a lookup
/// 3. Resolve the code; unknown codes redirect to [`NOT_FOUND_REDIRECT`]
/// 4. Record the click; a failure here is logged and ignored
/// 5. Return 302 Found to the stored URL
///
/// Store failures during the lookup never reach the visitor: they redirect
/// to [`ERROR_REDIRECT`].
pub async fn redirect_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
) -> Response {
    let code = code.trim();
    if is_reserved_route(code) {
        return AppError::not_found("Not found", json!({})).into_response();
    }

    if !is_valid_code(code) {
        debug!(code, "Malformed short code");
        return found(NOT_FOUND_REDIRECT);
    }

    let link = match state.link_service.get_link(code).await {
        Ok(link) => link,
        Err(AppError::NotFound { .. } | AppError::Validation { .. }) => {
            debug!(code, "Unknown short code");
            return found(NOT_FOUND_REDIRECT);
        }
        Err(e) => {
            error!(code, error = %e, "Redirect lookup failed");
            return found(ERROR_REDIRECT);
        }
    };

    if let Err(e) = state.link_service.record_click(code).await {
        warn!(code, error = %e, "Failed to record click");
    }

    match location_header(&link.original_url) {
        Some(location) => found_with(location),
        None => {
            error!(code, "Stored URL is not a valid Location header");
            found(ERROR_REDIRECT)
        }
    }
}

/// Stored URLs are kept as submitted; non-ASCII ones are sent percent-encoded.
fn location_header(url: &str) -> Option<HeaderValue> {
    HeaderValue::from_str(url).ok().or_else(|| {
        let parsed = Url::parse(url).ok()?;
        HeaderValue::from_str(parsed.as_str()).ok()
    })
}

fn found(location: &'static str) -> Response {
    found_with(HeaderValue::from_static(location))
}

fn found_with(location: HeaderValue) -> Response {
    (
        StatusCode::FOUND,
        [
            (header::LOCATION, location),
            (header::CACHE_CONTROL, HeaderValue::from_static("no-store")),
        ],
    )
        .into_response()
}
