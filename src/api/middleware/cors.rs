//! CORS policy for the JSON API.

use axum::http::{Method, header};
use tower_http::cors::{Any, CorsLayer};

/// Creates a permissive CORS layer.
///
/// Any origin may call the API with `GET`, `POST`, `DELETE` and `OPTIONS`
/// and a `Content-Type` header. No credentials are involved, so a wildcard
/// origin is acceptable.
pub fn layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
}
