//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET  /{code}`      - Short link redirect (public)
//! - `GET  /healthz`     - Health check
//! - `/api/*`            - JSON API (links and health)
//! - `/links*`           - Same link API without the prefix
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **CORS** - Any origin may call the JSON API
//! - **Rate limiting** - Per-IP token bucket on the JSON API
//! - **Path normalization** - Trailing slash handling

use crate::api;
use crate::api::handlers::{health_handler, redirect_handler};
use crate::api::middleware::{cors, rate_limit, tracing};
use crate::config::Config;
use crate::state::AppState;
use axum::Router;
use axum::routing::get;
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

/// Constructs the application router with all routes and middleware.
///
/// The returned service needs connection info for the rate limiter; serve it
/// with `into_make_service_with_connect_info::<SocketAddr>()`.
pub fn app_router(state: AppState, config: &Config) -> NormalizePath<Router> {
    NormalizePathLayer::trim_trailing_slash().layer(app_routes(state, config))
}

/// Routes and middleware of [`app_router`] before path normalization.
///
/// Normalization has to wrap the router from outside, so layers that must
/// run before routing (connection info in tests, for one) go on this router.
pub fn app_routes(state: AppState, config: &Config) -> Router {
    let json_api = Router::new()
        .nest("/api", api::routes::api_routes())
        .merge(api::routes::link_routes())
        .layer(rate_limit::layer(
            config.rate_limit_per_second,
            config.rate_limit_burst,
        ))
        .layer(cors::layer());

    Router::new()
        .route("/healthz", get(health_handler))
        .route("/{code}", get(redirect_handler))
        .merge(json_api)
        .with_state(state)
        .layer(tracing::layer())
}
