//! API route configuration.

use crate::api::handlers::{
    create_link_handler, delete_link_handler, get_link_handler, health_handler,
    list_links_handler,
};
use crate::state::AppState;
use axum::{Router, routing::get};

/// Link management routes, mounted both under `/api` and at the root.
///
/// # Endpoints
///
/// - `GET    /links`          - List links (sort and filter via query)
/// - `POST   /links`          - Create a short link
/// - `GET    /links/{code}`   - Link details and click statistics
/// - `DELETE /links/{code}`   - Permanently delete a link
pub fn link_routes() -> Router<AppState> {
    Router::new()
        .route("/links", get(list_links_handler).post(create_link_handler))
        .route(
            "/links/{code}",
            get(get_link_handler).delete(delete_link_handler),
        )
}

/// Everything served under `/api`: the link routes plus `GET /healthz`.
pub fn api_routes() -> Router<AppState> {
    link_routes().route("/healthz", get(health_handler))
}
