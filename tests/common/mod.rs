#![allow(dead_code)]

use axum::Router;
use sqlx::PgPool;
use std::sync::Arc;
use tinylink::api::routes::{api_routes, link_routes};
use tinylink::domain::entities::Link;
use tinylink::infrastructure::persistence::Database;
use tinylink::state::AppState;

pub fn create_test_state(pool: PgPool) -> AppState {
    AppState::new(Arc::new(Database::from_pool(pool)))
}

/// State whose store was never configured; every store call fails with 503.
pub fn create_unconfigured_state() -> AppState {
    AppState::new(Arc::new(Database::unconfigured()))
}

/// JSON API as mounted by the server, without the rate limiter.
pub fn api_router(state: AppState) -> Router {
    Router::new()
        .nest("/api", api_routes())
        .merge(link_routes())
        .with_state(state)
}

pub async fn create_test_link(state: &AppState, url: &str, code: Option<&str>) -> Link {
    state.link_service.create_link(url, code).await.unwrap()
}

pub async fn count_links(pool: &PgPool) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM links")
        .fetch_one(pool)
        .await
        .unwrap()
}
