mod common;

use axum::Router;
use axum::body::Body;
use axum::extract::connect_info::MockConnectInfo;
use axum::http::{Method, Request, StatusCode, header};
use axum::response::Response;
use serde_json::Value;
use sqlx::PgPool;
use std::net::SocketAddr;
use tinylink::config::Config;
use tinylink::routes::app_routes;
use tinylink::state::AppState;
use tower::{Layer, ServiceExt};
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

/// The served application, with a fixed peer address for the rate limiter.
fn app(state: AppState) -> NormalizePath<Router> {
    let routes = app_routes(state, &Config::default())
        .layer(MockConnectInfo(SocketAddr::from(([127, 0, 0, 1], 4000))));

    NormalizePathLayer::trim_trailing_slash().layer(routes)
}

async fn send(state: AppState, request: Request<Body>) -> Response {
    app(state).oneshot(request).await.unwrap()
}

async fn json_body(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[sqlx::test(migrations = false)]
async fn test_healthz_with_trailing_slash(pool: PgPool) {
    let request = Request::get("/healthz/").body(Body::empty()).unwrap();

    let response = send(common::create_test_state(pool), request).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert_eq!(json["status"], "healthy");
    assert!(json["uptime"].is_u64());
}

#[tokio::test]
async fn test_links_preflight_allows_any_origin() {
    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/links")
        .header(header::ORIGIN, "https://app.example.com")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type")
        .body(Body::empty())
        .unwrap();

    let response = send(common::create_unconfigured_state(), request).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "*"
    );
    let methods = response.headers()[header::ACCESS_CONTROL_ALLOW_METHODS]
        .to_str()
        .unwrap();
    assert!(methods.contains("POST"));
    assert!(methods.contains("DELETE"));
}

#[tokio::test]
async fn test_api_prefix_alone_is_not_found() {
    let request = Request::get("/api").body(Body::empty()).unwrap();

    let response = send(common::create_unconfigured_state(), request).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = false)]
async fn test_link_api_served_through_rate_limiter(pool: PgPool) {
    let request = Request::post("/api/links")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(r#"{"url":"https://example.com/served"}"#))
        .unwrap();

    let response = send(common::create_test_state(pool), request).await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = json_body(response).await;
    assert_eq!(json["originalUrl"], "https://example.com/served");
}
