//! Handlers for link management endpoints (create, list, get, delete).

use axum::{
    Json,
    extract::{Path, Query, State, rejection::JsonRejection},
    http::StatusCode,
};
use serde_json::{Value, json};

use crate::api::dto::links::{
    CreateLinkRequest, CreatedLinkResponse, DeleteLinkResponse, LinkResponse, ListLinksParams,
};
use crate::error::AppError;
use crate::state::AppState;

/// Creates a short link.
///
/// # Endpoint
///
/// `POST /api/links` (also `POST /links`)
///
/// # Request Body
///
/// ```json
/// {
///   "url": "https://example.com",
///   "code": "Promo24"   // optional, 6-8 alphanumeric characters
/// }
/// ```
///
/// # Errors
///
/// Returns 400 Bad Request if the body, URL or code is invalid.
/// Returns 409 Conflict if the custom code already exists.
/// Returns 503 Service Unavailable if the database cannot be reached.
pub async fn create_link_handler(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<CreatedLinkResponse>), AppError> {
    let Json(body) = payload.map_err(|rejection| {
        AppError::bad_request(
            "Request body is required",
            json!({ "reason": rejection.body_text() }),
        )
    })?;

    let request = CreateLinkRequest::from_json(&body)?;

    let link = state
        .link_service
        .create_link(&request.url, request.code.as_deref())
        .await?;

    Ok((StatusCode::CREATED, Json(link.into())))
}

/// Lists links.
///
/// # Endpoint
///
/// `GET /api/links?sortBy=clicks&order=asc&filter=example`
///
/// `sortBy` is one of `createdAt`, `clicks`, `code`, `originalUrl`; anything
/// else sorts by creation time. `order` defaults to `desc`. `filter` matches
/// code or URL case-insensitively.
pub async fn list_links_handler(
    State(state): State<AppState>,
    Query(params): Query<ListLinksParams>,
) -> Result<Json<Vec<LinkResponse>>, AppError> {
    let links = state.link_service.list_links(params.to_query()).await?;

    Ok(Json(links.into_iter().map(LinkResponse::from).collect()))
}

/// Returns a single link with its click statistics.
///
/// # Endpoint
///
/// `GET /api/links/{code}`
///
/// # Errors
///
/// Returns 400 Bad Request for a malformed code and 404 Not Found if the
/// code does not exist.
pub async fn get_link_handler(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<LinkResponse>, AppError> {
    let link = state.link_service.get_link(&code).await?;

    Ok(Json(link.into()))
}

/// Permanently deletes a link.
///
/// # Endpoint
///
/// `DELETE /api/links/{code}`
///
/// # Errors
///
/// Returns 400 Bad Request for a malformed code and 404 Not Found if the
/// code does not exist.
pub async fn delete_link_handler(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<DeleteLinkResponse>, AppError> {
    state.link_service.delete_link(&code).await?;

    Ok(Json(DeleteLinkResponse {
        message: "Link deleted successfully".to_string(),
    }))
}
