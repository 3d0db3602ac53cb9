//! DTOs for link management endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::domain::entities::{Link, LinkQuery};
use crate::error::AppError;
use crate::utils::url_validator::validate_url;

/// Request to create a short link.
///
/// Parsed from a raw JSON value rather than derived, so that each malformed
/// field gets its own message and checks run in a fixed order: body, `url`,
/// then `code`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateLinkRequest {
    /// Trimmed destination URL.
    pub url: String,
    /// Custom code as sent; `null` and a missing field both mean "generate one".
    pub code: Option<String>,
}

impl CreateLinkRequest {
    pub fn from_json(body: &Value) -> Result<Self, AppError> {
        let Some(fields) = body.as_object() else {
            return Err(AppError::bad_request("Request body is required", json!({})));
        };

        let url = match fields.get("url") {
            None | Some(Value::Null) => {
                return Err(AppError::bad_request("URL is required", json!({ "field": "url" })));
            }
            Some(Value::String(url)) => url,
            Some(_) => {
                return Err(AppError::bad_request(
                    "URL must be a string",
                    json!({ "field": "url" }),
                ));
            }
        };

        let url = validate_url(url)
            .map_err(|e| AppError::bad_request(e.to_string(), json!({ "field": "url" })))?
            .to_string();

        let code = match fields.get("code") {
            None | Some(Value::Null) => None,
            Some(Value::String(code)) => Some(code.clone()),
            Some(_) => {
                return Err(AppError::bad_request(
                    "Code must be a string",
                    json!({ "field": "code" }),
                ));
            }
        };

        Ok(Self { url, code })
    }
}

/// Query parameters of `GET /links`.
///
/// Unknown or malformed values are not rejected; [`LinkQuery::from_raw`]
/// falls back to the default ordering.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListLinksParams {
    pub sort_by: Option<String>,
    pub order: Option<String>,
    pub filter: Option<String>,
}

impl ListLinksParams {
    pub fn to_query(&self) -> LinkQuery {
        LinkQuery::from_raw(
            self.sort_by.as_deref(),
            self.order.as_deref(),
            self.filter.as_deref(),
        )
    }
}

/// Full representation of a stored link.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkResponse {
    pub code: String,
    pub original_url: String,
    pub clicks: i64,
    pub created_at: DateTime<Utc>,
    pub last_clicked_at: Option<DateTime<Utc>>,
}

impl From<Link> for LinkResponse {
    fn from(link: Link) -> Self {
        Self {
            code: link.code,
            original_url: link.original_url,
            clicks: link.clicks,
            created_at: link.created_at,
            last_clicked_at: link.last_clicked_at,
        }
    }
}

/// Body of `201 Created` after a link is stored.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedLinkResponse {
    pub code: String,
    pub original_url: String,
    pub clicks: i64,
    pub created_at: DateTime<Utc>,
}

impl From<Link> for CreatedLinkResponse {
    fn from(link: Link) -> Self {
        Self {
            code: link.code,
            original_url: link.original_url,
            clicks: link.clicks,
            created_at: link.created_at,
        }
    }
}

/// Confirmation returned by `DELETE /links/{code}`.
#[derive(Debug, Serialize)]
pub struct DeleteLinkResponse {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{SortColumn, SortOrder};

    fn message(err: AppError) -> String {
        assert!(matches!(err, AppError::Validation { .. }));
        err.to_string()
    }

    #[test]
    fn test_parse_valid_request() {
        let req = CreateLinkRequest::from_json(&json!({
            "url": "  https://example.com/a  ",
            "code": "abc123"
        }))
        .unwrap();

        assert_eq!(req.url, "https://example.com/a");
        assert_eq!(req.code.as_deref(), Some("abc123"));
    }

    #[test]
    fn test_null_code_is_absent() {
        let req =
            CreateLinkRequest::from_json(&json!({ "url": "https://example.com", "code": null }))
                .unwrap();
        assert_eq!(req.code, None);
    }

    #[test]
    fn test_empty_code_is_kept_for_service_validation() {
        let req =
            CreateLinkRequest::from_json(&json!({ "url": "https://example.com", "code": "" }))
                .unwrap();
        assert_eq!(req.code.as_deref(), Some(""));
    }

    #[test]
    fn test_body_must_be_object() {
        let err = CreateLinkRequest::from_json(&json!(["https://example.com"])).unwrap_err();
        assert_eq!(message(err), "Request body is required");

        let err = CreateLinkRequest::from_json(&Value::Null).unwrap_err();
        assert_eq!(message(err), "Request body is required");
    }

    #[test]
    fn test_url_checks_in_order() {
        let err = CreateLinkRequest::from_json(&json!({})).unwrap_err();
        assert_eq!(message(err), "URL is required");

        let err = CreateLinkRequest::from_json(&json!({ "url": 42 })).unwrap_err();
        assert_eq!(message(err), "URL must be a string");

        let err = CreateLinkRequest::from_json(&json!({ "url": "   " })).unwrap_err();
        assert_eq!(message(err), "URL cannot be empty");

        let err = CreateLinkRequest::from_json(&json!({ "url": "ftp://example.com" })).unwrap_err();
        assert_eq!(
            message(err),
            "Invalid URL format. Must be http:// or https://"
        );
    }

    #[test]
    fn test_url_error_wins_over_code_error() {
        let err =
            CreateLinkRequest::from_json(&json!({ "url": "not-a-url", "code": 5 })).unwrap_err();
        assert_eq!(
            message(err),
            "Invalid URL format. Must be http:// or https://"
        );
    }

    #[test]
    fn test_code_must_be_string() {
        let err = CreateLinkRequest::from_json(&json!({ "url": "https://a.com", "code": 123456 }))
            .unwrap_err();
        assert_eq!(message(err), "Code must be a string");
    }

    #[test]
    fn test_list_params_to_query() {
        let params = ListLinksParams {
            sort_by: Some("originalUrl".to_string()),
            order: Some("ASC".to_string()),
            filter: Some("  exa ".to_string()),
        };
        let query = params.to_query();

        assert_eq!(query.sort_by, SortColumn::OriginalUrl);
        assert_eq!(query.order, SortOrder::Asc);
        assert_eq!(query.filter.as_deref(), Some("exa"));
    }

    #[test]
    fn test_link_response_uses_camel_case() {
        let link = Link::new(
            1,
            "abc123".to_string(),
            "https://example.com".to_string(),
            3,
            Utc::now(),
            None,
        );

        let value = serde_json::to_value(LinkResponse::from(link.clone())).unwrap();
        assert_eq!(value["originalUrl"], "https://example.com");
        assert!(value["lastClickedAt"].is_null());
        assert!(value.get("createdAt").is_some());

        let created = serde_json::to_value(CreatedLinkResponse::from(link)).unwrap();
        assert!(created.get("lastClickedAt").is_none());
        assert_eq!(created["clicks"], 3);
    }
}
