//! Link creation, lookup, click accounting and deletion.

use std::sync::Arc;

use crate::domain::entities::{Link, LinkQuery, NewLink};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;
use crate::utils::code_generator::{generate_code, validate_code};
use crate::utils::url_validator::validate_url;
use serde_json::json;

/// Number of random draws before code allocation gives up.
pub const MAX_ALLOCATION_ATTEMPTS: usize = 20;

/// Service for creating and managing shortened links.
///
/// Validates input, allocates codes (random or caller-supplied) and maps
/// "no row" repository results to [`AppError::NotFound`].
pub struct LinkService<L: LinkRepository> {
    link_repository: Arc<L>,
}

impl<L: LinkRepository> LinkService<L> {
    /// Creates a new link service.
    pub fn new(link_repository: Arc<L>) -> Self {
        Self { link_repository }
    }

    /// Creates a short link.
    ///
    /// # Arguments
    ///
    /// - `url` - The destination URL; stored trimmed
    /// - `custom_code` - Optional caller-chosen code; `None` allocates a random one
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if the URL or custom code is invalid.
    /// Returns [`AppError::DuplicateCode`] if the custom code is taken, including
    /// when a concurrent request inserts it first.
    /// Returns [`AppError::AllocationExhausted`] if no free random code was found.
    pub async fn create_link(&self, url: &str, custom_code: Option<&str>) -> Result<Link, AppError> {
        let original_url = validate_url(url).map_err(|e| {
            AppError::bad_request(e.to_string(), json!({ "reason": format!("{e:?}") }))
        })?;

        let code = self.allocate_code(custom_code).await?;

        let link = self
            .link_repository
            .create(NewLink {
                code,
                original_url: original_url.to_string(),
            })
            .await?;

        tracing::info!(code = %link.code, "Link created");
        Ok(link)
    }

    /// Picks the code for a new link.
    ///
    /// A custom code is trimmed, must be non-empty and match the 6-8
    /// alphanumeric format, and must not be stored yet. Without one, random
    /// 6-character codes are drawn until a free one is found or
    /// [`MAX_ALLOCATION_ATTEMPTS`] draws have collided.
    pub async fn allocate_code(&self, custom_code: Option<&str>) -> Result<String, AppError> {
        if let Some(custom) = custom_code {
            let custom = custom.trim();

            if custom.is_empty() {
                return Err(AppError::bad_request(
                    "Code cannot be empty. Leave it blank to auto-generate.",
                    json!({}),
                ));
            }

            validate_code(custom)?;

            if self.link_repository.code_exists(custom).await? {
                return Err(AppError::DuplicateCode {
                    code: custom.to_string(),
                });
            }

            return Ok(custom.to_string());
        }

        for attempt in 1..=MAX_ALLOCATION_ATTEMPTS {
            let code = generate_code();

            if !self.link_repository.code_exists(&code).await? {
                return Ok(code);
            }

            tracing::debug!(attempt, "Generated code collided");
        }

        Err(AppError::AllocationExhausted {
            attempts: MAX_ALLOCATION_ATTEMPTS,
        })
    }

    /// Lists links with the given ordering and filter.
    pub async fn list_links(&self, query: LinkQuery) -> Result<Vec<Link>, AppError> {
        self.link_repository.list(query).await
    }

    /// Retrieves a link by code.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if the code format is invalid and
    /// [`AppError::NotFound`] if no link has this code.
    pub async fn get_link(&self, code: &str) -> Result<Link, AppError> {
        let code = code.trim();
        validate_code(code)?;

        self.link_repository
            .find_by_code(code)
            .await?
            .ok_or_else(|| link_not_found(code))
    }

    /// Records one click: increments the counter and stamps `last_clicked_at`.
    pub async fn record_click(&self, code: &str) -> Result<Link, AppError> {
        let code = code.trim();
        validate_code(code)?;

        self.link_repository
            .increment_clicks(code)
            .await?
            .ok_or_else(|| link_not_found(code))
    }

    /// Deletes a link and returns its state before deletion.
    pub async fn delete_link(&self, code: &str) -> Result<Link, AppError> {
        let code = code.trim();
        validate_code(code)?;

        self.link_repository
            .delete(code)
            .await?
            .ok_or_else(|| link_not_found(code))
    }
}

fn link_not_found(code: &str) -> AppError {
    AppError::not_found("Link not found", json!({ "code": code }))
}
