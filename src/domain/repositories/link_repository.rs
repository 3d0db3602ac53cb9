//! Repository trait for short link data access.

use crate::domain::entities::{Link, LinkQuery, NewLink};
use crate::error::AppError;
use async_trait::async_trait;

/// Repository interface for the `links` table.
///
/// Every operation is a single statement. Implementations are responsible
/// for making sure the schema exists before running it.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgLinkRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LinkRepository: Send + Sync {
    /// Returns `true` if a link with exactly this code is stored.
    async fn code_exists(&self, code: &str) -> Result<bool, AppError>;

    /// Inserts a new link.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::DuplicateCode`] if the code is already taken.
    async fn create(&self, new_link: NewLink) -> Result<Link, AppError>;

    /// Lists links ordered and filtered according to `query`.
    async fn list(&self, query: LinkQuery) -> Result<Vec<Link>, AppError>;

    /// Finds a link by its code.
    async fn find_by_code(&self, code: &str) -> Result<Option<Link>, AppError>;

    /// Atomically increments `clicks` and sets `last_clicked_at` to now.
    ///
    /// Returns the updated link, or `None` if no link has this code.
    async fn increment_clicks(&self, code: &str) -> Result<Option<Link>, AppError>;

    /// Hard-deletes a link, returning its last state.
    ///
    /// Returns `None` if no link has this code.
    async fn delete(&self, code: &str) -> Result<Option<Link>, AppError>;
}
