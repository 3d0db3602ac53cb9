//! PostgreSQL implementation of link repository.

use async_trait::async_trait;
use sqlx::{Postgres, QueryBuilder};
use std::sync::Arc;

use crate::domain::entities::{Link, LinkQuery, NewLink};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;
use crate::infrastructure::persistence::Database;

const LINK_COLUMNS: &str = "id, code, original_url, clicks, created_at, last_clicked_at";

/// PostgreSQL repository for link storage and retrieval.
///
/// Every call goes through [`Database::with_schema`], so the table is created
/// on first use and a missing table triggers one re-initialization and retry.
pub struct PgLinkRepository {
    db: Arc<Database>,
}

impl PgLinkRepository {
    /// Creates a new repository over a shared database handle.
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl LinkRepository for PgLinkRepository {
    async fn code_exists(&self, code: &str) -> Result<bool, AppError> {
        self.db
            .with_schema(|pool| async move {
                sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM links WHERE code = $1)")
                    .bind(code)
                    .fetch_one(&pool)
                    .await
            })
            .await
    }

    async fn create(&self, new_link: NewLink) -> Result<Link, AppError> {
        let code = new_link.code.as_str();
        let original_url = new_link.original_url.as_str();

        // ON CONFLICT turns a lost race on the same code into "no row" instead of an error.
        let inserted = self
            .db
            .with_schema(|pool| async move {
                sqlx::query_as::<_, Link>(&format!(
                    r#"
                    INSERT INTO links (code, original_url)
                    VALUES ($1, $2)
                    ON CONFLICT (code) DO NOTHING
                    RETURNING {LINK_COLUMNS}
                    "#
                ))
                .bind(code)
                .bind(original_url)
                .fetch_optional(&pool)
                .await
            })
            .await?;

        inserted.ok_or_else(|| AppError::DuplicateCode {
            code: new_link.code.clone(),
        })
    }

    async fn list(&self, query: LinkQuery) -> Result<Vec<Link>, AppError> {
        let pattern = query.filter_pattern();
        let pattern = pattern.as_deref();
        let column = query.sort_by.as_sql();
        let order = query.order.as_sql();

        self.db
            .with_schema(|pool| async move {
                let mut builder =
                    QueryBuilder::<Postgres>::new(format!("SELECT {LINK_COLUMNS} FROM links"));

                if let Some(pattern) = pattern {
                    builder
                        .push(" WHERE code ILIKE ")
                        .push_bind(pattern)
                        .push(" OR original_url ILIKE ")
                        .push_bind(pattern);
                }

                // Column and direction come from fixed enum mappings, never from input.
                builder
                    .push(" ORDER BY ")
                    .push(column)
                    .push(" ")
                    .push(order)
                    .push(", id ")
                    .push(order);

                builder.build_query_as::<Link>().fetch_all(&pool).await
            })
            .await
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<Link>, AppError> {
        self.db
            .with_schema(|pool| async move {
                sqlx::query_as::<_, Link>(&format!(
                    "SELECT {LINK_COLUMNS} FROM links WHERE code = $1"
                ))
                .bind(code)
                .fetch_optional(&pool)
                .await
            })
            .await
    }

    async fn increment_clicks(&self, code: &str) -> Result<Option<Link>, AppError> {
        self.db
            .with_schema(|pool| async move {
                sqlx::query_as::<_, Link>(&format!(
                    r#"
                    UPDATE links
                    SET clicks = clicks + 1, last_clicked_at = NOW()
                    WHERE code = $1
                    RETURNING {LINK_COLUMNS}
                    "#
                ))
                .bind(code)
                .fetch_optional(&pool)
                .await
            })
            .await
    }

    async fn delete(&self, code: &str) -> Result<Option<Link>, AppError> {
        let deleted = self
            .db
            .with_schema(|pool| async move {
                sqlx::query_as::<_, Link>(&format!(
                    "DELETE FROM links WHERE code = $1 RETURNING {LINK_COLUMNS}"
                ))
                .bind(code)
                .fetch_optional(&pool)
                .await
            })
            .await?;

        if let Some(ref link) = deleted {
            tracing::info!(code = %link.code, clicks = link.clicks, "Link deleted");
        } else {
            tracing::debug!(code, "Delete matched no link");
        }

        Ok(deleted)
    }
}
