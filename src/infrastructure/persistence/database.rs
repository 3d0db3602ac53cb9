//! Connection pool and schema lifecycle for the backing store.

use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::future::Future;
use std::time::Duration;

use crate::config::Config;
use crate::error::{AppError, StoreError, StoreErrorKind};
use crate::infrastructure::persistence::schema::SchemaInitializer;
use crate::utils::db_error::{classify, explain_pool_timeout, is_undefined_table, map_pool_error};

/// Longest a health check waits for the pool before diagnosing directly.
pub const PING_TIMEOUT: Duration = Duration::from_secs(5);

/// Shared handle to the PostgreSQL store.
///
/// Holds either a pool or the reason no pool could be built, so a missing or
/// malformed `DATABASE_URL` surfaces per request instead of at startup.
pub struct Database {
    pool: Result<PgPool, StoreError>,
    schema: SchemaInitializer,
}

impl Database {
    /// Builds a lazily connecting pool from the configuration.
    ///
    /// No connection is opened here; the first query connects.
    pub fn connect_lazy(config: &Config) -> Self {
        let Some(url) = config.database_url.as_deref() else {
            tracing::warn!("DATABASE_URL is not set; link operations will fail until configured");
            return Self::unconfigured();
        };

        let pool = PgPoolOptions::new()
            .max_connections(config.db_max_connections)
            .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
            .idle_timeout(Duration::from_secs(config.db_idle_timeout))
            .max_lifetime(Duration::from_secs(config.db_max_lifetime))
            .connect_lazy(url)
            .map_err(|e| {
                tracing::error!(error = %e, "Invalid database configuration");
                StoreError::new(StoreErrorKind::NotConfigured, e.to_string())
            });

        Self {
            pool,
            schema: SchemaInitializer::new(),
        }
    }

    /// Wraps an existing pool.
    pub fn from_pool(pool: PgPool) -> Self {
        Self {
            pool: Ok(pool),
            schema: SchemaInitializer::new(),
        }
    }

    /// A store with no connection string.
    pub fn unconfigured() -> Self {
        Self {
            pool: Err(StoreError::not_configured()),
            schema: SchemaInitializer::new(),
        }
    }

    /// Returns the pool, or the configuration failure as an [`AppError::Store`].
    pub fn pool(&self) -> Result<&PgPool, AppError> {
        self.pool.as_ref().map_err(|e| AppError::Store(e.clone()))
    }

    /// Creates the schema if this process has not done so yet.
    pub async fn ensure_schema(&self) -> Result<(), AppError> {
        let pool = self.pool()?;
        self.schema.ensure(pool).await
    }

    /// Runs a single-statement operation after ensuring the schema exists.
    ///
    /// If the statement still fails with `undefined_table` (the table was
    /// dropped or created by a racing process that failed), the schema is
    /// re-created and the statement retried exactly once.
    pub async fn with_schema<T, F, Fut>(&self, op: F) -> Result<T, AppError>
    where
        F: Fn(PgPool) -> Fut,
        Fut: Future<Output = Result<T, sqlx::Error>>,
    {
        let pool = self.pool()?;
        self.schema.ensure(pool).await?;

        match op(pool.clone()).await {
            Err(e) if is_undefined_table(&e) => {
                tracing::warn!(error = %e, "links table missing; re-initializing schema and retrying");
                self.schema.invalidate();
                self.schema.ensure(pool).await?;
                match op(pool.clone()).await {
                    Ok(value) => Ok(value),
                    Err(e) => Err(map_pool_error(pool, e).await),
                }
            }
            Ok(value) => Ok(value),
            Err(e) => Err(map_pool_error(pool, e).await),
        }
    }

    /// Checks connectivity with `SELECT 1`.
    ///
    /// Gives up after [`PING_TIMEOUT`] even if the pool would wait longer. A
    /// pool timeout is explained by a direct connection attempt, so a refused
    /// connection or unknown host is reported as such.
    pub async fn ping(&self) -> Result<(), StoreError> {
        let pool = self.pool.as_ref().map_err(Clone::clone)?;

        let result = match tokio::time::timeout(PING_TIMEOUT, sqlx::query("SELECT 1").execute(pool))
            .await
        {
            Ok(result) => result,
            Err(_) => Err(sqlx::Error::PoolTimedOut),
        };

        match result {
            Ok(_) => Ok(()),
            Err(sqlx::Error::PoolTimedOut) => Err(explain_pool_timeout(pool)
                .await
                .unwrap_or_else(|| {
                    StoreError::new(
                        StoreErrorKind::Unavailable,
                        sqlx::Error::PoolTimedOut.to_string(),
                    )
                })),
            Err(e) => {
                let kind = classify(&e).unwrap_or(StoreErrorKind::Unavailable);
                Err(StoreError::new(kind, e.to_string()))
            }
        }
    }
}
