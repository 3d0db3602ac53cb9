//! Idempotent schema creation guarded by a process-wide initialization gate.
//!
//! The gate is tri-state: not started, initializing (with waiters), ready.
//! Concurrent callers that arrive while initialization is running await the
//! same outcome instead of issuing their own `CREATE TABLE`. A failure moves
//! the gate back to "not started" so the next caller retries.

use sqlx::PgPool;
use std::future::Future;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tokio::sync::watch;

use crate::error::AppError;
use crate::utils::db_error::map_pool_error;

const CREATE_LINKS_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS links (
        id BIGSERIAL PRIMARY KEY,
        code VARCHAR(8) UNIQUE NOT NULL,
        original_url TEXT NOT NULL,
        clicks BIGINT NOT NULL DEFAULT 0,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        last_clicked_at TIMESTAMPTZ
    )
"#;

const CREATE_INDEXES: &[(&str, &str)] = &[
    (
        "idx_links_code",
        "CREATE INDEX IF NOT EXISTS idx_links_code ON links (code)",
    ),
    (
        "idx_links_created_at",
        "CREATE INDEX IF NOT EXISTS idx_links_created_at ON links (created_at)",
    ),
];

type Outcome = Option<Result<(), AppError>>;

enum GateState {
    NotStarted,
    Initializing(watch::Receiver<Outcome>),
    Ready,
}

enum Role {
    Leader(watch::Sender<Outcome>),
    Waiter(watch::Receiver<Outcome>),
}

/// One-shot, retryable initialization shared by all callers in the process.
pub struct InitGate {
    state: Mutex<GateState>,
}

impl Default for InitGate {
    fn default() -> Self {
        Self::new()
    }
}

impl InitGate {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(GateState::NotStarted),
        }
    }

    fn lock(&self) -> MutexGuard<'_, GateState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns true once an initialization has completed successfully.
    pub fn is_ready(&self) -> bool {
        matches!(*self.lock(), GateState::Ready)
    }

    /// Moves a ready gate back to "not started". An in-flight run is left alone.
    pub fn reset(&self) {
        let mut state = self.lock();
        if matches!(*state, GateState::Ready) {
            *state = GateState::NotStarted;
        }
    }

    /// Runs `init` unless the gate is already ready.
    ///
    /// If another caller is running `init`, waits for it and returns its
    /// outcome. If that caller is cancelled before finishing, one of the
    /// waiters takes over.
    pub async fn run<F, Fut>(&self, init: F) -> Result<(), AppError>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<(), AppError>>,
    {
        loop {
            let role = {
                let mut state = self.lock();
                match &*state {
                    GateState::Ready => return Ok(()),
                    GateState::Initializing(rx) => Role::Waiter(rx.clone()),
                    GateState::NotStarted => {
                        let (tx, rx) = watch::channel(None);
                        *state = GateState::Initializing(rx);
                        Role::Leader(tx)
                    }
                }
            };

            match role {
                Role::Leader(tx) => {
                    let mut guard = ResetOnDrop {
                        gate: self,
                        armed: true,
                    };

                    let result = init().await;
                    guard.armed = false;

                    *self.lock() = if result.is_ok() {
                        GateState::Ready
                    } else {
                        GateState::NotStarted
                    };
                    let _ = tx.send(Some(result.clone()));

                    return result;
                }
                Role::Waiter(mut rx) => {
                    if let Ok(outcome) = rx.wait_for(Option::is_some).await
                        && let Some(result) = outcome.as_ref()
                    {
                        return result.clone();
                    }
                    // Leader dropped without an outcome; the guard already reset the state.
                }
            }
        }
    }
}

/// Returns the gate to "not started" if the leading future is dropped mid-run.
struct ResetOnDrop<'a> {
    gate: &'a InitGate,
    armed: bool,
}

impl Drop for ResetOnDrop<'_> {
    fn drop(&mut self) {
        if self.armed {
            *self.gate.lock() = GateState::NotStarted;
        }
    }
}

/// Creates the `links` table and its indexes once per process.
#[derive(Default)]
pub struct SchemaInitializer {
    gate: InitGate,
}

impl SchemaInitializer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ensures the schema exists, creating it on first use.
    ///
    /// # Errors
    ///
    /// Returns the classified store error if `CREATE TABLE` fails. Index
    /// creation failures are logged and ignored.
    pub async fn ensure(&self, pool: &PgPool) -> Result<(), AppError> {
        self.gate.run(|| create_schema(pool)).await
    }

    /// Forgets a previous successful run so the next [`ensure`](Self::ensure)
    /// executes the DDL again.
    pub fn invalidate(&self) {
        self.gate.reset();
    }
}

async fn create_schema(pool: &PgPool) -> Result<(), AppError> {
    if let Err(e) = sqlx::query(CREATE_LINKS_TABLE).execute(pool).await {
        return Err(map_pool_error(pool, e).await);
    }

    for (name, ddl) in CREATE_INDEXES {
        if let Err(e) = sqlx::query(ddl).execute(pool).await {
            tracing::warn!(index = name, error = %e, "Failed to create index");
        }
    }

    tracing::info!("Database schema initialized");
    Ok(())
}
