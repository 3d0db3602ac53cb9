//! Shared application state injected into every handler.

use std::sync::Arc;
use std::time::Instant;

use crate::application::services::LinkService;
use crate::infrastructure::persistence::{Database, PgLinkRepository};

#[derive(Clone)]
pub struct AppState {
    pub link_service: Arc<LinkService<PgLinkRepository>>,
    pub database: Arc<Database>,
    /// Process start, reported as uptime by the health check.
    pub started_at: Instant,
}

impl AppState {
    /// Wires the PostgreSQL repository and link service over `database`.
    pub fn new(database: Arc<Database>) -> Self {
        let link_repository = Arc::new(PgLinkRepository::new(database.clone()));

        Self {
            link_service: Arc::new(LinkService::new(link_repository)),
            database,
            started_at: Instant::now(),
        }
    }
}
