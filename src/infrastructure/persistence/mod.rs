//! PostgreSQL persistence.
//!
//! - [`Database`] - Connection pool, schema lifecycle and retry-on-missing-table
//! - [`SchemaInitializer`] - Idempotent, process-wide schema creation
//! - [`PgLinkRepository`] - Link storage and retrieval

pub mod database;
pub mod pg_link_repository;
pub mod schema;

pub use database::Database;
pub use pg_link_repository::PgLinkRepository;
pub use schema::{InitGate, SchemaInitializer};
