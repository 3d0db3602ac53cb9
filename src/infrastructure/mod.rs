//! Infrastructure layer for external integrations.
//!
//! Implements the repository traits defined by the domain layer.
//!
//! - [`persistence`] - PostgreSQL connection handling and repositories

pub mod persistence;
