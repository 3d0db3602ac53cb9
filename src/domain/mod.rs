//! Domain layer containing business entities and repository contracts.
//!
//! - [`entities`] - Core business data structures
//! - [`repositories`] - Data access trait definitions
//!
//! Entities derive `sqlx::FromRow` for mapping; everything else is storage-agnostic.
//! Repository traits are implemented in [`crate::infrastructure::persistence`].

pub mod entities;
pub mod repositories;
