//! Data Transfer Objects for API requests and responses.
//!
//! Response DTOs serialize with camelCase field names.

pub mod health;
pub mod links;
