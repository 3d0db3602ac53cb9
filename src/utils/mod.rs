//! Utility functions for code generation, URL validation, and error mapping.
//!
//! - [`code_generator`] - Short code generation and validation
//! - [`url_validator`] - Destination URL validation
//! - [`db_error`] - SQLx error classification
//! - [`uptime`] - Human-readable uptime formatting

pub mod code_generator;
pub mod db_error;
pub mod uptime;
pub mod url_validator;
