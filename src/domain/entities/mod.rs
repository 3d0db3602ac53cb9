//! Core domain entities.
//!
//! - [`Link`] - A stored short link with click accounting
//! - [`NewLink`] - Input for inserting a link
//! - [`LinkQuery`] - Sort/filter parameters for listings

pub mod link;
pub mod link_query;

pub use link::{Link, NewLink};
pub use link_query::{LinkQuery, SortColumn, SortOrder};
