//! Domain logic shared by the Paddock database and API crates.
//!
//! Nothing in this crate touches the network or the database: it holds the
//! error taxonomy, entity invariants, field validation, image encoding and
//! the dashboard aggregation, all as plain functions over plain data.

pub mod analytics;
pub mod error;
pub mod image;
pub mod lifecycle;
pub mod types;
pub mod validation;
