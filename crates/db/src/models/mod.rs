//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Validate` create DTO for inserts
//! - A `Validate` update DTO (all `Option` fields) for partial updates

pub mod circuit;
pub mod driver;
pub mod lap_time;
pub mod team;
