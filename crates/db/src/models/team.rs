//! Team entity model and DTOs.

use paddock_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;
use validator::Validate;

/// A team row from the `teams` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Team {
    pub id: DbId,
    pub name: String,
    pub country: String,
    pub active: bool,
    pub logo_url: Option<String>,
    /// Raw logo bytes; never serialized directly.
    #[serde(skip)]
    pub logo: Option<Vec<u8>>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new team.
#[derive(Debug, Clone, Validate)]
pub struct CreateTeam {
    #[validate(
        length(min = 3, max = 50),
        custom(function = "paddock_core::validation::not_blank")
    )]
    pub name: String,
    #[validate(length(min = 2, max = 50))]
    pub country: String,
    #[validate(length(max = 255))]
    pub logo_url: Option<String>,
    pub logo: Option<Vec<u8>>,
}

/// DTO for updating an existing team. All fields are optional.
#[derive(Debug, Clone, Default, Validate)]
pub struct UpdateTeam {
    #[validate(
        length(min = 3, max = 50),
        custom(function = "paddock_core::validation::not_blank")
    )]
    pub name: Option<String>,
    #[validate(length(min = 2, max = 50))]
    pub country: Option<String>,
    #[validate(length(max = 255))]
    pub logo_url: Option<String>,
    /// Replaces the stored logo when present.
    pub logo: Option<Vec<u8>>,
}
