//! Driver entity model and DTOs.

use chrono::NaiveDate;
use paddock_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;
use validator::Validate;

/// A driver row from the `drivers` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Driver {
    pub id: DbId,
    pub name: String,
    pub nationality: String,
    pub car_number: i32,
    pub active: bool,
    pub team_id: Option<DbId>,
    pub birth_date: Option<NaiveDate>,
    pub biography: Option<String>,
    pub twitter: Option<String>,
    pub image_url: Option<String>,
    #[serde(skip)]
    pub image: Option<Vec<u8>>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new driver.
#[derive(Debug, Clone, Validate)]
pub struct CreateDriver {
    #[validate(
        length(min = 3, max = 50),
        custom(function = "paddock_core::validation::not_blank")
    )]
    pub name: String,
    #[validate(length(min = 2, max = 50))]
    pub nationality: String,
    #[validate(range(min = 1, max = 99))]
    pub car_number: i32,
    pub team_id: Option<DbId>,
    pub birth_date: Option<NaiveDate>,
    #[validate(length(min = 10, max = 500))]
    pub biography: Option<String>,
    #[validate(length(min = 3, max = 50))]
    pub twitter: Option<String>,
    #[validate(length(max = 255))]
    pub image_url: Option<String>,
    pub image: Option<Vec<u8>>,
}

/// DTO for updating an existing driver. All fields are optional.
#[derive(Debug, Clone, Default, Validate)]
pub struct UpdateDriver {
    #[validate(
        length(min = 3, max = 50),
        custom(function = "paddock_core::validation::not_blank")
    )]
    pub name: Option<String>,
    #[validate(length(min = 2, max = 50))]
    pub nationality: Option<String>,
    #[validate(range(min = 1, max = 99))]
    pub car_number: Option<i32>,
    /// Moves the driver to another team when present.
    pub team_id: Option<DbId>,
    pub birth_date: Option<NaiveDate>,
    #[validate(length(min = 10, max = 500))]
    pub biography: Option<String>,
    #[validate(length(min = 3, max = 50))]
    pub twitter: Option<String>,
    #[validate(length(max = 255))]
    pub image_url: Option<String>,
    pub image: Option<Vec<u8>>,
}

/// Minimal team projection embedded in driver views.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TeamSummary {
    pub id: DbId,
    pub name: String,
    pub country: String,
}
