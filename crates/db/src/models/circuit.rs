//! Circuit entity model and DTOs.

use paddock_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;
use validator::Validate;

/// A circuit row from the `circuits` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Circuit {
    pub id: DbId,
    pub name: String,
    pub country: String,
    pub length_km: Option<f64>,
    pub active: bool,
    pub image_url: Option<String>,
    #[serde(skip)]
    pub image: Option<Vec<u8>>,
    pub description: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new circuit.
#[derive(Debug, Clone, Validate)]
pub struct CreateCircuit {
    #[validate(
        length(min = 3, max = 50),
        custom(function = "paddock_core::validation::not_blank")
    )]
    pub name: String,
    #[validate(length(min = 2, max = 50))]
    pub country: String,
    #[validate(
        range(min = 1.0, max = 9999.0),
        custom(function = "paddock_core::validation::finite")
    )]
    pub length_km: Option<f64>,
    pub description: Option<String>,
    #[validate(length(max = 255))]
    pub image_url: Option<String>,
    pub image: Option<Vec<u8>>,
}

/// DTO for updating an existing circuit. All fields are optional.
#[derive(Debug, Clone, Default, Validate)]
pub struct UpdateCircuit {
    #[validate(
        length(min = 3, max = 50),
        custom(function = "paddock_core::validation::not_blank")
    )]
    pub name: Option<String>,
    #[validate(length(min = 2, max = 50))]
    pub country: Option<String>,
    #[validate(
        range(min = 1.0, max = 9999.0),
        custom(function = "paddock_core::validation::finite")
    )]
    pub length_km: Option<f64>,
    pub description: Option<String>,
    #[validate(length(max = 255))]
    pub image_url: Option<String>,
    pub image: Option<Vec<u8>>,
}
