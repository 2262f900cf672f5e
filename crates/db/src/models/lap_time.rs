//! Lap time entity model and DTOs.

use chrono::NaiveDate;
use paddock_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;
use validator::Validate;

/// A lap time row from the `lap_times` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct LapTime {
    pub id: DbId,
    pub driver_id: DbId,
    pub circuit_id: DbId,
    pub lap_time_secs: f64,
    pub position: Option<i32>,
    pub lap_date: Option<NaiveDate>,
    pub active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A lap time joined with the names of its driver and circuit.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct LapTimeDetail {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub lap: LapTime,
    pub driver_name: String,
    pub circuit_name: String,
}

/// DTO for recording a new lap time.
#[derive(Debug, Clone, Validate)]
pub struct CreateLapTime {
    pub driver_id: DbId,
    pub circuit_id: DbId,
    #[validate(
        range(exclusive_min = 0.0),
        custom(function = "paddock_core::validation::finite")
    )]
    pub lap_time_secs: f64,
    #[validate(range(min = 1))]
    pub position: Option<i32>,
    pub lap_date: Option<NaiveDate>,
}

/// DTO for correcting a recorded lap time. All fields are optional.
#[derive(Debug, Clone, Default, Validate)]
pub struct UpdateLapTime {
    #[validate(
        range(exclusive_min = 0.0),
        custom(function = "paddock_core::validation::finite")
    )]
    pub lap_time_secs: Option<f64>,
    #[validate(range(min = 1))]
    pub position: Option<i32>,
    pub lap_date: Option<NaiveDate>,
}
