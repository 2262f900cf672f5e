//! Repository for the `lap_times` table.

use chrono::NaiveDate;
use paddock_core::types::DbId;
use sqlx::PgConnection;

use crate::models::lap_time::{CreateLapTime, LapTime, LapTimeDetail, UpdateLapTime};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, driver_id, circuit_id, lap_time_secs, position, lap_date, active, \
                       created_at, updated_at";

/// Lap columns plus the joined driver and circuit names.
const DETAIL_COLUMNS: &str = "l.id, l.driver_id, l.circuit_id, l.lap_time_secs, l.position, \
                              l.lap_date, l.active, l.created_at, l.updated_at, \
                              d.name AS driver_name, c.name AS circuit_name";

const DETAIL_FROM: &str = "lap_times l
             JOIN drivers d ON d.id = l.driver_id
             JOIN circuits c ON c.id = l.circuit_id";

/// Provides CRUD and soft-delete operations for lap times.
pub struct LapTimeRepo;

impl LapTimeRepo {
    /// Record a new active lap time, returning the created row.
    pub async fn create(
        conn: &mut PgConnection,
        input: &CreateLapTime,
    ) -> Result<LapTime, sqlx::Error> {
        let query = format!(
            "INSERT INTO lap_times (driver_id, circuit_id, lap_time_secs, position, lap_date)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, LapTime>(&query)
            .bind(input.driver_id)
            .bind(input.circuit_id)
            .bind(input.lap_time_secs)
            .bind(input.position)
            .bind(input.lap_date)
            .fetch_one(conn)
            .await
    }

    /// Find a lap time by id whatever its active flag.
    pub async fn find_by_id_any(
        conn: &mut PgConnection,
        id: DbId,
    ) -> Result<Option<LapTime>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM lap_times WHERE id = $1");
        sqlx::query_as::<_, LapTime>(&query)
            .bind(id)
            .fetch_optional(conn)
            .await
    }

    /// Find an active lap time with its driver and circuit names.
    pub async fn find_detail(
        conn: &mut PgConnection,
        id: DbId,
    ) -> Result<Option<LapTimeDetail>, sqlx::Error> {
        let query =
            format!("SELECT {DETAIL_COLUMNS} FROM {DETAIL_FROM} WHERE l.id = $1 AND l.active");
        sqlx::query_as::<_, LapTimeDetail>(&query)
            .bind(id)
            .fetch_optional(conn)
            .await
    }

    /// List lap times with the given active flag, fastest first.
    pub async fn list(
        conn: &mut PgConnection,
        active: bool,
    ) -> Result<Vec<LapTimeDetail>, sqlx::Error> {
        let query = format!(
            "SELECT {DETAIL_COLUMNS} FROM {DETAIL_FROM}
             WHERE l.active = $1
             ORDER BY l.lap_time_secs, l.id"
        );
        sqlx::query_as::<_, LapTimeDetail>(&query)
            .bind(active)
            .fetch_all(conn)
            .await
    }

    /// Active lap times of one driver, most recent date first.
    pub async fn list_active_by_driver(
        conn: &mut PgConnection,
        driver_id: DbId,
    ) -> Result<Vec<LapTimeDetail>, sqlx::Error> {
        let query = format!(
            "SELECT {DETAIL_COLUMNS} FROM {DETAIL_FROM}
             WHERE l.driver_id = $1 AND l.active
             ORDER BY l.lap_date DESC NULLS LAST, l.id"
        );
        sqlx::query_as::<_, LapTimeDetail>(&query)
            .bind(driver_id)
            .fetch_all(conn)
            .await
    }

    /// Active lap times set on one circuit, fastest first.
    pub async fn list_active_by_circuit(
        conn: &mut PgConnection,
        circuit_id: DbId,
    ) -> Result<Vec<LapTimeDetail>, sqlx::Error> {
        let query = format!(
            "SELECT {DETAIL_COLUMNS} FROM {DETAIL_FROM}
             WHERE l.circuit_id = $1 AND l.active
             ORDER BY l.lap_time_secs, l.id"
        );
        sqlx::query_as::<_, LapTimeDetail>(&query)
            .bind(circuit_id)
            .fetch_all(conn)
            .await
    }

    /// Whether another active lap exists for the same driver, circuit and date.
    ///
    /// Undated laps never collide.
    pub async fn duplicate_exists(
        conn: &mut PgConnection,
        driver_id: DbId,
        circuit_id: DbId,
        lap_date: Option<NaiveDate>,
        exclude_id: Option<DbId>,
    ) -> Result<bool, sqlx::Error> {
        let Some(date) = lap_date else {
            return Ok(false);
        };
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(
                SELECT 1 FROM lap_times
                WHERE driver_id = $1 AND circuit_id = $2 AND lap_date = $3 AND active
                  AND ($4::BIGINT IS NULL OR id <> $4)
             )",
        )
        .bind(driver_id)
        .bind(circuit_id)
        .bind(date)
        .bind(exclude_id)
        .fetch_one(conn)
        .await
    }

    /// Whether the driver row exists and is active.
    pub async fn driver_active(conn: &mut PgConnection, driver_id: DbId) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM drivers WHERE id = $1 AND active)")
            .bind(driver_id)
            .fetch_one(conn)
            .await
    }

    /// Whether the circuit row exists and is active.
    pub async fn circuit_active(
        conn: &mut PgConnection,
        circuit_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM circuits WHERE id = $1 AND active)",
        )
        .bind(circuit_id)
        .fetch_one(conn)
        .await
    }

    /// Update an active lap time. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no active row with the given `id` exists.
    pub async fn update(
        conn: &mut PgConnection,
        id: DbId,
        input: &UpdateLapTime,
    ) -> Result<Option<LapTime>, sqlx::Error> {
        let query = format!(
            "UPDATE lap_times SET
                lap_time_secs = COALESCE($2, lap_time_secs),
                position = COALESCE($3, position),
                lap_date = COALESCE($4, lap_date)
             WHERE id = $1 AND active
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, LapTime>(&query)
            .bind(id)
            .bind(input.lap_time_secs)
            .bind(input.position)
            .bind(input.lap_date)
            .fetch_optional(conn)
            .await
    }

    /// Mark a lap time inactive whatever its current state.
    ///
    /// Returns `None` only if the row never existed.
    pub async fn soft_delete(
        conn: &mut PgConnection,
        id: DbId,
    ) -> Result<Option<LapTime>, sqlx::Error> {
        let query =
            format!("UPDATE lap_times SET active = FALSE WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, LapTime>(&query)
            .bind(id)
            .fetch_optional(conn)
            .await
    }

    /// Mark a lap time active again. Returns `None` if the row never existed.
    pub async fn restore(
        conn: &mut PgConnection,
        id: DbId,
    ) -> Result<Option<LapTime>, sqlx::Error> {
        let query =
            format!("UPDATE lap_times SET active = TRUE WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, LapTime>(&query)
            .bind(id)
            .fetch_optional(conn)
            .await
    }
}
