//! Repository for the `drivers` table and the `driver_circuits` join table.

use paddock_core::types::DbId;
use sqlx::PgConnection;

use crate::contains_pattern;
use crate::models::circuit::Circuit;
use crate::models::driver::{CreateDriver, Driver, TeamSummary, UpdateDriver};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, nationality, car_number, active, team_id, birth_date, \
                       biography, twitter, image_url, image, created_at, updated_at";

/// Circuit columns qualified for joins through `driver_circuits`.
const CIRCUIT_COLUMNS: &str = "c.id, c.name, c.country, c.length_km, c.active, c.image_url, \
                               c.image, c.description, c.created_at, c.updated_at";

/// Provides CRUD, soft-delete and association operations for drivers.
pub struct DriverRepo;

impl DriverRepo {
    /// Insert a new active driver, returning the created row.
    pub async fn create(
        conn: &mut PgConnection,
        input: &CreateDriver,
    ) -> Result<Driver, sqlx::Error> {
        let query = format!(
            "INSERT INTO drivers
                (name, nationality, car_number, team_id, birth_date, biography,
                 twitter, image_url, image)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Driver>(&query)
            .bind(&input.name)
            .bind(&input.nationality)
            .bind(input.car_number)
            .bind(input.team_id)
            .bind(input.birth_date)
            .bind(&input.biography)
            .bind(&input.twitter)
            .bind(&input.image_url)
            .bind(&input.image)
            .fetch_one(conn)
            .await
    }

    /// Find an active driver by id.
    pub async fn find_by_id(
        conn: &mut PgConnection,
        id: DbId,
    ) -> Result<Option<Driver>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM drivers WHERE id = $1 AND active");
        sqlx::query_as::<_, Driver>(&query)
            .bind(id)
            .fetch_optional(conn)
            .await
    }

    /// Find a driver by id whatever its active flag.
    pub async fn find_by_id_any(
        conn: &mut PgConnection,
        id: DbId,
    ) -> Result<Option<Driver>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM drivers WHERE id = $1");
        sqlx::query_as::<_, Driver>(&query)
            .bind(id)
            .fetch_optional(conn)
            .await
    }

    /// List drivers with the given active flag in insertion order.
    pub async fn list(conn: &mut PgConnection, active: bool) -> Result<Vec<Driver>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM drivers WHERE active = $1 ORDER BY id");
        sqlx::query_as::<_, Driver>(&query)
            .bind(active)
            .fetch_all(conn)
            .await
    }

    /// Case-insensitive substring search over active driver names.
    pub async fn search(conn: &mut PgConnection, term: &str) -> Result<Vec<Driver>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM drivers WHERE active AND name ILIKE $1 ORDER BY id"
        );
        sqlx::query_as::<_, Driver>(&query)
            .bind(contains_pattern(term))
            .fetch_all(conn)
            .await
    }

    /// Active drivers of one team in insertion order.
    pub async fn list_active_by_team(
        conn: &mut PgConnection,
        team_id: DbId,
    ) -> Result<Vec<Driver>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM drivers WHERE team_id = $1 AND active ORDER BY id"
        );
        sqlx::query_as::<_, Driver>(&query)
            .bind(team_id)
            .fetch_all(conn)
            .await
    }

    /// Active drivers associated with one circuit.
    pub async fn list_active_by_circuit(
        conn: &mut PgConnection,
        circuit_id: DbId,
    ) -> Result<Vec<Driver>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM drivers
             WHERE active AND id IN (
                SELECT driver_id FROM driver_circuits WHERE circuit_id = $1
             )
             ORDER BY id"
        );
        sqlx::query_as::<_, Driver>(&query)
            .bind(circuit_id)
            .fetch_all(conn)
            .await
    }

    /// Number of active drivers on a team, not counting `exclude_id`.
    pub async fn count_active_in_team(
        conn: &mut PgConnection,
        team_id: DbId,
        exclude_id: Option<DbId>,
    ) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM drivers
             WHERE team_id = $1 AND active AND ($2::BIGINT IS NULL OR id <> $2)",
        )
        .bind(team_id)
        .bind(exclude_id)
        .fetch_one(conn)
        .await
    }

    /// Team ids of the active drivers (other than `exclude_id`) named `name`.
    pub async fn name_holders(
        conn: &mut PgConnection,
        name: &str,
        exclude_id: Option<DbId>,
    ) -> Result<Vec<Option<DbId>>, sqlx::Error> {
        sqlx::query_scalar::<_, Option<DbId>>(
            "SELECT team_id FROM drivers
             WHERE name = $1 AND active AND ($2::BIGINT IS NULL OR id <> $2)
             ORDER BY id",
        )
        .bind(name)
        .bind(exclude_id)
        .fetch_all(conn)
        .await
    }

    /// Whether an active driver other than `exclude_id` races with `car_number`.
    pub async fn car_number_taken(
        conn: &mut PgConnection,
        car_number: i32,
        exclude_id: Option<DbId>,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(
                SELECT 1 FROM drivers
                WHERE car_number = $1 AND active AND ($2::BIGINT IS NULL OR id <> $2)
             )",
        )
        .bind(car_number)
        .bind(exclude_id)
        .fetch_one(conn)
        .await
    }

    /// Summary of the driver's team, if the driver has an active one.
    pub async fn team_of(
        conn: &mut PgConnection,
        driver_id: DbId,
    ) -> Result<Option<TeamSummary>, sqlx::Error> {
        sqlx::query_as::<_, TeamSummary>(
            "SELECT t.id, t.name, t.country
             FROM drivers d JOIN teams t ON t.id = d.team_id
             WHERE d.id = $1 AND t.active",
        )
        .bind(driver_id)
        .fetch_optional(conn)
        .await
    }

    /// Active circuits associated with a driver.
    pub async fn list_circuits(
        conn: &mut PgConnection,
        driver_id: DbId,
    ) -> Result<Vec<Circuit>, sqlx::Error> {
        let query = format!(
            "SELECT {CIRCUIT_COLUMNS}
             FROM driver_circuits dc JOIN circuits c ON c.id = dc.circuit_id
             WHERE dc.driver_id = $1 AND c.active
             ORDER BY c.id"
        );
        sqlx::query_as::<_, Circuit>(&query)
            .bind(driver_id)
            .fetch_all(conn)
            .await
    }

    /// Associate a driver with a circuit. Associating twice is a no-op.
    pub async fn assign_circuit(
        conn: &mut PgConnection,
        driver_id: DbId,
        circuit_id: DbId,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO driver_circuits (driver_id, circuit_id)
             VALUES ($1, $2)
             ON CONFLICT (driver_id, circuit_id) DO NOTHING",
        )
        .bind(driver_id)
        .bind(circuit_id)
        .execute(conn)
        .await?;
        Ok(())
    }

    /// Remove a driver/circuit association. Returns `true` if one existed.
    pub async fn unassign_circuit(
        conn: &mut PgConnection,
        driver_id: DbId,
        circuit_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("DELETE FROM driver_circuits WHERE driver_id = $1 AND circuit_id = $2")
                .bind(driver_id)
                .bind(circuit_id)
                .execute(conn)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Update an active driver. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no active row with the given `id` exists.
    pub async fn update(
        conn: &mut PgConnection,
        id: DbId,
        input: &UpdateDriver,
    ) -> Result<Option<Driver>, sqlx::Error> {
        let query = format!(
            "UPDATE drivers SET
                name = COALESCE($2, name),
                nationality = COALESCE($3, nationality),
                car_number = COALESCE($4, car_number),
                team_id = COALESCE($5, team_id),
                birth_date = COALESCE($6, birth_date),
                biography = COALESCE($7, biography),
                twitter = COALESCE($8, twitter),
                image_url = COALESCE($9, image_url),
                image = COALESCE($10, image)
             WHERE id = $1 AND active
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Driver>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.nationality)
            .bind(input.car_number)
            .bind(input.team_id)
            .bind(input.birth_date)
            .bind(&input.biography)
            .bind(&input.twitter)
            .bind(&input.image_url)
            .bind(&input.image)
            .fetch_optional(conn)
            .await
    }

    /// Mark a driver inactive whatever its current state.
    ///
    /// Returns `None` only if the row never existed.
    pub async fn soft_delete(
        conn: &mut PgConnection,
        id: DbId,
    ) -> Result<Option<Driver>, sqlx::Error> {
        let query =
            format!("UPDATE drivers SET active = FALSE WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, Driver>(&query)
            .bind(id)
            .fetch_optional(conn)
            .await
    }

    /// Mark a driver active again. Returns `None` if the row never existed.
    pub async fn restore(
        conn: &mut PgConnection,
        id: DbId,
    ) -> Result<Option<Driver>, sqlx::Error> {
        let query = format!("UPDATE drivers SET active = TRUE WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, Driver>(&query)
            .bind(id)
            .fetch_optional(conn)
            .await
    }
}
