//! Repository for the `circuits` table.

use paddock_core::types::DbId;
use sqlx::PgConnection;

use crate::contains_pattern;
use crate::models::circuit::{Circuit, CreateCircuit, UpdateCircuit};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, country, length_km, active, image_url, image, description, \
                       created_at, updated_at";

/// Provides CRUD and soft-delete operations for circuits.
pub struct CircuitRepo;

impl CircuitRepo {
    /// Insert a new active circuit, returning the created row.
    pub async fn create(
        conn: &mut PgConnection,
        input: &CreateCircuit,
    ) -> Result<Circuit, sqlx::Error> {
        let query = format!(
            "INSERT INTO circuits (name, country, length_km, description, image_url, image)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Circuit>(&query)
            .bind(&input.name)
            .bind(&input.country)
            .bind(input.length_km)
            .bind(&input.description)
            .bind(&input.image_url)
            .bind(&input.image)
            .fetch_one(conn)
            .await
    }

    /// Find an active circuit by id.
    pub async fn find_by_id(
        conn: &mut PgConnection,
        id: DbId,
    ) -> Result<Option<Circuit>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM circuits WHERE id = $1 AND active");
        sqlx::query_as::<_, Circuit>(&query)
            .bind(id)
            .fetch_optional(conn)
            .await
    }

    /// Find a circuit by id whatever its active flag.
    pub async fn find_by_id_any(
        conn: &mut PgConnection,
        id: DbId,
    ) -> Result<Option<Circuit>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM circuits WHERE id = $1");
        sqlx::query_as::<_, Circuit>(&query)
            .bind(id)
            .fetch_optional(conn)
            .await
    }

    /// List circuits with the given active flag in insertion order.
    pub async fn list(conn: &mut PgConnection, active: bool) -> Result<Vec<Circuit>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM circuits WHERE active = $1 ORDER BY id");
        sqlx::query_as::<_, Circuit>(&query)
            .bind(active)
            .fetch_all(conn)
            .await
    }

    /// Case-insensitive substring search over active circuit names.
    pub async fn search(
        conn: &mut PgConnection,
        term: &str,
    ) -> Result<Vec<Circuit>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM circuits WHERE active AND name ILIKE $1 ORDER BY id"
        );
        sqlx::query_as::<_, Circuit>(&query)
            .bind(contains_pattern(term))
            .fetch_all(conn)
            .await
    }

    /// Whether an active circuit other than `exclude_id` already uses `name`.
    pub async fn name_taken(
        conn: &mut PgConnection,
        name: &str,
        exclude_id: Option<DbId>,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(
                SELECT 1 FROM circuits
                WHERE name = $1 AND active AND ($2::BIGINT IS NULL OR id <> $2)
             )",
        )
        .bind(name)
        .bind(exclude_id)
        .fetch_one(conn)
        .await
    }

    /// Update an active circuit. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no active row with the given `id` exists.
    pub async fn update(
        conn: &mut PgConnection,
        id: DbId,
        input: &UpdateCircuit,
    ) -> Result<Option<Circuit>, sqlx::Error> {
        let query = format!(
            "UPDATE circuits SET
                name = COALESCE($2, name),
                country = COALESCE($3, country),
                length_km = COALESCE($4, length_km),
                description = COALESCE($5, description),
                image_url = COALESCE($6, image_url),
                image = COALESCE($7, image)
             WHERE id = $1 AND active
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Circuit>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.country)
            .bind(input.length_km)
            .bind(&input.description)
            .bind(&input.image_url)
            .bind(&input.image)
            .fetch_optional(conn)
            .await
    }

    /// Mark a circuit inactive whatever its current state.
    ///
    /// Returns `None` only if the row never existed.
    pub async fn soft_delete(
        conn: &mut PgConnection,
        id: DbId,
    ) -> Result<Option<Circuit>, sqlx::Error> {
        let query =
            format!("UPDATE circuits SET active = FALSE WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, Circuit>(&query)
            .bind(id)
            .fetch_optional(conn)
            .await
    }

    /// Mark a circuit active again. Returns `None` if the row never existed.
    pub async fn restore(
        conn: &mut PgConnection,
        id: DbId,
    ) -> Result<Option<Circuit>, sqlx::Error> {
        let query =
            format!("UPDATE circuits SET active = TRUE WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, Circuit>(&query)
            .bind(id)
            .fetch_optional(conn)
            .await
    }
}
