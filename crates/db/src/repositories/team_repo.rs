//! Repository for the `teams` table.

use paddock_core::types::DbId;
use sqlx::PgConnection;

use crate::contains_pattern;
use crate::models::team::{CreateTeam, Team, UpdateTeam};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, country, active, logo_url, logo, created_at, updated_at";

/// Provides CRUD and soft-delete operations for teams.
pub struct TeamRepo;

impl TeamRepo {
    /// Insert a new active team, returning the created row.
    pub async fn create(conn: &mut PgConnection, input: &CreateTeam) -> Result<Team, sqlx::Error> {
        let query = format!(
            "INSERT INTO teams (name, country, logo_url, logo)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Team>(&query)
            .bind(&input.name)
            .bind(&input.country)
            .bind(&input.logo_url)
            .bind(&input.logo)
            .fetch_one(conn)
            .await
    }

    /// Find an active team by id.
    pub async fn find_by_id(conn: &mut PgConnection, id: DbId) -> Result<Option<Team>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM teams WHERE id = $1 AND active");
        sqlx::query_as::<_, Team>(&query)
            .bind(id)
            .fetch_optional(conn)
            .await
    }

    /// Find a team by id whatever its active flag.
    pub async fn find_by_id_any(
        conn: &mut PgConnection,
        id: DbId,
    ) -> Result<Option<Team>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM teams WHERE id = $1");
        sqlx::query_as::<_, Team>(&query)
            .bind(id)
            .fetch_optional(conn)
            .await
    }

    /// Find the active team with exactly this name.
    pub async fn find_by_name(
        conn: &mut PgConnection,
        name: &str,
    ) -> Result<Option<Team>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM teams WHERE name = $1 AND active");
        sqlx::query_as::<_, Team>(&query)
            .bind(name)
            .fetch_optional(conn)
            .await
    }

    /// List teams with the given active flag in insertion order.
    pub async fn list(conn: &mut PgConnection, active: bool) -> Result<Vec<Team>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM teams WHERE active = $1 ORDER BY id");
        sqlx::query_as::<_, Team>(&query)
            .bind(active)
            .fetch_all(conn)
            .await
    }

    /// Case-insensitive substring search over active team names.
    pub async fn search(conn: &mut PgConnection, term: &str) -> Result<Vec<Team>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM teams WHERE active AND name ILIKE $1 ORDER BY id"
        );
        sqlx::query_as::<_, Team>(&query)
            .bind(contains_pattern(term))
            .fetch_all(conn)
            .await
    }

    /// Whether an active team other than `exclude_id` already uses `name`.
    pub async fn name_taken(
        conn: &mut PgConnection,
        name: &str,
        exclude_id: Option<DbId>,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(
                SELECT 1 FROM teams
                WHERE name = $1 AND active AND ($2::BIGINT IS NULL OR id <> $2)
             )",
        )
        .bind(name)
        .bind(exclude_id)
        .fetch_one(conn)
        .await
    }

    /// Update an active team. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no active row with the given `id` exists.
    pub async fn update(
        conn: &mut PgConnection,
        id: DbId,
        input: &UpdateTeam,
    ) -> Result<Option<Team>, sqlx::Error> {
        let query = format!(
            "UPDATE teams SET
                name = COALESCE($2, name),
                country = COALESCE($3, country),
                logo_url = COALESCE($4, logo_url),
                logo = COALESCE($5, logo)
             WHERE id = $1 AND active
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Team>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.country)
            .bind(&input.logo_url)
            .bind(&input.logo)
            .fetch_optional(conn)
            .await
    }

    /// Mark a team inactive whatever its current state.
    ///
    /// Returns `None` only if the row never existed.
    pub async fn soft_delete(
        conn: &mut PgConnection,
        id: DbId,
    ) -> Result<Option<Team>, sqlx::Error> {
        let query = format!("UPDATE teams SET active = FALSE WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, Team>(&query)
            .bind(id)
            .fetch_optional(conn)
            .await
    }

    /// Mark a team active again. Returns `None` if the row never existed.
    pub async fn restore(conn: &mut PgConnection, id: DbId) -> Result<Option<Team>, sqlx::Error> {
        let query = format!("UPDATE teams SET active = TRUE WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, Team>(&query)
            .bind(id)
            .fetch_optional(conn)
            .await
    }
}
