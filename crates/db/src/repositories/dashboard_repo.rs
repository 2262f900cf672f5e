//! Read-only queries feeding the dashboard aggregation.

use paddock_core::analytics::{CircuitSample, DriverSample, LapSample, Snapshot, TeamSample};
use paddock_core::types::DbId;
use sqlx::PgConnection;

/// Loads every team, driver, circuit and lap row for [`paddock_core::analytics::summarize`].
pub struct DashboardRepo;

impl DashboardRepo {
    /// Snapshot of all four entity tables, active and inactive rows alike.
    pub async fn snapshot(conn: &mut PgConnection) -> Result<Snapshot, sqlx::Error> {
        let teams = sqlx::query_as::<_, (DbId, String, bool)>(
            "SELECT id, name, active FROM teams ORDER BY id",
        )
        .fetch_all(&mut *conn)
        .await?
        .into_iter()
        .map(|(id, name, active)| TeamSample { id, name, active })
        .collect();

        let drivers = sqlx::query_as::<_, (Option<DbId>, String, bool)>(
            "SELECT team_id, nationality, active FROM drivers ORDER BY id",
        )
        .fetch_all(&mut *conn)
        .await?
        .into_iter()
        .map(|(team_id, nationality, active)| DriverSample {
            team_id,
            nationality,
            active,
        })
        .collect();

        let circuits = sqlx::query_as::<_, (DbId, String, Option<f64>, bool)>(
            "SELECT id, name, length_km, active FROM circuits ORDER BY id",
        )
        .fetch_all(&mut *conn)
        .await?
        .into_iter()
        .map(|(id, name, length_km, active)| CircuitSample {
            id,
            name,
            length_km,
            active,
        })
        .collect();

        let laps = sqlx::query_as::<_, (DbId, f64, bool)>(
            "SELECT circuit_id, lap_time_secs, active FROM lap_times ORDER BY id",
        )
        .fetch_all(&mut *conn)
        .await?
        .into_iter()
        .map(|(circuit_id, lap_time_secs, active)| LapSample {
            circuit_id,
            lap_time_secs,
            active,
        })
        .collect();

        Ok(Snapshot {
            teams,
            drivers,
            circuits,
            laps,
        })
    }
}
