//! Handler for the `/dashboard` summary.

use axum::Json;
use chrono::Datelike;
use paddock_core::analytics::{summarize, DashboardSummary};
use paddock_db::repositories::DashboardRepo;

use crate::db::DbConn;
use crate::error::AppResult;
use crate::response::DataResponse;

/// GET /dashboard
///
/// Recomputed from a fresh snapshot on every request.
pub async fn get_summary(mut conn: DbConn) -> AppResult<Json<DataResponse<DashboardSummary>>> {
    let snapshot = DashboardRepo::snapshot(&mut conn).await?;
    let summary = summarize(&snapshot, chrono::Utc::now().year());
    tracing::debug!(
        teams = snapshot.teams.len(),
        drivers = snapshot.drivers.len(),
        circuits = snapshot.circuits.len(),
        laps = snapshot.laps.len(),
        "Dashboard summarized"
    );
    Ok(Json(DataResponse { data: summary }))
}
