pub mod circuits;
pub mod dashboard;
pub mod drivers;
pub mod health;
pub mod lap_times;
pub mod teams;

use axum::response::Redirect;
use axum::routing::get;
use axum::Router;

use crate::state::AppState;

/// Build the full route tree.
///
/// Entity paths use Spanish segments:
///
/// ```text
/// /                       redirect to /teams/
/// /health                 service + database health
/// /dashboard              aggregated charts
/// /teams/...              landing views (teams, team by name, driver)
/// /escuderias/...         teams
/// /pilotos/...            drivers and their circuits
/// /circuitos/...          circuits
/// /tiempos/...            lap times
/// ```
pub fn app_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(landing))
        .merge(health::router())
        .merge(dashboard::router())
        .merge(teams::router())
        .merge(drivers::router())
        .merge(circuits::router())
        .merge(lap_times::router())
}

/// GET / -- the landing page is the team list.
async fn landing() -> Redirect {
    Redirect::to("/teams/")
}
