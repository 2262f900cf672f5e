//! Route definitions for teams: the `/escuderias` resource and the `/teams`
//! landing views.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{driver, team};
use crate::state::AppState;

/// ```text
/// GET  /escuderias/                 -> list
/// POST /escuderias/                 -> create
/// POST /escuderias/crear/           -> create
/// GET  /escuderias/buscar?nombre=   -> search
/// GET  /escuderias/eliminados/      -> list_deleted
/// GET  /escuderias/{id}             -> get_by_id
/// POST /escuderias/editar/{id}      -> update
/// GET  /escuderias/eliminar/{id}    -> delete
/// GET  /escuderias/restaurar/{id}   -> restore
///
/// GET  /teams/                      -> list
/// GET  /teams/team/{name}           -> get_by_name
/// GET  /teams/pilotos/{id}          -> driver::get_by_id
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/escuderias", get(team::list).post(team::create))
        .route("/escuderias/", get(team::list).post(team::create))
        .route("/escuderias/crear/", post(team::create))
        .route("/escuderias/buscar", get(team::search))
        .route("/escuderias/buscar/", get(team::search))
        .route("/escuderias/eliminados/", get(team::list_deleted))
        .route("/escuderias/{id}", get(team::get_by_id))
        .route("/escuderias/editar/{id}", post(team::update))
        .route("/escuderias/eliminar/{id}", get(team::delete))
        .route("/escuderias/restaurar/{id}", get(team::restore))
        .route("/teams/", get(team::list))
        .route("/teams/team/{name}", get(team::get_by_name))
        .route("/teams/pilotos/{id}", get(driver::get_by_id))
}
