//! Route definitions for the `/tiempos` resource. Lap times have no search.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::lap_time;
use crate::state::AppState;

/// ```text
/// GET  /tiempos/                 -> list
/// POST /tiempos/                 -> create
/// POST /tiempos/crear/           -> create
/// GET  /tiempos/eliminados/      -> list_deleted
/// GET  /tiempos/{id}             -> get_by_id
/// POST /tiempos/editar/{id}      -> update
/// GET  /tiempos/eliminar/{id}    -> delete
/// GET  /tiempos/restaurar/{id}   -> restore
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/tiempos", get(lap_time::list).post(lap_time::create))
        .route("/tiempos/", get(lap_time::list).post(lap_time::create))
        .route("/tiempos/crear/", post(lap_time::create))
        .route("/tiempos/eliminados/", get(lap_time::list_deleted))
        .route("/tiempos/{id}", get(lap_time::get_by_id))
        .route("/tiempos/editar/{id}", post(lap_time::update))
        .route("/tiempos/eliminar/{id}", get(lap_time::delete))
        .route("/tiempos/restaurar/{id}", get(lap_time::restore))
}
