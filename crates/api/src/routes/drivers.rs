//! Route definitions for the `/pilotos` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::driver;
use crate::state::AppState;

/// ```text
/// GET  /pilotos/                                  -> list
/// POST /pilotos/                                  -> create
/// POST /pilotos/crear/                            -> create
/// GET  /pilotos/buscar?nombre=                    -> search
/// GET  /pilotos/eliminados/                       -> list_deleted
/// GET  /pilotos/{id}                              -> get_by_id
/// POST /pilotos/editar/{id}                       -> update
/// GET  /pilotos/eliminar/{id}                     -> delete
/// GET  /pilotos/restaurar/{id}                    -> restore
/// POST /pilotos/{id}/circuitos/{circuit_id}       -> assign_circuit
/// GET  /pilotos/{id}/circuitos/quitar/{circuit_id} -> unassign_circuit
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/pilotos", get(driver::list).post(driver::create))
        .route("/pilotos/", get(driver::list).post(driver::create))
        .route("/pilotos/crear/", post(driver::create))
        .route("/pilotos/buscar", get(driver::search))
        .route("/pilotos/buscar/", get(driver::search))
        .route("/pilotos/eliminados/", get(driver::list_deleted))
        .route("/pilotos/{id}", get(driver::get_by_id))
        .route("/pilotos/editar/{id}", post(driver::update))
        .route("/pilotos/eliminar/{id}", get(driver::delete))
        .route("/pilotos/restaurar/{id}", get(driver::restore))
        .route(
            "/pilotos/{id}/circuitos/{circuit_id}",
            post(driver::assign_circuit),
        )
        .route(
            "/pilotos/{id}/circuitos/quitar/{circuit_id}",
            get(driver::unassign_circuit),
        )
}
