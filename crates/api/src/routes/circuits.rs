//! Route definitions for the `/circuitos` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::circuit;
use crate::state::AppState;

/// ```text
/// GET  /circuitos/                  -> list
/// POST /circuitos/                  -> create
/// POST /circuitos/crear/            -> create
/// GET  /circuitos/buscar?nombre=    -> search
/// GET  /circuitos/eliminados/       -> list_deleted
/// GET  /circuitos/{id}              -> get_by_id
/// POST /circuitos/editar/{id}       -> update
/// GET  /circuitos/eliminar/{id}     -> delete
/// GET  /circuitos/restaurar/{id}    -> restore
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/circuitos", get(circuit::list).post(circuit::create))
        .route("/circuitos/", get(circuit::list).post(circuit::create))
        .route("/circuitos/crear/", post(circuit::create))
        .route("/circuitos/buscar", get(circuit::search))
        .route("/circuitos/buscar/", get(circuit::search))
        .route("/circuitos/eliminados/", get(circuit::list_deleted))
        .route("/circuitos/{id}", get(circuit::get_by_id))
        .route("/circuitos/editar/{id}", post(circuit::update))
        .route("/circuitos/eliminar/{id}", get(circuit::delete))
        .route("/circuitos/restaurar/{id}", get(circuit::restore))
}
