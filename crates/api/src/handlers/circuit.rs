//! Handlers for the `/circuitos` resource.

use axum::extract::{Multipart, Path, Query};
use axum::http::StatusCode;
use axum::Json;
use paddock_core::error::CoreError;
use paddock_core::image;
use paddock_core::lifecycle::check_circuit;
use paddock_core::types::DbId;
use paddock_core::validation::validate;
use paddock_db::models::circuit::{CreateCircuit, UpdateCircuit};
use paddock_db::repositories::{CircuitRepo, DriverRepo, LapTimeRepo};

use crate::db::DbConn;
use crate::error::{AppError, AppResult};
use crate::form::FormData;
use crate::handlers::SearchParams;
use crate::response::{DataResponse, MessageResponse};
use crate::views::{views, CircuitDetail, CircuitView};

const ENTITY: &str = "Circuit";

const IMAGE_PART: &str = "imagen";

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound { entity: ENTITY, id })
}

fn create_input(mut form: FormData) -> AppResult<CreateCircuit> {
    Ok(CreateCircuit {
        name: form.required_text("nombre")?,
        country: form.required_text("pais")?,
        length_km: form.number("longitud_km")?,
        description: form.optional_text("descripcion"),
        image_url: form.optional_text("imagen_url"),
        image: image::accept_upload(IMAGE_PART, form.take_file(IMAGE_PART))?,
    })
}

fn update_input(mut form: FormData) -> AppResult<UpdateCircuit> {
    Ok(UpdateCircuit {
        name: form.text("nombre"),
        country: form.text("pais"),
        length_km: form.number("longitud_km")?,
        description: form.optional_text("descripcion"),
        image_url: form.optional_text("imagen_url"),
        image: image::accept_upload(IMAGE_PART, form.take_file(IMAGE_PART))?,
    })
}

/// GET /circuitos/
pub async fn list(mut conn: DbConn) -> AppResult<Json<DataResponse<Vec<CircuitView>>>> {
    let circuits = CircuitRepo::list(&mut conn, true).await?;
    Ok(Json(DataResponse {
        data: views(circuits),
    }))
}

/// GET /circuitos/eliminados/
pub async fn list_deleted(mut conn: DbConn) -> AppResult<Json<DataResponse<Vec<CircuitView>>>> {
    let circuits = CircuitRepo::list(&mut conn, false).await?;
    Ok(Json(DataResponse {
        data: views(circuits),
    }))
}

/// GET /circuitos/buscar?nombre=
pub async fn search(
    mut conn: DbConn,
    Query(params): Query<SearchParams>,
) -> AppResult<Json<DataResponse<Vec<CircuitView>>>> {
    let circuits = match params.term() {
        Some(term) => CircuitRepo::search(&mut conn, term).await?,
        None => CircuitRepo::list(&mut conn, true).await?,
    };
    Ok(Json(DataResponse {
        data: views(circuits),
    }))
}

/// GET /circuitos/{id}
pub async fn get_by_id(
    mut conn: DbConn,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<CircuitDetail>>> {
    let circuit = CircuitRepo::find_by_id(&mut conn, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    let drivers = DriverRepo::list_active_by_circuit(&mut conn, id).await?;
    let lap_times = LapTimeRepo::list_active_by_circuit(&mut conn, id).await?;

    Ok(Json(DataResponse {
        data: CircuitDetail {
            circuit: circuit.into(),
            drivers: views(drivers),
            lap_times,
        },
    }))
}

/// POST /circuitos/ and POST /circuitos/crear/
pub async fn create(
    mut conn: DbConn,
    multipart: Multipart,
) -> AppResult<(StatusCode, Json<MessageResponse<CircuitView>>)> {
    let input = create_input(FormData::from_multipart(multipart).await?)?;
    validate(&input)?;

    let taken = CircuitRepo::name_taken(&mut conn, &input.name, None).await?;
    check_circuit(&input.name, taken).map_err(CoreError::from)?;

    let circuit = CircuitRepo::create(&mut conn, &input).await?;
    tracing::info!(circuit_id = circuit.id, name = %circuit.name, "Circuit created");

    let message = format!("Circuit {} created", circuit.name);
    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new(message, circuit.into())),
    ))
}

/// POST /circuitos/editar/{id}
pub async fn update(
    mut conn: DbConn,
    Path(id): Path<DbId>,
    multipart: Multipart,
) -> AppResult<Json<MessageResponse<CircuitView>>> {
    let input = update_input(FormData::from_multipart(multipart).await?)?;
    validate(&input)?;

    let existing = CircuitRepo::find_by_id(&mut conn, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    let name = input.name.as_deref().unwrap_or(&existing.name);
    let taken = CircuitRepo::name_taken(&mut conn, name, Some(id)).await?;
    check_circuit(name, taken).map_err(CoreError::from)?;

    let circuit = CircuitRepo::update(&mut conn, id, &input)
        .await?
        .ok_or_else(|| not_found(id))?;
    tracing::info!(circuit_id = id, "Circuit updated");

    let message = format!("Circuit {} updated", circuit.name);
    Ok(Json(MessageResponse::new(message, circuit.into())))
}

/// GET /circuitos/eliminar/{id}
pub async fn delete(
    mut conn: DbConn,
    Path(id): Path<DbId>,
) -> AppResult<Json<MessageResponse<CircuitView>>> {
    let circuit = CircuitRepo::soft_delete(&mut conn, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    tracing::info!(circuit_id = id, "Circuit deleted");

    let message = format!("Circuit {} deleted", circuit.name);
    Ok(Json(MessageResponse::new(message, circuit.into())))
}

/// GET /circuitos/restaurar/{id}
pub async fn restore(
    mut conn: DbConn,
    Path(id): Path<DbId>,
) -> AppResult<Json<MessageResponse<CircuitView>>> {
    let existing = CircuitRepo::find_by_id_any(&mut conn, id)
        .await?
        .ok_or_else(|| not_found(id))?;

    let circuit = if existing.active {
        existing
    } else {
        let taken = CircuitRepo::name_taken(&mut conn, &existing.name, Some(id)).await?;
        check_circuit(&existing.name, taken).map_err(CoreError::from)?;
        let circuit = CircuitRepo::restore(&mut conn, id)
            .await?
            .ok_or_else(|| not_found(id))?;
        tracing::info!(circuit_id = id, "Circuit restored");
        circuit
    };

    let message = format!("Circuit {} restored", circuit.name);
    Ok(Json(MessageResponse::new(message, circuit.into())))
}
