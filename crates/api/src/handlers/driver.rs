//! Handlers for the `/pilotos` resource, including circuit association.

use axum::extract::{Multipart, Path, Query};
use axum::http::StatusCode;
use axum::Json;
use paddock_core::error::CoreError;
use paddock_core::image;
use paddock_core::lifecycle::{check_driver, Conflict, DriverFacts, TeamSlot};
use paddock_core::types::DbId;
use paddock_core::validation::validate;
use paddock_db::models::driver::{CreateDriver, Driver, UpdateDriver};
use paddock_db::repositories::{CircuitRepo, DriverRepo, LapTimeRepo, TeamRepo};
use sqlx::PgConnection;

use crate::db::DbConn;
use crate::error::{AppError, AppResult};
use crate::form::FormData;
use crate::handlers::SearchParams;
use crate::response::{DataResponse, MessageResponse};
use crate::views::{views, DriverDetail, DriverView};

const ENTITY: &str = "Driver";

/// File part carrying the driver portrait.
const IMAGE_PART: &str = "imagen";

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound { entity: ENTITY, id })
}

fn create_input(mut form: FormData) -> AppResult<CreateDriver> {
    Ok(CreateDriver {
        name: form.required_text("nombre")?,
        nationality: form.required_text("nacionalidad")?,
        car_number: form.required_number("numero")?,
        team_id: form.number("escuderia_id")?,
        birth_date: form.date("fecha_nacimiento")?,
        biography: form.optional_text("biografia"),
        twitter: form.optional_text("twitter"),
        image_url: form.optional_text("imagen_url"),
        image: image::accept_upload(IMAGE_PART, form.take_file(IMAGE_PART))?,
    })
}

fn update_input(mut form: FormData) -> AppResult<UpdateDriver> {
    Ok(UpdateDriver {
        name: form.text("nombre"),
        nationality: form.text("nacionalidad"),
        car_number: form.number("numero")?,
        team_id: form.number("escuderia_id")?,
        birth_date: form.date("fecha_nacimiento")?,
        biography: form.optional_text("biografia"),
        twitter: form.optional_text("twitter"),
        image_url: form.optional_text("imagen_url"),
        image: image::accept_upload(IMAGE_PART, form.take_file(IMAGE_PART))?,
    })
}

/// Gather what [`check_driver`] needs to know about the other active rows.
///
/// `exclude_id` is the driver being written, if it already exists.
async fn gather_facts(
    conn: &mut PgConnection,
    name: &str,
    car_number: i32,
    team_id: Option<DbId>,
    exclude_id: Option<DbId>,
) -> AppResult<DriverFacts> {
    let team = match team_id {
        None => TeamSlot::Unattached,
        Some(id) => match TeamRepo::find_by_id(conn, id).await? {
            None => TeamSlot::Missing(id),
            Some(_) => TeamSlot::Active {
                id,
                active_drivers: DriverRepo::count_active_in_team(conn, id, exclude_id).await?,
            },
        },
    };
    Ok(DriverFacts {
        team,
        name_holders: DriverRepo::name_holders(conn, name, exclude_id).await?,
        car_number_taken: DriverRepo::car_number_taken(conn, car_number, exclude_id).await?,
    })
}

async fn detail(conn: &mut PgConnection, driver: Driver) -> AppResult<DriverDetail> {
    let team = DriverRepo::team_of(conn, driver.id).await?;
    let circuits = DriverRepo::list_circuits(conn, driver.id).await?;
    let lap_times = LapTimeRepo::list_active_by_driver(conn, driver.id).await?;
    Ok(DriverDetail {
        driver: driver.into(),
        team,
        circuits: views(circuits),
        lap_times,
    })
}

async fn find_active(conn: &mut PgConnection, id: DbId) -> AppResult<Driver> {
    DriverRepo::find_by_id(conn, id)
        .await?
        .ok_or_else(|| not_found(id))
}

/// GET /pilotos/
pub async fn list(mut conn: DbConn) -> AppResult<Json<DataResponse<Vec<DriverView>>>> {
    let drivers = DriverRepo::list(&mut conn, true).await?;
    Ok(Json(DataResponse {
        data: views(drivers),
    }))
}

/// GET /pilotos/eliminados/
pub async fn list_deleted(mut conn: DbConn) -> AppResult<Json<DataResponse<Vec<DriverView>>>> {
    let drivers = DriverRepo::list(&mut conn, false).await?;
    Ok(Json(DataResponse {
        data: views(drivers),
    }))
}

/// GET /pilotos/buscar?nombre=
pub async fn search(
    mut conn: DbConn,
    Query(params): Query<SearchParams>,
) -> AppResult<Json<DataResponse<Vec<DriverView>>>> {
    let drivers = match params.term() {
        Some(term) => DriverRepo::search(&mut conn, term).await?,
        None => DriverRepo::list(&mut conn, true).await?,
    };
    Ok(Json(DataResponse {
        data: views(drivers),
    }))
}

/// GET /pilotos/{id} and GET /teams/pilotos/{id}
pub async fn get_by_id(
    mut conn: DbConn,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<DriverDetail>>> {
    let driver = find_active(&mut conn, id).await?;
    Ok(Json(DataResponse {
        data: detail(&mut conn, driver).await?,
    }))
}

/// POST /pilotos/ and POST /pilotos/crear/
pub async fn create(
    mut conn: DbConn,
    multipart: Multipart,
) -> AppResult<(StatusCode, Json<MessageResponse<DriverView>>)> {
    let input = create_input(FormData::from_multipart(multipart).await?)?;
    validate(&input)?;

    let facts =
        gather_facts(&mut conn, &input.name, input.car_number, input.team_id, None).await?;
    check_driver(&input.name, input.car_number, &facts).map_err(CoreError::from)?;

    let driver = DriverRepo::create(&mut conn, &input).await?;
    tracing::info!(
        driver_id = driver.id,
        team_id = ?driver.team_id,
        car_number = driver.car_number,
        "Driver created"
    );

    let message = format!("Driver {} created", driver.name);
    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new(message, driver.into())),
    ))
}

/// POST /pilotos/editar/{id}
///
/// Moving a driver to another team counts against that team's capacity.
pub async fn update(
    mut conn: DbConn,
    Path(id): Path<DbId>,
    multipart: Multipart,
) -> AppResult<Json<MessageResponse<DriverView>>> {
    let input = update_input(FormData::from_multipart(multipart).await?)?;
    validate(&input)?;

    let existing = find_active(&mut conn, id).await?;
    let name = input.name.as_deref().unwrap_or(&existing.name);
    let car_number = input.car_number.unwrap_or(existing.car_number);
    let team_id = input.team_id.or(existing.team_id);

    let facts = gather_facts(&mut conn, name, car_number, team_id, Some(id)).await?;
    check_driver(name, car_number, &facts).map_err(CoreError::from)?;

    let driver = DriverRepo::update(&mut conn, id, &input)
        .await?
        .ok_or_else(|| not_found(id))?;
    tracing::info!(driver_id = id, team_id = ?driver.team_id, "Driver updated");

    let message = format!("Driver {} updated", driver.name);
    Ok(Json(MessageResponse::new(message, driver.into())))
}

/// GET /pilotos/eliminar/{id}
pub async fn delete(
    mut conn: DbConn,
    Path(id): Path<DbId>,
) -> AppResult<Json<MessageResponse<DriverView>>> {
    let driver = DriverRepo::soft_delete(&mut conn, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    tracing::info!(driver_id = id, "Driver deleted");

    let message = format!("Driver {} deleted", driver.name);
    Ok(Json(MessageResponse::new(message, driver.into())))
}

/// GET /pilotos/restaurar/{id}
///
/// Reactivation re-runs the same checks as creation: the team must still be
/// active and have a free seat, and name and car number must still be free.
pub async fn restore(
    mut conn: DbConn,
    Path(id): Path<DbId>,
) -> AppResult<Json<MessageResponse<DriverView>>> {
    let existing = DriverRepo::find_by_id_any(&mut conn, id)
        .await?
        .ok_or_else(|| not_found(id))?;

    let driver = if existing.active {
        existing
    } else {
        let facts = gather_facts(
            &mut conn,
            &existing.name,
            existing.car_number,
            existing.team_id,
            Some(id),
        )
        .await?;
        check_driver(&existing.name, existing.car_number, &facts).map_err(CoreError::from)?;
        let driver = DriverRepo::restore(&mut conn, id)
            .await?
            .ok_or_else(|| not_found(id))?;
        tracing::info!(driver_id = id, "Driver restored");
        driver
    };

    let message = format!("Driver {} restored", driver.name);
    Ok(Json(MessageResponse::new(message, driver.into())))
}

/// POST /pilotos/{id}/circuitos/{circuit_id}
///
/// The circuit must exist and be active, like any other reference.
pub async fn assign_circuit(
    mut conn: DbConn,
    Path((id, circuit_id)): Path<(DbId, DbId)>,
) -> AppResult<Json<MessageResponse<DriverDetail>>> {
    let driver = find_active(&mut conn, id).await?;
    let circuit = CircuitRepo::find_by_id(&mut conn, circuit_id)
        .await?
        .ok_or(CoreError::Conflict(Conflict::InactiveReference {
            entity: "Circuit",
            id: circuit_id,
        }))?;

    DriverRepo::assign_circuit(&mut conn, id, circuit_id).await?;
    tracing::info!(driver_id = id, circuit_id, "Circuit assigned to driver");

    let message = format!("{} assigned to {}", circuit.name, driver.name);
    Ok(Json(MessageResponse::new(
        message,
        detail(&mut conn, driver).await?,
    )))
}

/// GET /pilotos/{id}/circuitos/quitar/{circuit_id}
///
/// Removing an association that does not exist is not an error.
pub async fn unassign_circuit(
    mut conn: DbConn,
    Path((id, circuit_id)): Path<(DbId, DbId)>,
) -> AppResult<Json<MessageResponse<DriverDetail>>> {
    let driver = find_active(&mut conn, id).await?;

    let removed = DriverRepo::unassign_circuit(&mut conn, id, circuit_id).await?;
    tracing::info!(driver_id = id, circuit_id, removed, "Circuit unassigned from driver");

    let message = format!("Circuit {circuit_id} removed from {}", driver.name);
    Ok(Json(MessageResponse::new(
        message,
        detail(&mut conn, driver).await?,
    )))
}
