//! Handlers for the `/tiempos` resource.

use axum::extract::{Multipart, Path};
use axum::http::StatusCode;
use axum::Json;
use paddock_core::error::CoreError;
use paddock_core::lifecycle::{check_lap_time, LapTimeFacts};
use paddock_core::types::DbId;
use paddock_core::validation::validate;
use paddock_db::models::lap_time::{CreateLapTime, LapTime, LapTimeDetail, UpdateLapTime};
use paddock_db::repositories::LapTimeRepo;
use sqlx::PgConnection;

use crate::db::DbConn;
use crate::error::{AppError, AppResult};
use crate::form::FormData;
use crate::response::{DataResponse, MessageResponse};

const ENTITY: &str = "LapTime";

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound { entity: ENTITY, id })
}

fn create_input(form: &FormData) -> AppResult<CreateLapTime> {
    Ok(CreateLapTime {
        driver_id: form.required_number("piloto_id")?,
        circuit_id: form.required_number("circuito_id")?,
        lap_time_secs: form.required_number("tiempo_vuelta")?,
        position: form.number("posicion")?,
        lap_date: form.date("fecha")?,
    })
}

fn update_input(form: &FormData) -> AppResult<UpdateLapTime> {
    Ok(UpdateLapTime {
        lap_time_secs: form.number("tiempo_vuelta")?,
        position: form.number("posicion")?,
        lap_date: form.date("fecha")?,
    })
}

async fn gather_facts(
    conn: &mut PgConnection,
    driver_id: DbId,
    circuit_id: DbId,
    lap_date: Option<chrono::NaiveDate>,
    exclude_id: Option<DbId>,
) -> AppResult<LapTimeFacts> {
    Ok(LapTimeFacts {
        driver_active: LapTimeRepo::driver_active(conn, driver_id).await?,
        circuit_active: LapTimeRepo::circuit_active(conn, circuit_id).await?,
        duplicate_on_date: LapTimeRepo::duplicate_exists(
            conn, driver_id, circuit_id, lap_date, exclude_id,
        )
        .await?,
    })
}

/// GET /tiempos/
///
/// Fastest lap first, each with its driver and circuit names.
pub async fn list(mut conn: DbConn) -> AppResult<Json<DataResponse<Vec<LapTimeDetail>>>> {
    let laps = LapTimeRepo::list(&mut conn, true).await?;
    Ok(Json(DataResponse { data: laps }))
}

/// GET /tiempos/eliminados/
pub async fn list_deleted(mut conn: DbConn) -> AppResult<Json<DataResponse<Vec<LapTimeDetail>>>> {
    let laps = LapTimeRepo::list(&mut conn, false).await?;
    Ok(Json(DataResponse { data: laps }))
}

/// GET /tiempos/{id}
pub async fn get_by_id(
    mut conn: DbConn,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<LapTimeDetail>>> {
    let lap = LapTimeRepo::find_detail(&mut conn, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse { data: lap }))
}

/// POST /tiempos/ and POST /tiempos/crear/
pub async fn create(
    mut conn: DbConn,
    multipart: Multipart,
) -> AppResult<(StatusCode, Json<MessageResponse<LapTime>>)> {
    let input = create_input(&FormData::from_multipart(multipart).await?)?;
    validate(&input)?;

    let facts = gather_facts(
        &mut conn,
        input.driver_id,
        input.circuit_id,
        input.lap_date,
        None,
    )
    .await?;
    check_lap_time(input.driver_id, input.circuit_id, input.lap_date, &facts)
        .map_err(CoreError::from)?;

    let lap = LapTimeRepo::create(&mut conn, &input).await?;
    tracing::info!(
        lap_time_id = lap.id,
        driver_id = lap.driver_id,
        circuit_id = lap.circuit_id,
        lap_time_secs = lap.lap_time_secs,
        "Lap time recorded"
    );

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new("Lap time recorded", lap)),
    ))
}

/// POST /tiempos/editar/{id}
///
/// Driver and circuit cannot be changed; only the same-day duplicate rule
/// is re-checked.
pub async fn update(
    mut conn: DbConn,
    Path(id): Path<DbId>,
    multipart: Multipart,
) -> AppResult<Json<MessageResponse<LapTime>>> {
    let input = update_input(&FormData::from_multipart(multipart).await?)?;
    validate(&input)?;

    let existing = LapTimeRepo::find_by_id_any(&mut conn, id)
        .await?
        .filter(|lap| lap.active)
        .ok_or_else(|| not_found(id))?;
    let lap_date = input.lap_date.or(existing.lap_date);
    let facts = LapTimeFacts {
        driver_active: true,
        circuit_active: true,
        duplicate_on_date: LapTimeRepo::duplicate_exists(
            &mut conn,
            existing.driver_id,
            existing.circuit_id,
            lap_date,
            Some(id),
        )
        .await?,
    };
    check_lap_time(existing.driver_id, existing.circuit_id, lap_date, &facts)
        .map_err(CoreError::from)?;

    let lap = LapTimeRepo::update(&mut conn, id, &input)
        .await?
        .ok_or_else(|| not_found(id))?;
    tracing::info!(lap_time_id = id, "Lap time updated");

    Ok(Json(MessageResponse::new(format!("Lap time {id} updated"), lap)))
}

/// GET /tiempos/eliminar/{id}
pub async fn delete(
    mut conn: DbConn,
    Path(id): Path<DbId>,
) -> AppResult<Json<MessageResponse<LapTime>>> {
    let lap = LapTimeRepo::soft_delete(&mut conn, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    tracing::info!(lap_time_id = id, "Lap time deleted");

    Ok(Json(MessageResponse::new(format!("Lap time {id} deleted"), lap)))
}

/// GET /tiempos/restaurar/{id}
///
/// Driver and circuit must both still be active, and no other active lap may
/// hold the same driver, circuit and date.
pub async fn restore(
    mut conn: DbConn,
    Path(id): Path<DbId>,
) -> AppResult<Json<MessageResponse<LapTime>>> {
    let existing = LapTimeRepo::find_by_id_any(&mut conn, id)
        .await?
        .ok_or_else(|| not_found(id))?;

    let lap = if existing.active {
        existing
    } else {
        let facts = gather_facts(
            &mut conn,
            existing.driver_id,
            existing.circuit_id,
            existing.lap_date,
            Some(id),
        )
        .await?;
        check_lap_time(existing.driver_id, existing.circuit_id, existing.lap_date, &facts)
            .map_err(CoreError::from)?;
        let lap = LapTimeRepo::restore(&mut conn, id)
            .await?
            .ok_or_else(|| not_found(id))?;
        tracing::info!(lap_time_id = id, "Lap time restored");
        lap
    };

    Ok(Json(MessageResponse::new(format!("Lap time {id} restored"), lap)))
}
