//! Handlers for the `/escuderias` resource and the `/teams` landing views.

use axum::extract::{Multipart, Path, Query};
use axum::http::StatusCode;
use axum::Json;
use paddock_core::error::CoreError;
use paddock_core::image;
use paddock_core::lifecycle::check_team;
use paddock_core::types::DbId;
use paddock_core::validation::validate;
use paddock_db::models::team::{CreateTeam, Team, UpdateTeam};
use paddock_db::repositories::{DriverRepo, TeamRepo};
use sqlx::PgConnection;

use crate::db::DbConn;
use crate::error::{AppError, AppResult};
use crate::form::FormData;
use crate::handlers::SearchParams;
use crate::response::{DataResponse, MessageResponse};
use crate::views::{views, TeamDetail, TeamView};

const ENTITY: &str = "Team";

/// File part carrying the team logo.
const LOGO_PART: &str = "logo";

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound { entity: ENTITY, id })
}

fn create_input(mut form: FormData) -> AppResult<CreateTeam> {
    Ok(CreateTeam {
        name: form.required_text("nombre")?,
        country: form.required_text("pais")?,
        logo_url: form.optional_text("logo_url"),
        logo: image::accept_upload(LOGO_PART, form.take_file(LOGO_PART))?,
    })
}

fn update_input(mut form: FormData) -> AppResult<UpdateTeam> {
    Ok(UpdateTeam {
        name: form.text("nombre"),
        country: form.text("pais"),
        logo_url: form.optional_text("logo_url"),
        logo: image::accept_upload(LOGO_PART, form.take_file(LOGO_PART))?,
    })
}

async fn detail(conn: &mut PgConnection, team: Team) -> AppResult<TeamDetail> {
    let drivers = DriverRepo::list_active_by_team(conn, team.id).await?;
    Ok(TeamDetail {
        team: team.into(),
        drivers: views(drivers),
    })
}

/// GET /escuderias/ and GET /teams/
pub async fn list(mut conn: DbConn) -> AppResult<Json<DataResponse<Vec<TeamView>>>> {
    let teams = TeamRepo::list(&mut conn, true).await?;
    Ok(Json(DataResponse { data: views(teams) }))
}

/// GET /escuderias/eliminados/
pub async fn list_deleted(mut conn: DbConn) -> AppResult<Json<DataResponse<Vec<TeamView>>>> {
    let teams = TeamRepo::list(&mut conn, false).await?;
    Ok(Json(DataResponse { data: views(teams) }))
}

/// GET /escuderias/buscar?nombre=
///
/// An empty or missing term lists every active team.
pub async fn search(
    mut conn: DbConn,
    Query(params): Query<SearchParams>,
) -> AppResult<Json<DataResponse<Vec<TeamView>>>> {
    let teams = match params.term() {
        Some(term) => TeamRepo::search(&mut conn, term).await?,
        None => TeamRepo::list(&mut conn, true).await?,
    };
    Ok(Json(DataResponse { data: views(teams) }))
}

/// GET /escuderias/{id}
pub async fn get_by_id(
    mut conn: DbConn,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<TeamDetail>>> {
    let team = TeamRepo::find_by_id(&mut conn, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse {
        data: detail(&mut conn, team).await?,
    }))
}

/// GET /teams/team/{name}
pub async fn get_by_name(
    mut conn: DbConn,
    Path(name): Path<String>,
) -> AppResult<Json<DataResponse<TeamDetail>>> {
    let team = TeamRepo::find_by_name(&mut conn, &name)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFoundByName {
                entity: ENTITY,
                name: name.clone(),
            })
        })?;
    Ok(Json(DataResponse {
        data: detail(&mut conn, team).await?,
    }))
}

/// POST /escuderias/ and POST /escuderias/crear/
pub async fn create(
    mut conn: DbConn,
    multipart: Multipart,
) -> AppResult<(StatusCode, Json<MessageResponse<TeamView>>)> {
    let input = create_input(FormData::from_multipart(multipart).await?)?;
    validate(&input)?;

    let taken = TeamRepo::name_taken(&mut conn, &input.name, None).await?;
    check_team(&input.name, taken).map_err(CoreError::from)?;

    let team = TeamRepo::create(&mut conn, &input).await?;
    tracing::info!(team_id = team.id, name = %team.name, "Team created");

    let message = format!("Team {} created", team.name);
    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new(message, team.into())),
    ))
}

/// POST /escuderias/editar/{id}
pub async fn update(
    mut conn: DbConn,
    Path(id): Path<DbId>,
    multipart: Multipart,
) -> AppResult<Json<MessageResponse<TeamView>>> {
    let input = update_input(FormData::from_multipart(multipart).await?)?;
    validate(&input)?;

    let existing = TeamRepo::find_by_id(&mut conn, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    let name = input.name.as_deref().unwrap_or(&existing.name);
    let taken = TeamRepo::name_taken(&mut conn, name, Some(id)).await?;
    check_team(name, taken).map_err(CoreError::from)?;

    let team = TeamRepo::update(&mut conn, id, &input)
        .await?
        .ok_or_else(|| not_found(id))?;
    tracing::info!(team_id = id, "Team updated");

    let message = format!("Team {} updated", team.name);
    Ok(Json(MessageResponse::new(message, team.into())))
}

/// GET /escuderias/eliminar/{id}
///
/// Deleting an already inactive team succeeds again.
pub async fn delete(
    mut conn: DbConn,
    Path(id): Path<DbId>,
) -> AppResult<Json<MessageResponse<TeamView>>> {
    let team = TeamRepo::soft_delete(&mut conn, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    tracing::info!(team_id = id, "Team deleted");

    let message = format!("Team {} deleted", team.name);
    Ok(Json(MessageResponse::new(message, team.into())))
}

/// GET /escuderias/restaurar/{id}
///
/// Restoring is refused while another active team holds the same name.
pub async fn restore(
    mut conn: DbConn,
    Path(id): Path<DbId>,
) -> AppResult<Json<MessageResponse<TeamView>>> {
    let existing = TeamRepo::find_by_id_any(&mut conn, id)
        .await?
        .ok_or_else(|| not_found(id))?;

    let team = if existing.active {
        existing
    } else {
        let taken = TeamRepo::name_taken(&mut conn, &existing.name, Some(id)).await?;
        check_team(&existing.name, taken).map_err(CoreError::from)?;
        let team = TeamRepo::restore(&mut conn, id)
            .await?
            .ok_or_else(|| not_found(id))?;
        tracing::info!(team_id = id, "Team restored");
        team
    };

    let message = format!("Team {} restored", team.name);
    Ok(Json(MessageResponse::new(message, team.into())))
}
