//! Per-request database session.

use std::ops::{Deref, DerefMut};

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use sqlx::pool::PoolConnection;
use sqlx::{PgConnection, Postgres};

use crate::error::AppError;
use crate::state::AppState;

/// One pooled connection owned by the current request.
///
/// Acquired before the handler runs and handed back to the pool when the
/// value is dropped, whichever way the handler exits. Repositories take it
/// as `&mut PgConnection`:
///
/// ```ignore
/// async fn list(mut conn: DbConn) -> AppResult<Json<Vec<Team>>> {
///     Ok(Json(TeamRepo::list(&mut conn, true).await?))
/// }
/// ```
pub struct DbConn(PoolConnection<Postgres>);

impl FromRequestParts<AppState> for DbConn {
    type Rejection = AppError;

    async fn from_request_parts(
        _parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let conn = state.pool.acquire().await?;
        Ok(DbConn(conn))
    }
}

impl Deref for DbConn {
    type Target = PgConnection;

    fn deref(&self) -> &PgConnection {
        &self.0
    }
}

impl DerefMut for DbConn {
    fn deref_mut(&mut self) -> &mut PgConnection {
        &mut self.0
    }
}
