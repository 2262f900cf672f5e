use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use paddock_core::error::CoreError;
use serde_json::json;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and adds HTTP-specific variants.
/// Implements [`IntoResponse`] to produce consistent JSON error responses:
/// `{ "error": ..., "code": ... }`, plus `field` for validation failures and
/// `invariant` for conflicts.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `paddock_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A database error from sqlx.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Malformed multipart body or an unparsable form value.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Request body above the configured upload limit.
    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

/// Status, code and message of an error response, plus optional extra keys.
struct ErrorBody {
    status: StatusCode,
    code: &'static str,
    message: String,
    field: Option<String>,
    invariant: Option<&'static str>,
}

impl ErrorBody {
    fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
            field: None,
            invariant: None,
        }
    }

    fn internal() -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "INTERNAL_ERROR",
            "An internal error occurred",
        )
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = match &self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::NotFound { entity, id } => ErrorBody::new(
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    format!("{entity} with id {id} not found"),
                ),
                CoreError::NotFoundByName { entity, name } => ErrorBody::new(
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    format!("{entity} named '{name}' not found"),
                ),
                CoreError::Validation { field, constraint } => ErrorBody {
                    field: Some(field.clone()),
                    ..ErrorBody::new(
                        StatusCode::BAD_REQUEST,
                        "VALIDATION_ERROR",
                        format!("{field}: {constraint}"),
                    )
                },
                CoreError::Conflict(conflict) => ErrorBody {
                    invariant: Some(conflict.invariant()),
                    ..ErrorBody::new(StatusCode::CONFLICT, "CONFLICT", conflict.to_string())
                },
                CoreError::Internal(msg) => {
                    tracing::error!(error = %msg, "Internal core error");
                    ErrorBody::internal()
                }
            },

            // --- Database errors ---
            AppError::Database(err) => classify_sqlx_error(err),

            // --- HTTP-specific errors ---
            AppError::BadRequest(msg) => {
                ErrorBody::new(StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone())
            }
            AppError::PayloadTooLarge(msg) => {
                ErrorBody::new(StatusCode::PAYLOAD_TOO_LARGE, "PAYLOAD_TOO_LARGE", msg.clone())
            }
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                ErrorBody::internal()
            }
        };

        let mut json = json!({
            "error": body.message,
            "code": body.code,
        });
        if let Some(field) = body.field {
            json["field"] = json!(field);
        }
        if let Some(invariant) = body.invariant {
            json["invariant"] = json!(invariant);
        }

        (body.status, axum::Json(json)).into_response()
    }
}

/// Map a partial unique index name to the invariant it enforces.
fn invariant_for_constraint(constraint: &str) -> Option<&'static str> {
    match constraint {
        "uq_teams_active_name" => Some("duplicate_team_name"),
        "uq_circuits_active_name" => Some("duplicate_circuit_name"),
        "uq_drivers_active_car_number" => Some("duplicate_car_number"),
        "uq_lap_times_active_driver_circuit_date" => Some("duplicate_lap_time"),
        _ => None,
    }
}

/// Classify a sqlx error into an error response.
///
/// - `RowNotFound` maps to 404.
/// - Unique violations (23505) on a `uq_*` constraint map to 409. These are
///   concurrent writers slipping past the read-then-write checks.
/// - Foreign key violations (23503) map to 409 as an inactive reference.
/// - Everything else maps to 500 with a sanitized message.
fn classify_sqlx_error(err: &sqlx::Error) -> ErrorBody {
    match err {
        sqlx::Error::RowNotFound => {
            ErrorBody::new(StatusCode::NOT_FOUND, "NOT_FOUND", "Resource not found")
        }
        sqlx::Error::Database(db_err) => {
            let constraint = db_err.constraint().unwrap_or("unknown");
            match db_err.code().as_deref() {
                Some("23505") if constraint.starts_with("uq_") => {
                    tracing::warn!(constraint, "Unique index rejected a concurrent write");
                    ErrorBody {
                        invariant: invariant_for_constraint(constraint),
                        ..ErrorBody::new(
                            StatusCode::CONFLICT,
                            "CONFLICT",
                            format!("Duplicate value violates unique constraint: {constraint}"),
                        )
                    }
                }
                Some("23503") => ErrorBody {
                    invariant: Some("inactive_reference"),
                    ..ErrorBody::new(
                        StatusCode::CONFLICT,
                        "CONFLICT",
                        format!("Referenced row does not exist: {constraint}"),
                    )
                },
                _ => {
                    tracing::error!(error = %db_err, "Database error");
                    ErrorBody::internal()
                }
            }
        }
        other => {
            tracing::error!(error = %other, "Database error");
            ErrorBody::internal()
        }
    }
}
